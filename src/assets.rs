//! Asynchronous asset slots
//!
//! Loads resolve between ticks. A participant holds a `Pending<T>` and checks
//! it from inside its hooks; until the value arrives every dependent step is
//! skipped. Dropping the handle abandons the load.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Shared slot filled by a loader when the asset arrives
#[derive(Debug)]
pub struct Pending<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pending<T> {
    /// An unresolved slot
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// An already resolved slot
    pub fn ready(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(value))),
        }
    }

    pub fn resolve(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }

    pub fn is_ready(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Move the value out, leaving the slot empty
    pub fn take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }
}

impl<T: Clone> Pending<T> {
    /// Copy of the value, leaving it in place for other holders
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }
}

/// Named animation clip carried by a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    /// Length in seconds
    pub duration: f32,
}

/// Loaded model: bounds plus its animation clips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub name: String,
    /// Unscaled half extents of the pick box
    pub half_extents: [f32; 3],
    /// Unscaled offset from the model origin to the pick box center
    #[serde(default)]
    pub offset: [f32; 3],
    pub clips: Vec<ClipInfo>,
}

impl ModelAsset {
    /// Built-in manifest for the expressive robot mascot
    pub fn robot_expressive() -> Self {
        let clip = |name: &str, duration: f32| ClipInfo {
            name: name.to_string(),
            duration,
        };
        Self {
            name: "RobotExpressive".to_string(),
            half_extents: [1.4, 2.4, 1.0],
            offset: [0.0, 2.4, 0.0],
            clips: vec![
                clip("Idle", 2.0),
                clip("Walking", 1.0),
                clip("Wave", 1.25),
                clip("Punch", 0.75),
                clip("ThumbsUp", 1.5),
                clip("Yes", 1.2),
                clip("No", 1.4),
            ],
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::from_array(self.half_extents)
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }
}

/// Glyph metrics used to size text meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAsset {
    pub name: String,
    /// Horizontal advance per character, as a fraction of the text size
    pub advance: f32,
    /// Line height as a fraction of the text size
    pub line_height: f32,
}

impl FontAsset {
    pub fn helvetiker() -> Self {
        Self {
            name: "helvetiker_regular".to_string(),
            advance: 0.6,
            line_height: 1.0,
        }
    }

    /// Extent of `text` set at `size`
    pub fn measure(&self, text: &str, size: f32) -> Vec2 {
        let chars = text.chars().count() as f32;
        Vec2::new(chars * size * self.advance, size * self.line_height)
    }
}

/// Asset loader collaborator
pub trait AssetLoader {
    fn load_model(&mut self, path: &str) -> Pending<ModelAsset>;
    fn load_font(&mut self, path: &str) -> Pending<FontAsset>;
}

/// Lets the host keep a handle on a loader it hands to the director
impl<L: AssetLoader + ?Sized> AssetLoader for Rc<RefCell<L>> {
    fn load_model(&mut self, path: &str) -> Pending<ModelAsset> {
        self.borrow_mut().load_model(path)
    }

    fn load_font(&mut self, path: &str) -> Pending<FontAsset> {
        self.borrow_mut().load_font(path)
    }
}

/// Resolves every request synchronously from the built-in manifests
#[derive(Debug, Clone)]
pub struct ImmediateLoader {
    pub model: ModelAsset,
    pub font: FontAsset,
}

impl Default for ImmediateLoader {
    fn default() -> Self {
        Self {
            model: ModelAsset::robot_expressive(),
            font: FontAsset::helvetiker(),
        }
    }
}

impl AssetLoader for ImmediateLoader {
    fn load_model(&mut self, path: &str) -> Pending<ModelAsset> {
        log::debug!("Model {} resolved immediately", path);
        Pending::ready(self.model.clone())
    }

    fn load_font(&mut self, path: &str) -> Pending<FontAsset> {
        log::debug!("Font {} resolved immediately", path);
        Pending::ready(self.font.clone())
    }
}

/// Holds requests open until the host calls `resolve_*`
#[derive(Debug, Default)]
pub struct DeferredLoader {
    models: HashMap<String, Vec<Pending<ModelAsset>>>,
    fonts: HashMap<String, Vec<Pending<FontAsset>>>,
}

impl DeferredLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_models(&self) -> usize {
        self.models.values().map(Vec::len).sum()
    }

    pub fn pending_fonts(&self) -> usize {
        self.fonts.values().map(Vec::len).sum()
    }

    /// Resolve every open model request
    pub fn resolve_models(&mut self, model: &ModelAsset) {
        for (path, slots) in self.models.drain() {
            log::info!("Model {} resolved ({} request(s))", path, slots.len());
            for slot in slots {
                slot.resolve(model.clone());
            }
        }
    }

    /// Resolve every open font request
    pub fn resolve_fonts(&mut self, font: &FontAsset) {
        for (path, slots) in self.fonts.drain() {
            log::info!("Font {} resolved ({} request(s))", path, slots.len());
            for slot in slots {
                slot.resolve(font.clone());
            }
        }
    }
}

impl AssetLoader for DeferredLoader {
    fn load_model(&mut self, path: &str) -> Pending<ModelAsset> {
        let slot = Pending::new();
        self.models
            .entry(path.to_string())
            .or_default()
            .push(slot.clone());
        slot
    }

    fn load_font(&mut self, path: &str) -> Pending<FontAsset> {
        let slot = Pending::new();
        self.fonts
            .entry(path.to_string())
            .or_default()
            .push(slot.clone());
        slot
    }
}
