//! The participant contract
//!
//! Every hook except `advance` has a no-op default, so a participant only
//! implements the capabilities it actually has. Hooks receive a [`Stage`]
//! giving access to the shared scene for the duration of the call.

use crate::assets::AssetLoader;
use crate::scene::{Camera, Ray, SceneGraph};

/// Which focus-holding participant is the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Landing,
    Quiz,
}

impl Focus {
    /// The participant focus hands off to
    pub fn next(self) -> Self {
        match self {
            Focus::Landing => Focus::Quiz,
            Focus::Quiz => Focus::Landing,
        }
    }

    pub fn key(self) -> ParticipantKey {
        match self {
            Focus::Landing => ParticipantKey::Landing,
            Focus::Quiz => ParticipantKey::Quiz,
        }
    }
}

/// Symbolic participant names, used for lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipantKey {
    Background,
    Mascot,
    Landing,
    Quiz,
}

impl ParticipantKey {
    pub const ALL: [ParticipantKey; 4] = [
        ParticipantKey::Background,
        ParticipantKey::Mascot,
        ParticipantKey::Landing,
        ParticipantKey::Quiz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantKey::Background => "background",
            ParticipantKey::Mascot => "mascot",
            ParticipantKey::Landing => "landing",
            ParticipantKey::Quiz => "quiz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "background" | "game_background" => Some(ParticipantKey::Background),
            "mascot" => Some(ParticipantKey::Mascot),
            "landing" | "landing_page" => Some(ParticipantKey::Landing),
            "quiz" => Some(ParticipantKey::Quiz),
            _ => None,
        }
    }
}

/// Mascot reaction to a locked quiz answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Correct,
    Incorrect,
}

/// Cross-participant signals, routed by the director right after the hook
/// that emitted them returns
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// The start button was clicked: the mascot walks in
    MascotEnter,
    /// Back-navigation: the mascot walks off
    MascotExit,
    /// An answer was locked
    MascotReact(Reaction),
    /// Ask the host to open an external link
    OpenLink(String),
}

/// Shared state lent to a participant for one hook call
pub struct Stage<'a> {
    pub scene: &'a mut SceneGraph,
    pub camera: &'a Camera,
    pub assets: &'a mut dyn AssetLoader,
    /// Host timestamp (ms) of the current frame or pointer event
    pub now_ms: f64,
    events: &'a mut Vec<StageEvent>,
}

impl<'a> Stage<'a> {
    pub fn new(
        scene: &'a mut SceneGraph,
        camera: &'a Camera,
        assets: &'a mut dyn AssetLoader,
        now_ms: f64,
        events: &'a mut Vec<StageEvent>,
    ) -> Self {
        Self {
            scene,
            camera,
            assets,
            now_ms,
            events,
        }
    }

    pub fn emit(&mut self, event: StageEvent) {
        self.events.push(event);
    }
}

/// A unit of scene behavior driven every tick
pub trait Participant {
    fn key(&self) -> ParticipantKey;

    /// One-time setup
    fn initialize(&mut self, _stage: &mut Stage<'_>) {}

    /// Time step; must not block and must accept `dt == 0`
    fn advance(&mut self, stage: &mut Stage<'_>, dt: f32);

    /// Start of a focus (or visibility) period; resets transient state
    fn enter_scene(&mut self, _stage: &mut Stage<'_>) {}

    /// End of a focus (or visibility) period
    fn exit_scene(&mut self, _stage: &mut Stage<'_>) {}

    /// True once per cycle when focus should move on
    fn is_finished(&self) -> bool {
        false
    }

    /// React to a pointer ray
    fn handle_pointer(&mut self, _stage: &mut Stage<'_>, _ray: &Ray) {}

    /// Release owned scene nodes; safe to call repeatedly
    fn teardown(&mut self, _stage: &mut Stage<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_alternates() {
        assert_eq!(Focus::Landing.next(), Focus::Quiz);
        assert_eq!(Focus::Quiz.next(), Focus::Landing);
        assert_eq!(Focus::Quiz.key(), ParticipantKey::Quiz);
    }

    #[test]
    fn test_key_names_roundtrip() {
        for key in ParticipantKey::ALL {
            assert_eq!(ParticipantKey::from_str(key.as_str()), Some(key));
        }
        assert_eq!(
            ParticipantKey::from_str("LANDING_PAGE"),
            Some(ParticipantKey::Landing)
        );
        assert_eq!(ParticipantKey::from_str("engine"), None);
    }
}
