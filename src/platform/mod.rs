//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Pointer coordinates
//! - Time (`performance.now()`)
//! - Asset fetching
//! - Opening external links
//! - Mounting the canvas

use glam::Vec2;

/// Convert a pointer position in CSS pixels (relative to the canvas) to
/// normalized device coordinates, +Y up
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use serde::de::DeserializeOwned;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlCanvasElement;

    use crate::assets::{AssetLoader, FontAsset, ModelAsset, Pending};
    use crate::clock::Clock;
    use crate::error::{AssetError, StartupError};

    fn js_error(value: JsValue) -> String {
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value))
    }

    /// `performance.now()`, falling back to `Date.now()`
    pub struct PerformanceClock {
        performance: Option<web_sys::Performance>,
    }

    impl PerformanceClock {
        pub fn new() -> Self {
            Self {
                performance: web_sys::window().and_then(|w| w.performance()),
            }
        }
    }

    impl Default for PerformanceClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            match &self.performance {
                Some(p) => p.now(),
                None => js_sys::Date::now(),
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(path: &str) -> Result<T, AssetError> {
        let window = web_sys::window().ok_or(AssetError::NoWindow)?;
        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| AssetError::Request(js_error(e)))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|e| AssetError::Request(js_error(e)))?;
        if !response.ok() {
            return Err(AssetError::Status(response.status()));
        }
        let body = response
            .text()
            .map_err(|e| AssetError::Request(js_error(e)))?;
        let text = JsFuture::from(body)
            .await
            .map_err(|e| AssetError::Request(js_error(e)))?
            .as_string()
            .unwrap_or_default();
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetches JSON manifests next to the page. A failed fetch resolves
    /// with the built-in manifest so the scene still comes up.
    #[derive(Debug, Default)]
    pub struct FetchLoader;

    impl FetchLoader {
        fn spawn<T: DeserializeOwned + 'static>(
            path: &str,
            fallback: fn() -> T,
        ) -> Pending<T> {
            let slot = Pending::new();
            let target = slot.clone();
            let path = path.to_string();
            wasm_bindgen_futures::spawn_local(async move {
                let value = match fetch_json::<T>(&path).await {
                    Ok(value) => {
                        log::info!("Loaded {}", path);
                        value
                    }
                    Err(e) => {
                        log::warn!("{} unavailable ({}), using built-in", path, e);
                        fallback()
                    }
                };
                target.resolve(value);
            });
            slot
        }
    }

    impl AssetLoader for FetchLoader {
        fn load_model(&mut self, path: &str) -> Pending<ModelAsset> {
            Self::spawn(path, ModelAsset::robot_expressive)
        }

        fn load_font(&mut self, path: &str) -> Pending<FontAsset> {
            Self::spawn(path, FontAsset::helvetiker)
        }
    }

    /// Open an external link in a new tab
    pub fn open_link(url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.open_with_url_and_target(url, "_blank") {
            log::warn!("Could not open {}: {}", url, js_error(e));
        }
    }

    /// Find the canvas to render into
    pub fn mount_canvas(id: &str) -> Result<HtmlCanvasElement, StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;
        document
            .get_element_by_id(id)
            .ok_or_else(|| StartupError::MissingMount(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| StartupError::Dom(format!("#{} is not a canvas", id)))
    }

    /// Match the drawing buffer to the canvas' CSS size times the device
    /// pixel ratio. Returns the new buffer size.
    pub fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_to_ndc_corners() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_to_ndc_degenerate_canvas() {
        assert_eq!(pointer_to_ndc(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    }
}
