//! Starquiz - starfield landing screen, mascot and quiz on one shared scene
//!
//! Core modules:
//! - `stage`: Orchestration core (participants, director, mascot state machine)
//! - `scene`: Scene graph, camera and ray casting collaborators
//! - `renderer`: WebGPU rendering of the scene graph
//! - `platform`: Browser glue (canvas, pointer, links, asset fetch)
//! - `tuning`: Data-driven constants for every participant

pub mod assets;
pub mod clock;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod stage;
pub mod tuning;

pub use clock::{Clock, FrameClock, ManualClock};
pub use error::{AssetError, StartupError};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Scene configuration constants
pub mod consts {
    /// Scene clear color (#021631)
    pub const BACKGROUND_COLOR: [f32; 4] = [0.008, 0.086, 0.192, 1.0];

    /// Largest delta fed into one tick (tab switches produce huge gaps)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Upper bound on drained pointer events per frame
    pub const MAX_POINTER_EVENTS_PER_FRAME: usize = 8;
}

/// Move `current` toward `target` by at most `max_step`, landing exactly on it
#[inline]
pub fn move_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

/// Convert an RGB hex value (0xRRGGBB) to a linear-ish RGBA array
#[inline]
pub fn hex_color(hex: u32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_clamps_on_target() {
        assert_eq!(move_toward(-6.0, -2.0, 0.5), -5.5);
        assert_eq!(move_toward(-2.2, -2.0, 0.5), -2.0);
        assert_eq!(move_toward(1.0, -2.0, 0.5), 0.5);
        assert_eq!(move_toward(3.0, 3.0, 0.0), 3.0);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xffffff), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(hex_color(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let c = hex_color(0x27ae60);
        assert!((c[0] - 0x27 as f32 / 255.0).abs() < 1e-6);
    }
}
