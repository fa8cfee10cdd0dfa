//! Data-driven constants
//!
//! Every speed, threshold and layout number the participants use lives here.
//! A partial JSON document can override any subset of them.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::stage::question::Question;

/// Camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Camera distance from the origin along +Z
    pub z: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            z: 3.0,
        }
    }
}

/// Starfield parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundTuning {
    pub star_count: usize,
    /// Width/height of the box stars are scattered in
    pub spread: f32,
    /// How far behind the origin stars may start
    pub depth: f32,
    /// Drift toward the camera (units per second)
    pub drift_speed: f32,
    /// Z a star is recycled to after passing the camera
    pub recycle_z: f32,
    pub point_size: f32,
    pub seed: u64,
}

impl Default for BackgroundTuning {
    fn default() -> Self {
        Self {
            star_count: 5000,
            spread: 500.0,
            depth: 500.0,
            drift_speed: 48.0,
            recycle_z: -200.0,
            point_size: 0.2,
            seed: 0x5eed_57a2,
        }
    }
}

/// Landing screen parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingTuning {
    pub button_start_y: f32,
    pub button_target_y: f32,
    /// Fraction of the remaining distance covered per tick
    pub ease_gain: f32,
    /// Slide-out speed (units per second)
    pub slide_speed: f32,
    /// Button Y below which the landing screen is finished
    pub hide_threshold_y: f32,
    /// Delay before the first button entrance (seconds)
    pub first_reveal_delay: f32,
    /// Delay before the button entrance on re-entry (seconds)
    pub reenter_reveal_delay: f32,
    pub button_size: [f32; 3],
    pub button_color: u32,
    pub button_opacity: f32,
    pub label: String,
    pub label_size: f32,
    pub globe_y: f32,
    pub globe_radius: f32,
    pub globe_color: u32,
    /// Globe spin (radians per second)
    pub globe_spin: f32,
}

impl Default for LandingTuning {
    fn default() -> Self {
        Self {
            button_start_y: -3.0,
            button_target_y: -0.2,
            ease_gain: 0.08,
            slide_speed: 12.0,
            hide_threshold_y: -6.0,
            first_reveal_delay: 1.0,
            reenter_reveal_delay: 0.3,
            button_size: [1.5, 0.4, 0.2],
            button_color: 0x1e90ff,
            button_opacity: 0.5,
            label: "MULAI".to_string(),
            label_size: 0.18,
            globe_y: 1.0,
            globe_radius: 0.6,
            globe_color: 0xa8a9ad,
            globe_spin: 1.8,
        }
    }
}

/// Clip names the mascot model is expected to carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MascotClips {
    pub walk: String,
    pub idle: String,
    pub greet: String,
    pub emphatic: String,
    pub correct: Vec<String>,
    pub incorrect: String,
}

impl Default for MascotClips {
    fn default() -> Self {
        Self {
            walk: "Walking".to_string(),
            idle: "Idle".to_string(),
            greet: "Wave".to_string(),
            emphatic: "Punch".to_string(),
            correct: vec!["ThumbsUp".to_string(), "Yes".to_string()],
            incorrect: "No".to_string(),
        }
    }
}

/// Mascot parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MascotTuning {
    pub model_path: String,
    pub spawn_x: f32,
    pub final_x: f32,
    pub y: f32,
    pub scale: f32,
    pub walk_rotation: f32,
    pub front_rotation: f32,
    pub exit_rotation: f32,
    /// Walk speed (units per second)
    pub walk_speed: f32,
    /// Turn speed (radians per second)
    pub turn_speed: f32,
    /// Interactions closer together than this count toward the streak
    pub interaction_window_ms: f64,
    /// Streak length above which the emphatic gesture plays
    pub emphatic_after: u32,
    pub loop_fade: f32,
    pub gesture_fade: f32,
    pub clips: MascotClips,
    pub seed: u64,
}

impl Default for MascotTuning {
    fn default() -> Self {
        Self {
            model_path: "models/RobotExpressive.json".to_string(),
            spawn_x: -6.0,
            final_x: -2.0,
            y: -1.0,
            scale: 0.3,
            walk_rotation: -FRAC_PI_2,
            front_rotation: 0.8,
            exit_rotation: FRAC_PI_2,
            walk_speed: 2.5,
            turn_speed: 3.0,
            interaction_window_ms: 3000.0,
            emphatic_after: 5,
            loop_fade: 0.3,
            gesture_fade: 0.2,
            clips: MascotClips::default(),
            seed: 0x00c0_ffee,
        }
    }
}

/// Quiz parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizTuning {
    /// Z of the quiz plane
    pub depth: f32,
    pub padding: f32,
    pub close_size: f32,
    pub close_color: u32,
    pub board_size: [f32; 2],
    pub board_start_y: f32,
    pub board_target_y: f32,
    pub panel_color: u32,
    pub panel_radius: f32,
    pub credit_size: [f32; 2],
    /// How far below the viewport the credit panel starts
    pub credit_offscreen: f32,
    /// Resting distance of the credit panel above the viewport bottom
    pub credit_margin: f32,
    /// Board and credit slide-in speed (units per second)
    pub slide_speed: f32,
    /// Slide-out speed after back-navigation (units per second)
    pub exit_speed: f32,
    /// Milliseconds per revealed intro character
    pub typing_interval_ms: f32,
    pub intro_message: String,
    pub text_size: f32,
    pub text_color: u32,
    pub next_label: String,
    pub next_size: [f32; 2],
    pub next_color: u32,
    /// Next button distance above the viewport bottom
    pub next_bottom_offset: f32,
    pub option_size: [f32; 2],
    pub option_spacing: f32,
    /// Offset of the first option below the board target
    pub option_offset: f32,
    pub option_color: u32,
    pub correct_color: u32,
    pub incorrect_color: u32,
    pub credit_prefix: String,
    pub credit_author: String,
    pub credit_url: String,
    pub link_color: u32,
    pub credit_text_size: f32,
}

impl Default for QuizTuning {
    fn default() -> Self {
        Self {
            depth: -3.0,
            padding: 0.5,
            close_size: 0.8,
            close_color: 0xe53935,
            board_size: [6.0, 3.0],
            board_start_y: 5.0,
            board_target_y: 0.6,
            panel_color: 0xffffff,
            panel_radius: 40.0 / 512.0,
            credit_size: [5.0, 0.9],
            credit_offscreen: 1.2,
            credit_margin: 0.6,
            slide_speed: 6.0,
            exit_speed: 6.0,
            typing_interval_ms: 40.0,
            intro_message: "Tekan berikutnya untuk memulai".to_string(),
            text_size: 0.22,
            text_color: 0x000000,
            next_label: "Berikutnya".to_string(),
            next_size: [2.6, 0.9],
            next_color: 0x27ae60,
            next_bottom_offset: 2.3,
            option_size: [3.2, 0.8],
            option_spacing: 1.1,
            option_offset: 2.2,
            option_color: 0x3498db,
            correct_color: 0x27ae60,
            incorrect_color: 0xe74c3c,
            credit_prefix: "Model created by".to_string(),
            credit_author: "Tomas Laulhe".to_string(),
            credit_url: "https://www.patreon.com/quaternius".to_string(),
            link_color: 0x2980b9,
            credit_text_size: 0.18,
        }
    }
}

/// All tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub camera: CameraTuning,
    pub background: BackgroundTuning,
    pub landing: LandingTuning,
    pub mascot: MascotTuning,
    pub quiz: QuizTuning,
    pub font_path: String,
    pub questions: Vec<Question>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            camera: CameraTuning::default(),
            background: BackgroundTuning::default(),
            landing: LandingTuning::default(),
            mascot: MascotTuning::default(),
            quiz: QuizTuning::default(),
            font_path: "fonts/helvetiker_regular.json".to_string(),
            questions: vec![Question::sample()],
        }
    }
}

impl Tuning {
    /// Overlay a (partial) JSON document on the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "mascot": { "walk_speed": 4.0 } }"#).unwrap();
        assert_eq!(tuning.mascot.walk_speed, 4.0);
        assert_eq!(tuning.mascot.spawn_x, -6.0);
        assert_eq!(tuning.landing, LandingTuning::default());
        assert_eq!(tuning.questions.len(), 1);
    }

    #[test]
    fn test_questions_override() {
        let json = r#"{ "questions": [
            { "prompt": "2 + 2?", "options": ["3", "4", "5"], "correct_answer": 2 }
        ] }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.questions[0].options.len(), 3);
        assert_eq!(tuning.questions[0].correct_answer, 2);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
