//! Clip playback for a loaded model
//!
//! Tracks which clip is playing, how far along it is and cross-fade weights.
//! One-shot clips clamp on their last frame and report completion exactly
//! once; starting another clip discards a pending completion.

use std::collections::HashMap;

use crate::assets::ClipInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Loop,
    Once,
}

/// A clip currently contributing to the pose
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveClip {
    pub name: String,
    pub time: f32,
    pub duration: f32,
    pub playback: Playback,
    /// Blend weight, 0..=1
    pub weight: f32,
    /// Seconds to go from 0 to full weight (or back)
    fade: f32,
    finished: bool,
}

impl ActiveClip {
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    durations: HashMap<String, f32>,
    active: Option<ActiveClip>,
    fading_out: Option<ActiveClip>,
}

impl AnimationPlayer {
    pub fn from_clips(clips: &[ClipInfo]) -> Self {
        Self {
            durations: clips
                .iter()
                .map(|c| (c.name.clone(), c.duration.max(0.0)))
                .collect(),
            active: None,
            fading_out: None,
        }
    }

    pub fn active(&self) -> Option<&ActiveClip> {
        self.active.as_ref()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.name.as_str())
    }

    pub fn fading_out(&self) -> Option<&ActiveClip> {
        self.fading_out.as_ref()
    }

    /// Start a looping clip from its first frame. Returns false (and changes
    /// nothing) if the model has no such clip.
    pub fn play_loop(&mut self, name: &str, fade: f32) -> bool {
        self.start(name, Playback::Loop, fade)
    }

    /// Start a one-shot clip from its first frame
    pub fn play_once(&mut self, name: &str, fade: f32) -> bool {
        self.start(name, Playback::Once, fade)
    }

    fn start(&mut self, name: &str, playback: Playback, fade: f32) -> bool {
        let Some(&duration) = self.durations.get(name) else {
            log::debug!("Clip {} not found, ignoring", name);
            return false;
        };
        let fade = fade.max(0.0);
        if let Some(mut previous) = self.active.take() {
            previous.fade = fade;
            self.fading_out = Some(previous);
        }
        self.active = Some(ActiveClip {
            name: name.to_string(),
            time: 0.0,
            duration,
            playback,
            weight: if fade > 0.0 { 0.0 } else { 1.0 },
            fade,
            finished: false,
        });
        true
    }

    /// Advance playback. Returns the name of a one-shot clip that completed
    /// during this step.
    pub fn update(&mut self, dt: f32) -> Option<String> {
        let dt = dt.max(0.0);

        if let Some(old) = self.fading_out.as_mut() {
            old.weight = if old.fade > 0.0 {
                (old.weight - dt / old.fade).max(0.0)
            } else {
                0.0
            };
            if old.weight <= 0.0 {
                self.fading_out = None;
            }
        }

        let clip = self.active.as_mut()?;
        clip.weight = if clip.fade > 0.0 {
            (clip.weight + dt / clip.fade).min(1.0)
        } else {
            1.0
        };

        match clip.playback {
            Playback::Loop => {
                if clip.duration > 0.0 {
                    clip.time = (clip.time + dt) % clip.duration;
                }
                None
            }
            Playback::Once => {
                if clip.finished {
                    return None;
                }
                clip.time = (clip.time + dt).min(clip.duration);
                if clip.time >= clip.duration {
                    clip.finished = true;
                    Some(clip.name.clone())
                } else {
                    None
                }
            }
        }
    }
}
