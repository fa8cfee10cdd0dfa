//! Landing screen
//!
//! A spinning globe and a start button. The button eases up into view after
//! a delay; clicking it slides both away and, once past the threshold, the
//! landing screen reports finished.

use glam::{Vec2, Vec3};

use super::participant::{Participant, ParticipantKey, Stage, StageEvent};
use super::schedule::Schedule;
use crate::assets::{FontAsset, Pending};
use crate::hex_color;
use crate::scene::{Node, NodeId, Ray, Shape};
use crate::tuning::LandingTuning;

/// Below this distance the eased button snaps onto its target
const EASE_SNAP: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingPhase {
    /// Globe and button on screen, button possibly still easing in
    Display,
    /// Start was clicked: button and globe slide out
    Migrating,
    /// Slide-out finished, both hidden
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LandingTask {
    RevealButton,
}

pub struct Landing {
    tuning: LandingTuning,
    font: Pending<FontAsset>,
    globe: Option<NodeId>,
    button: Option<NodeId>,
    label: Option<NodeId>,
    phase: LandingPhase,
    button_moving: bool,
    finished: bool,
    schedule: Schedule<LandingTask>,
}

impl Landing {
    pub fn new(tuning: LandingTuning, font: Pending<FontAsset>) -> Self {
        Self {
            tuning,
            font,
            globe: None,
            button: None,
            label: None,
            phase: LandingPhase::Display,
            button_moving: false,
            finished: false,
            schedule: Schedule::new(),
        }
    }

    pub fn phase(&self) -> LandingPhase {
        self.phase
    }

    pub fn button(&self) -> Option<NodeId> {
        self.button
    }

    pub fn globe(&self) -> Option<NodeId> {
        self.globe
    }

    pub fn label(&self) -> Option<NodeId> {
        self.label
    }

    pub fn button_moving(&self) -> bool {
        self.button_moving
    }

    fn create_button(&self, stage: &mut Stage<'_>) -> NodeId {
        let t = &self.tuning;
        let button = stage.scene.add(
            Node::new(Shape::Group).with_position(Vec3::new(0.0, t.button_start_y, 0.0)),
        );
        let mut color = hex_color(t.button_color);
        color[3] = t.button_opacity;
        stage.scene.add_child(
            button,
            Node::new(Shape::Cuboid {
                size: Vec3::from_array(t.button_size),
            })
            .with_color(color),
        );
        button
    }

    fn create_globe(&self, stage: &mut Stage<'_>) -> NodeId {
        stage.scene.add(
            Node::new(Shape::Sphere {
                radius: self.tuning.globe_radius,
            })
            .with_position(Vec3::new(0.0, self.tuning.globe_y, 0.0))
            .with_color(hex_color(self.tuning.globe_color)),
        )
    }

    /// The label needs the font; until it arrives the button has no text
    fn ensure_label(&mut self, stage: &mut Stage<'_>) {
        if self.label.is_some() {
            return;
        }
        let (Some(button), Some(font)) = (self.button, self.font.get()) else {
            return;
        };
        let size = self.tuning.label_size;
        let extent: Vec2 = font.measure(&self.tuning.label, size);
        self.label = stage.scene.add_child(
            button,
            Node::new(Shape::Text {
                content: self.tuning.label.clone(),
                size,
                extent,
            })
            .with_position(Vec3::new(0.0, 0.0, self.tuning.button_size[2] / 2.0 + 0.01))
            .with_render_order(1),
        );
    }

    /// Proportional ease toward the target: covers `ease_gain` of the
    /// remaining distance per tick and never passes the target
    fn ease_button(&mut self, stage: &mut Stage<'_>) {
        let Some(button) = self.button else {
            return;
        };
        let Some(y) = stage.scene.y(button) else {
            return;
        };
        let target = self.tuning.button_target_y;
        if y < target {
            let mut next = y + (target - y) * self.tuning.ease_gain;
            if target - next < EASE_SNAP || next > target {
                next = target;
            }
            stage.scene.set_y(button, next);
        }
    }

    fn slide_out(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let step = self.tuning.slide_speed * dt;
        if let Some(globe) = self.globe {
            if let Some(y) = stage.scene.y(globe) {
                stage.scene.set_y(globe, y + step);
            }
        }
        let Some(button) = self.button else {
            self.hide(stage);
            return;
        };
        let y = stage.scene.y(button).unwrap_or(f32::NEG_INFINITY) - step;
        stage.scene.set_y(button, y);

        if y < self.tuning.hide_threshold_y {
            self.hide(stage);
        }
    }

    fn hide(&mut self, stage: &mut Stage<'_>) {
        if let Some(globe) = self.globe {
            stage.scene.set_visible(globe, false);
        }
        if let Some(button) = self.button {
            stage.scene.set_visible(button, false);
        }
        self.phase = LandingPhase::Hidden;
        self.finished = true;
        log::debug!("Landing slide-out complete");
    }
}

impl Participant for Landing {
    fn key(&self) -> ParticipantKey {
        ParticipantKey::Landing
    }

    fn initialize(&mut self, stage: &mut Stage<'_>) {
        if self.button.is_some() {
            log::warn!("Landing already initialized");
            return;
        }
        self.button = Some(self.create_button(stage));
        self.globe = Some(self.create_globe(stage));
        self.ensure_label(stage);
        self.schedule
            .after(self.tuning.first_reveal_delay, LandingTask::RevealButton);
    }

    fn advance(&mut self, stage: &mut Stage<'_>, dt: f32) {
        for task in self.schedule.advance(dt) {
            match task {
                LandingTask::RevealButton => {
                    if self.button.is_some() {
                        self.button_moving = true;
                    }
                }
            }
        }

        self.ensure_label(stage);

        if let Some(globe) = self.globe {
            if let Some(node) = stage.scene.get_mut(globe) {
                node.rotation_y += self.tuning.globe_spin * dt;
            }
        }

        match self.phase {
            LandingPhase::Display => {
                if self.button_moving {
                    self.ease_button(stage);
                }
            }
            LandingPhase::Migrating => self.slide_out(stage, dt),
            LandingPhase::Hidden => {}
        }
    }

    fn enter_scene(&mut self, stage: &mut Stage<'_>) {
        self.phase = LandingPhase::Display;
        self.finished = false;
        self.button_moving = false;

        if let Some(globe) = self.globe {
            stage.scene.set_visible(globe, true);
            stage.scene.set_y(globe, self.tuning.globe_y);
        }
        if let Some(button) = self.button {
            stage.scene.set_visible(button, true);
            stage.scene.set_y(button, self.tuning.button_start_y);
        }

        self.schedule.clear();
        self.schedule
            .after(self.tuning.reenter_reveal_delay, LandingTask::RevealButton);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn handle_pointer(&mut self, stage: &mut Stage<'_>, ray: &Ray) {
        if self.phase != LandingPhase::Display || self.finished {
            return;
        }
        let Some(button) = self.button else {
            return;
        };
        if stage.scene.raycast(ray, &[button], true).is_some() {
            log::info!("Start clicked");
            self.phase = LandingPhase::Migrating;
            stage.emit(StageEvent::MascotEnter);
        }
    }

    fn teardown(&mut self, stage: &mut Stage<'_>) {
        self.schedule.clear();
        if let Some(globe) = self.globe.take() {
            stage.scene.remove(globe);
        }
        if let Some(button) = self.button.take() {
            stage.scene.remove(button);
        }
        self.label = None;
        self.button_moving = false;
    }
}
