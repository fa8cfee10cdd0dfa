//! The application director
//!
//! Owns the shared scene and the focus token. Each frame it advances the
//! background and mascot unconditionally, then the focused screen; if that
//! screen reports finished it exits it, enters the other one and flips
//! focus. The newly focused screen is not advanced until the next tick.
//!
//! Events emitted by a hook are routed as soon as the hook returns, so the
//! mascot reacts to a click in the same dispatch that produced it.

use std::collections::VecDeque;

use glam::Vec2;

use super::background::Background;
use super::landing::Landing;
use super::mascot::Mascot;
use super::participant::{Focus, Participant, ParticipantKey, Stage, StageEvent};
use super::question::QuestionDeck;
use super::quiz::Quiz;
use crate::assets::AssetLoader;
use crate::clock::{Clock, FrameClock};
use crate::consts::MAX_POINTER_EVENTS_PER_FRAME;
use crate::scene::{Camera, Ray, SceneGraph};
use crate::tuning::Tuning;

/// Something the scene can be drawn onto
pub trait RenderSurface {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
    fn resize(&mut self, width: u32, height: u32);
}

/// Side effects only the host can perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    OpenLink(String),
}

pub struct Director {
    scene: SceneGraph,
    camera: Camera,
    assets: Box<dyn AssetLoader>,
    clock: Box<dyn Clock>,
    frame_clock: FrameClock,
    now_ms: f64,
    background: Background,
    mascot: Mascot,
    landing: Landing,
    quiz: Quiz,
    focus: Focus,
    events: Vec<StageEvent>,
    clicks: VecDeque<Vec2>,
    host_requests: Vec<HostRequest>,
    /// Lifecycle hooks run by handoffs, oldest first
    #[cfg(test)]
    journal: Vec<(ParticipantKey, &'static str)>,
}

impl Director {
    pub fn new(
        tuning: Tuning,
        mut assets: Box<dyn AssetLoader>,
        clock: Box<dyn Clock>,
        width: u32,
        height: u32,
    ) -> Self {
        let font = assets.load_font(&tuning.font_path);
        let now_ms = clock.now_ms();

        let mut director = Self {
            scene: SceneGraph::new(),
            camera: Camera::new(&tuning.camera, width, height),
            assets,
            clock,
            frame_clock: FrameClock::new(),
            now_ms,
            background: Background::new(tuning.background),
            mascot: Mascot::new(tuning.mascot),
            landing: Landing::new(tuning.landing, font.clone()),
            quiz: Quiz::new(
                tuning.quiz,
                font,
                Box::new(QuestionDeck::new(tuning.questions)),
            ),
            focus: Focus::Landing,
            events: Vec::new(),
            clicks: VecDeque::new(),
            host_requests: Vec::new(),
            #[cfg(test)]
            journal: Vec::new(),
        };
        for key in ParticipantKey::ALL {
            director.hook(key, |p, s| p.initialize(s));
        }
        log::info!("Director ready, focus on {}", director.focus.key().as_str());
        director
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn mascot(&self) -> &Mascot {
        &self.mascot
    }

    pub fn landing(&self) -> &Landing {
        &self.landing
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Look a participant up by key
    pub fn participant(&self, key: ParticipantKey) -> &dyn Participant {
        match key {
            ParticipantKey::Background => &self.background,
            ParticipantKey::Mascot => &self.mascot,
            ParticipantKey::Landing => &self.landing,
            ParticipantKey::Quiz => &self.quiz,
        }
    }

    /// Look a participant up by its symbolic name
    pub fn participant_named(&self, name: &str) -> Option<&dyn Participant> {
        ParticipantKey::from_str(name).map(|key| self.participant(key))
    }

    /// Run one hook against a participant with the shared state lent out
    fn call<R>(
        &mut self,
        key: ParticipantKey,
        f: impl FnOnce(&mut dyn Participant, &mut Stage<'_>) -> R,
    ) -> R {
        let mut stage = Stage::new(
            &mut self.scene,
            &self.camera,
            &mut *self.assets,
            self.now_ms,
            &mut self.events,
        );
        let participant: &mut dyn Participant = match key {
            ParticipantKey::Background => &mut self.background,
            ParticipantKey::Mascot => &mut self.mascot,
            ParticipantKey::Landing => &mut self.landing,
            ParticipantKey::Quiz => &mut self.quiz,
        };
        f(participant, &mut stage)
    }

    /// Run a hook, then route whatever it emitted
    fn hook(
        &mut self,
        key: ParticipantKey,
        f: impl FnOnce(&mut dyn Participant, &mut Stage<'_>),
    ) {
        self.call(key, f);
        self.route_events();
    }

    fn route_events(&mut self) {
        while !self.events.is_empty() {
            for event in std::mem::take(&mut self.events) {
                match event {
                    StageEvent::MascotEnter => {
                        log::debug!("Mascot entering");
                        self.call(ParticipantKey::Mascot, |p, s| p.enter_scene(s));
                    }
                    StageEvent::MascotExit => {
                        log::debug!("Mascot exiting");
                        self.call(ParticipantKey::Mascot, |p, s| p.exit_scene(s));
                    }
                    StageEvent::MascotReact(reaction) => {
                        if !self.mascot.react(reaction) {
                            log::debug!("Mascot busy, {:?} reaction skipped", reaction);
                        }
                    }
                    StageEvent::OpenLink(url) => {
                        log::info!("Link requested: {}", url);
                        self.host_requests.push(HostRequest::OpenLink(url));
                    }
                }
            }
        }
    }

    /// Advance the whole stage by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.hook(ParticipantKey::Background, |p, s| p.advance(s, dt));
        self.hook(ParticipantKey::Mascot, |p, s| p.advance(s, dt));

        let focused = self.focus.key();
        self.hook(focused, |p, s| p.advance(s, dt));
        if self.participant(focused).is_finished() {
            self.hand_off();
        }
    }

    fn hand_off(&mut self) {
        let from = self.focus;
        let to = from.next();
        self.lifecycle(from.key(), "exit_scene", |p, s| p.exit_scene(s));
        self.lifecycle(to.key(), "enter_scene", |p, s| p.enter_scene(s));
        self.focus = to;
        log::info!(
            "Focus handed from {} to {}",
            from.key().as_str(),
            to.key().as_str()
        );
    }

    /// The outgoing screen always exits before the incoming one enters
    fn lifecycle(
        &mut self,
        key: ParticipantKey,
        name: &'static str,
        f: impl FnOnce(&mut dyn Participant, &mut Stage<'_>),
    ) {
        log::debug!("{} {}", key.as_str(), name);
        #[cfg(test)]
        self.journal.push((key, name));
        self.hook(key, f);
    }

    /// Read the clock, tick, drain queued clicks, then draw. Returns the
    /// delta that was applied.
    pub fn frame(&mut self, surface: &mut dyn RenderSurface) -> f32 {
        self.now_ms = self.clock.now_ms();
        let dt = self.frame_clock.delta(self.now_ms);
        self.tick(dt);

        for _ in 0..MAX_POINTER_EVENTS_PER_FRAME {
            let Some(ndc) = self.clicks.pop_front() else {
                break;
            };
            self.dispatch_click_ndc(ndc);
        }

        surface.render(&self.scene, &self.camera);
        dt
    }

    /// Queue a click (normalized device coordinates) for the next frame
    pub fn queue_click(&mut self, ndc: Vec2) {
        if self.clicks.len() >= MAX_POINTER_EVENTS_PER_FRAME {
            log::debug!("Pointer queue full, dropping oldest click");
            self.clicks.pop_front();
        }
        self.clicks.push_back(ndc);
    }

    pub fn pending_clicks(&self) -> usize {
        self.clicks.len()
    }

    /// The focused screen sees the ray first, then the mascot
    pub fn dispatch_pointer(&mut self, ray: &Ray) {
        self.now_ms = self.clock.now_ms();
        self.hook(self.focus.key(), |p, s| p.handle_pointer(s, ray));
        self.hook(ParticipantKey::Mascot, |p, s| p.handle_pointer(s, ray));
    }

    pub fn dispatch_click_ndc(&mut self, ndc: Vec2) {
        let ray = self.camera.ray_from_ndc(ndc);
        self.dispatch_pointer(&ray);
    }

    pub fn resize(&mut self, width: u32, height: u32, surface: &mut dyn RenderSurface) {
        self.camera.resize(width, height);
        surface.resize(width, height);
        log::debug!("Resized to {}x{}", width, height);
    }

    /// Requests the host should act on, oldest first
    pub fn take_host_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.host_requests)
    }

    /// Release every participant's scene nodes
    pub fn shutdown(&mut self) {
        for key in ParticipantKey::ALL {
            self.call(key, |p, s| p.teardown(s));
        }
        self.events.clear();
        self.clicks.clear();
    }
}
