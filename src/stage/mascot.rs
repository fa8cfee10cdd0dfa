//! Mascot character
//!
//! The model is requested on `enter_scene` and discarded once the exit walk
//! completes, so every visit loads it afresh. While present the mascot runs
//! a small locomotion/gesture state machine:
//!
//! ```text
//! entering -> rotating -> busy (greeting) -> idle <-> busy (gesture)
//!                any state with a model -> exiting -> (discarded)
//! ```
//!
//! Gestures only start from idle and always return to idle when their clip
//! completes.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::animation::AnimationPlayer;
use super::participant::{Participant, ParticipantKey, Reaction, Stage};
use crate::assets::{ModelAsset, Pending};
use crate::move_toward;
use crate::scene::{Node, NodeId, Ray, Shape};
use crate::tuning::MascotTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MascotState {
    /// Walking in from the spawn point
    Entering,
    /// Turning to face the viewer
    Rotating,
    /// Looping idle clip, accepts gestures
    Idle,
    /// Playing a one-shot gesture
    Busy,
    /// Walking back out; only teardown follows
    Exiting,
}

struct MascotModel {
    node: NodeId,
    player: AnimationPlayer,
}

pub struct Mascot {
    tuning: MascotTuning,
    state: MascotState,
    model: Option<MascotModel>,
    loading: Option<Pending<ModelAsset>>,
    last_interaction_ms: Option<f64>,
    streak: u32,
    rng: Pcg32,
}

impl Mascot {
    pub fn new(tuning: MascotTuning) -> Self {
        let rng = Pcg32::seed_from_u64(tuning.seed);
        Self {
            tuning,
            state: MascotState::Idle,
            model: None,
            loading: None,
            last_interaction_ms: None,
            streak: 0,
            rng,
        }
    }

    pub fn state(&self) -> MascotState {
        self.state
    }

    pub fn node(&self) -> Option<NodeId> {
        self.model.as_ref().map(|m| m.node)
    }

    pub fn is_present(&self) -> bool {
        self.model.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Name of the clip currently driving the pose
    pub fn active_clip(&self) -> Option<&str> {
        self.model.as_ref().and_then(|m| m.player.active_name())
    }

    /// Interactions counted in the current window
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Poke the mascot. Every call counts toward the interaction streak;
    /// only an idle mascot actually gestures. Returns true if a gesture
    /// started.
    pub fn interact(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_interaction_ms {
            if now_ms - last > self.tuning.interaction_window_ms {
                self.streak = 0;
            }
        }
        self.last_interaction_ms = Some(now_ms);
        self.streak += 1;

        if self.state != MascotState::Idle {
            return false;
        }
        let clip = if self.streak > self.tuning.emphatic_after {
            self.tuning.clips.emphatic.clone()
        } else {
            self.tuning.clips.greet.clone()
        };
        self.gesture(&clip)
    }

    /// Celebrate a correct answer with one of the configured clips
    pub fn correct(&mut self) -> bool {
        if self.state != MascotState::Idle || self.tuning.clips.correct.is_empty() {
            return false;
        }
        let pick = self.rng.random_range(0..self.tuning.clips.correct.len());
        let clip = self.tuning.clips.correct[pick].clone();
        self.gesture(&clip)
    }

    pub fn incorrect(&mut self) -> bool {
        if self.state != MascotState::Idle {
            return false;
        }
        let clip = self.tuning.clips.incorrect.clone();
        self.gesture(&clip)
    }

    pub fn react(&mut self, reaction: Reaction) -> bool {
        match reaction {
            Reaction::Correct => self.correct(),
            Reaction::Incorrect => self.incorrect(),
        }
    }

    /// Play a one-shot clip and go busy; a missing clip leaves the state
    /// untouched
    fn gesture(&mut self, clip: &str) -> bool {
        let Some(model) = self.model.as_mut() else {
            return false;
        };
        if model.player.play_once(clip, self.tuning.gesture_fade) {
            log::debug!("Mascot gesture: {}", clip);
            self.state = MascotState::Busy;
            true
        } else {
            false
        }
    }

    fn go_idle(&mut self) {
        self.state = MascotState::Idle;
        if let Some(model) = self.model.as_mut() {
            model.player.play_loop(&self.tuning.clips.idle, self.tuning.loop_fade);
        }
    }

    fn poll_load(&mut self, stage: &mut Stage<'_>) {
        let Some(asset) = self.loading.as_ref().and_then(Pending::take) else {
            return;
        };
        self.loading = None;
        self.spawn(stage, asset);
    }

    fn spawn(&mut self, stage: &mut Stage<'_>, asset: ModelAsset) {
        let t = &self.tuning;
        let mut node = Node::new(Shape::Model {
            name: asset.name.clone(),
            half_extents: asset.half_extents(),
            offset: asset.offset(),
        })
        .with_position(Vec3::new(t.spawn_x, t.y, 0.0));
        node.scale = Vec3::splat(t.scale);
        node.rotation_y = t.walk_rotation;

        let mut player = AnimationPlayer::from_clips(&asset.clips);
        player.play_loop(&t.clips.walk, t.loop_fade);

        self.model = Some(MascotModel {
            node: stage.scene.add(node),
            player,
        });
        self.state = MascotState::Entering;
        log::info!("Mascot {} spawned", asset.name);
    }

    fn cleanup(&mut self, stage: &mut Stage<'_>) {
        if let Some(model) = self.model.take() {
            stage.scene.remove(model.node);
        }
        self.state = MascotState::Idle;
    }

    fn step_motion(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let Some(node_id) = self.node() else {
            return;
        };
        let Some(node) = stage.scene.get_mut(node_id) else {
            return;
        };
        let t = &self.tuning;

        if self.state == MascotState::Entering {
            node.position.x = move_toward(node.position.x, t.final_x, t.walk_speed * dt);
            if node.position.x == t.final_x {
                self.state = MascotState::Rotating;
            }
        }

        match self.state {
            MascotState::Rotating => {
                node.rotation_y = move_toward(node.rotation_y, t.front_rotation, t.turn_speed * dt);
                if node.rotation_y == t.front_rotation {
                    let greet = t.clips.greet.clone();
                    if !self.gesture(&greet) {
                        self.go_idle();
                    }
                }
            }
            MascotState::Exiting => {
                node.position.x = move_toward(node.position.x, t.spawn_x, t.walk_speed * dt);
                if node.position.x == t.spawn_x {
                    log::debug!("Mascot left the scene");
                    self.cleanup(stage);
                }
            }
            MascotState::Entering | MascotState::Idle | MascotState::Busy => {}
        }
    }
}

impl Participant for Mascot {
    fn key(&self) -> ParticipantKey {
        ParticipantKey::Mascot
    }

    fn advance(&mut self, stage: &mut Stage<'_>, dt: f32) {
        self.poll_load(stage);

        let Some(model) = self.model.as_mut() else {
            return;
        };
        if model.player.update(dt).is_some() && self.state == MascotState::Busy {
            self.go_idle();
        }

        self.step_motion(stage, dt);
    }

    fn enter_scene(&mut self, stage: &mut Stage<'_>) {
        if self.model.is_some() || self.loading.is_some() {
            log::debug!("Mascot re-entering, discarding previous visit");
            self.loading = None;
            self.cleanup(stage);
        }
        self.streak = 0;
        self.last_interaction_ms = None;

        let pending = stage.assets.load_model(&self.tuning.model_path);
        self.loading = Some(pending);
        self.poll_load(stage);
    }

    fn exit_scene(&mut self, stage: &mut Stage<'_>) {
        if self.loading.take().is_some() {
            log::debug!("Mascot load cancelled");
        }
        if self.state == MascotState::Exiting {
            return;
        }
        let Some(model) = self.model.as_mut() else {
            return;
        };
        model.player.play_loop(&self.tuning.clips.walk, self.tuning.loop_fade);
        self.state = MascotState::Exiting;
        let node = model.node;
        if let Some(node) = stage.scene.get_mut(node) {
            node.rotation_y = self.tuning.exit_rotation;
        }
    }

    fn handle_pointer(&mut self, stage: &mut Stage<'_>, ray: &Ray) {
        let Some(node) = self.node() else {
            return;
        };
        if stage.scene.raycast(ray, &[node], false).is_some() {
            self.interact(stage.now_ms);
        }
    }

    fn teardown(&mut self, stage: &mut Stage<'_>) {
        self.loading = None;
        self.cleanup(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLoader, ClipInfo, DeferredLoader};
    use crate::stage::testing::Harness;
    use proptest::prelude::*;

    fn entered(h: &mut Harness) -> Mascot {
        let mut mascot = Mascot::new(MascotTuning::default());
        mascot.enter_scene(&mut h.stage());
        mascot
    }

    fn run_until(h: &mut Harness, mascot: &mut Mascot, state: MascotState) {
        for _ in 0..500 {
            if mascot.state() == state {
                return;
            }
            mascot.advance(&mut h.stage(), 0.05);
        }
        panic!("mascot never reached {:?}", state);
    }

    fn x(h: &Harness, mascot: &Mascot) -> f32 {
        h.scene.get(mascot.node().unwrap()).unwrap().position.x
    }

    #[test]
    fn test_walks_in_within_expected_ticks() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        assert_eq!(mascot.state(), MascotState::Entering);
        assert_eq!(x(&h, &mascot), -6.0);
        assert_eq!(mascot.active_clip(), Some("Walking"));

        let mut ticks = 0;
        while mascot.state() == MascotState::Entering {
            mascot.advance(&mut h.stage(), 0.05);
            ticks += 1;
        }
        assert_eq!(ticks, 32);
        assert_eq!(x(&h, &mascot), -2.0);
        assert_eq!(mascot.state(), MascotState::Rotating);
    }

    #[test]
    fn test_greets_then_idles() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        run_until(&mut h, &mut mascot, MascotState::Busy);
        assert_eq!(mascot.active_clip(), Some("Wave"));
        let node = h.scene.get(mascot.node().unwrap()).unwrap();
        assert_eq!(node.rotation_y, 0.8);

        run_until(&mut h, &mut mascot, MascotState::Idle);
        assert_eq!(mascot.active_clip(), Some("Idle"));
    }

    #[test]
    fn test_sixth_rapid_interaction_is_emphatic() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        run_until(&mut h, &mut mascot, MascotState::Idle);

        assert!(mascot.interact(0.0));
        assert_eq!(mascot.active_clip(), Some("Wave"));
        for _ in 0..4 {
            // Busy: counted but ignored
            assert!(!mascot.interact(0.0));
        }
        run_until(&mut h, &mut mascot, MascotState::Idle);

        assert!(mascot.interact(0.0));
        assert_eq!(mascot.streak(), 6);
        assert_eq!(mascot.active_clip(), Some("Punch"));
    }

    #[test]
    fn test_slow_interactions_reset_the_streak() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        for i in 0..8 {
            run_until(&mut h, &mut mascot, MascotState::Idle);
            assert!(mascot.interact(i as f64 * 3001.0));
            assert_eq!(mascot.streak(), 1);
            assert_eq!(mascot.active_clip(), Some("Wave"));
        }
    }

    #[test]
    fn test_gestures_only_from_idle() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        assert!(!mascot.correct());
        assert!(!mascot.incorrect());
        assert!(!mascot.interact(0.0));
        assert_eq!(mascot.state(), MascotState::Entering);

        run_until(&mut h, &mut mascot, MascotState::Idle);
        assert!(mascot.react(Reaction::Incorrect));
        assert_eq!(mascot.active_clip(), Some("No"));
        assert!(!mascot.react(Reaction::Correct));

        run_until(&mut h, &mut mascot, MascotState::Idle);
        assert!(mascot.correct());
        let clip = mascot.active_clip().unwrap();
        assert!(clip == "ThumbsUp" || clip == "Yes");
    }

    #[test]
    fn test_exit_walks_off_and_discards_model() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        run_until(&mut h, &mut mascot, MascotState::Idle);

        mascot.exit_scene(&mut h.stage());
        assert_eq!(mascot.state(), MascotState::Exiting);
        assert_eq!(mascot.active_clip(), Some("Walking"));
        // Exiting is terminal
        assert!(!mascot.interact(10_000.0));
        assert!(!mascot.correct());
        mascot.exit_scene(&mut h.stage());
        assert_eq!(mascot.state(), MascotState::Exiting);

        let mut ticks = 0;
        while mascot.is_present() {
            mascot.advance(&mut h.stage(), 0.05);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(h.scene.is_empty());

        // The next visit starts from scratch
        mascot.enter_scene(&mut h.stage());
        assert_eq!(mascot.state(), MascotState::Entering);
        assert_eq!(x(&h, &mascot), -6.0);
        assert_eq!(mascot.streak(), 0);
    }

    #[test]
    fn test_pointer_hits_model() {
        let mut h = Harness::new();
        let mut mascot = entered(&mut h);
        run_until(&mut h, &mut mascot, MascotState::Idle);

        // Box center: (-2, -1 + 2.4 * 0.3, 0)
        let ray = Ray::new(Vec3::new(-2.0, -0.3, 3.0), Vec3::NEG_Z);
        h.now_ms = 500.0;
        mascot.handle_pointer(&mut h.stage(), &ray);
        assert_eq!(mascot.state(), MascotState::Busy);

        let miss = Ray::new(Vec3::new(3.0, 3.0, 3.0), Vec3::NEG_Z);
        let streak = mascot.streak();
        mascot.handle_pointer(&mut h.stage(), &miss);
        assert_eq!(mascot.streak(), streak);
    }

    #[test]
    fn test_deferred_model_load() {
        let mut h = Harness::new();
        let mut loader = DeferredLoader::new();
        let mut events = Vec::new();
        let mut mascot = Mascot::new(MascotTuning::default());

        let mut stage = Stage::new(&mut h.scene, &h.camera, &mut loader, 0.0, &mut events);
        mascot.enter_scene(&mut stage);
        assert!(mascot.is_loading());
        assert!(!mascot.is_present());
        // Nothing to advance or click yet
        mascot.advance(&mut stage, 0.05);
        assert!(!mascot.interact(0.0));
        assert!(stage.scene.is_empty());
        drop(stage);

        loader.resolve_models(&ModelAsset::robot_expressive());
        let mut stage = Stage::new(&mut h.scene, &h.camera, &mut loader, 0.0, &mut events);
        mascot.advance(&mut stage, 0.05);
        assert!(mascot.is_present());
        assert_eq!(mascot.state(), MascotState::Entering);
    }

    #[test]
    fn test_exit_cancels_pending_load() {
        let mut h = Harness::new();
        let mut loader = DeferredLoader::new();
        let mut events = Vec::new();
        let mut mascot = Mascot::new(MascotTuning::default());

        let mut stage = Stage::new(&mut h.scene, &h.camera, &mut loader, 0.0, &mut events);
        mascot.enter_scene(&mut stage);
        mascot.exit_scene(&mut stage);
        assert!(!mascot.is_loading());
        drop(stage);

        loader.resolve_models(&ModelAsset::robot_expressive());
        let mut stage = Stage::new(&mut h.scene, &h.camera, &mut loader, 0.0, &mut events);
        mascot.advance(&mut stage, 0.05);
        assert!(!mascot.is_present());
        assert!(stage.scene.is_empty());
    }

    #[test]
    fn test_missing_greeting_goes_idle() {
        let mut h = Harness::new();
        h.loader.model.clips = vec![
            ClipInfo {
                name: "Walking".to_string(),
                duration: 1.0,
            },
            ClipInfo {
                name: "Idle".to_string(),
                duration: 2.0,
            },
        ];
        assert!(h.loader.load_model("x").is_ready());
        let mut mascot = entered(&mut h);
        run_until(&mut h, &mut mascot, MascotState::Idle);
        assert_eq!(mascot.active_clip(), Some("Idle"));
        assert!(!mascot.interact(0.0));
        assert_eq!(mascot.state(), MascotState::Idle);
    }

    proptest! {
        #[test]
        fn prop_streak_counts_calls_since_last_gap(gaps in proptest::collection::vec(0.0f64..6000.0, 1..30)) {
            let mut mascot = Mascot::new(MascotTuning::default());
            let mut now = 0.0;
            let mut expected = 0u32;
            for (i, gap) in gaps.iter().enumerate() {
                if i > 0 {
                    now += gap;
                    if *gap > 3000.0 {
                        expected = 0;
                    }
                }
                mascot.interact(now);
                expected += 1;
                prop_assert_eq!(mascot.streak(), expected);
            }
        }
    }
}
