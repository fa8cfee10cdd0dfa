//! Orchestration core
//!
//! The [`Director`] owns the shared scene and drives four participants every
//! tick: the starfield background, the mascot and the two focus-holding
//! screens (landing and quiz). Participants never call each other; they emit
//! [`StageEvent`]s which the director routes once the emitting hook returns.

pub mod animation;
pub mod background;
pub mod director;
pub mod landing;
pub mod mascot;
pub mod participant;
pub mod question;
pub mod quiz;
pub mod schedule;

pub use animation::{AnimationPlayer, Playback};
pub use background::Background;
pub use director::{Director, HostRequest, RenderSurface};
pub use landing::{Landing, LandingPhase};
pub use mascot::{Mascot, MascotState};
pub use participant::{Focus, Participant, ParticipantKey, Reaction, Stage, StageEvent};
pub use question::{Question, QuestionDeck, QuestionSource};
pub use quiz::{Quiz, QuizPhase};
pub use schedule::Schedule;

#[cfg(test)]
pub(crate) mod testing {
    use super::participant::{Stage, StageEvent};
    use crate::assets::{FontAsset, ImmediateLoader, Pending};
    use crate::scene::{Camera, SceneGraph};
    use crate::tuning::CameraTuning;

    /// Everything a participant hook needs, owned in one place
    pub struct Harness {
        pub scene: SceneGraph,
        pub camera: Camera,
        pub loader: ImmediateLoader,
        pub events: Vec<StageEvent>,
        pub now_ms: f64,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                scene: SceneGraph::new(),
                camera: Camera::new(&CameraTuning::default(), 800, 600),
                loader: ImmediateLoader::default(),
                events: Vec::new(),
                now_ms: 0.0,
            }
        }

        pub fn stage(&mut self) -> Stage<'_> {
            Stage::new(
                &mut self.scene,
                &self.camera,
                &mut self.loader,
                self.now_ms,
                &mut self.events,
            )
        }

        pub fn font(&self) -> Pending<FontAsset> {
            Pending::ready(FontAsset::helvetiker())
        }
    }
}
