//! Starfield background
//!
//! Stars drift toward the camera and are recycled to the far boundary once
//! they pass it. No focus, pointer or finish semantics.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::participant::{Participant, ParticipantKey, Stage};
use crate::scene::{NodeId, Node, Shape};
use crate::tuning::BackgroundTuning;

pub struct Background {
    tuning: BackgroundTuning,
    stars: Option<NodeId>,
}

impl Background {
    pub fn new(tuning: BackgroundTuning) -> Self {
        Self {
            tuning,
            stars: None,
        }
    }

    pub fn stars(&self) -> Option<NodeId> {
        self.stars
    }

    fn scatter(&self) -> Vec<Vec3> {
        let mut rng = Pcg32::seed_from_u64(self.tuning.seed);
        let spread = self.tuning.spread;
        let depth = self.tuning.depth;
        (0..self.tuning.star_count)
            .map(|_| {
                Vec3::new(
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                    -rng.random::<f32>() * depth,
                )
            })
            .collect()
    }
}

impl Participant for Background {
    fn key(&self) -> ParticipantKey {
        ParticipantKey::Background
    }

    fn initialize(&mut self, stage: &mut Stage<'_>) {
        if self.stars.is_some() {
            log::warn!("Background already initialized");
            return;
        }
        let node = Node::new(Shape::Points {
            positions: self.scatter(),
            size: self.tuning.point_size,
        })
        .with_render_order(-100);
        self.stars = Some(stage.scene.add(node));
        log::debug!("Starfield created with {} stars", self.tuning.star_count);
    }

    fn advance(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let Some(id) = self.stars else {
            return;
        };
        let camera_z = stage.camera.position.z;
        let drift = self.tuning.drift_speed * dt;
        let recycle_z = self.tuning.recycle_z;

        if let Some(Shape::Points { positions, .. }) =
            stage.scene.get_mut(id).map(|n| &mut n.shape)
        {
            for p in positions.iter_mut() {
                p.z += drift;
                if p.z > camera_z {
                    p.z = recycle_z;
                }
            }
        }
    }

    fn teardown(&mut self, stage: &mut Stage<'_>) {
        if let Some(id) = self.stars.take() {
            stage.scene.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImmediateLoader;
    use crate::scene::{Camera, SceneGraph};
    use crate::tuning::CameraTuning;

    fn tuning() -> BackgroundTuning {
        BackgroundTuning {
            star_count: 50,
            ..BackgroundTuning::default()
        }
    }

    fn positions(scene: &SceneGraph, id: NodeId) -> Vec<Vec3> {
        match &scene.get(id).unwrap().shape {
            Shape::Points { positions, .. } => positions.clone(),
            _ => panic!("not a point cloud"),
        }
    }

    #[test]
    fn test_stars_drift_and_recycle() {
        let mut scene = SceneGraph::new();
        let camera = Camera::new(&CameraTuning::default(), 800, 600);
        let mut loader = ImmediateLoader::default();
        let mut events = Vec::new();
        let mut stage = Stage::new(&mut scene, &camera, &mut loader, 0.0, &mut events);

        let mut bg = Background::new(tuning());
        // Advancing before initialize is a no-op
        bg.advance(&mut stage, 0.1);
        bg.initialize(&mut stage);
        let id = bg.stars().unwrap();

        let before = positions(stage.scene, id);
        assert_eq!(before.len(), 50);
        assert!(before.iter().all(|p| p.z <= 0.0 && p.z >= -500.0));

        bg.advance(&mut stage, 0.5);
        let after = positions(stage.scene, id);
        for (b, a) in before.iter().zip(&after) {
            let drifted = b.z + 24.0;
            if drifted > 3.0 {
                assert_eq!(a.z, -200.0);
            } else {
                assert!((a.z - drifted).abs() < 1e-3);
            }
            assert_eq!((a.x, a.y), (b.x, b.y));
        }

        // Zero delta leaves everything where it is
        bg.advance(&mut stage, 0.0);
        assert_eq!(positions(stage.scene, id), after);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut scene = SceneGraph::new();
        let camera = Camera::new(&CameraTuning::default(), 800, 600);
        let mut loader = ImmediateLoader::default();
        let mut events = Vec::new();
        let mut stage = Stage::new(&mut scene, &camera, &mut loader, 0.0, &mut events);

        let mut bg = Background::new(tuning());
        bg.teardown(&mut stage);
        bg.initialize(&mut stage);
        bg.teardown(&mut stage);
        bg.teardown(&mut stage);
        assert!(bg.stars().is_none());
        assert!(stage.scene.is_empty());
    }
}
