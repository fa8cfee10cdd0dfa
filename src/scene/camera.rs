//! Perspective camera
//!
//! Fixed orientation looking down -Z from `position`.

use glam::{Mat4, Vec2, Vec3};

use super::ray::Ray;
use crate::tuning::CameraTuning;

#[derive(Debug, Clone)]
pub struct Camera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    projection: Mat4,
}

impl Camera {
    pub fn new(tuning: &CameraTuning, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_deg: tuning.fov_deg,
            aspect: 1.0,
            near: tuning.near,
            far: tuning.far,
            position: Vec3::new(0.0, 0.0, tuning.z),
            projection: Mat4::IDENTITY,
        };
        camera.resize(width, height);
        camera
    }

    /// `aspect = width / height`, then recompute the projection.
    /// A zero-sized surface keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }

    /// Visible width/height of a plane `distance` in front of the camera
    pub fn view_size(&self, distance: f32) -> Vec2 {
        let v_fov = self.fov_deg.to_radians();
        let height = 2.0 * (v_fov / 2.0).tan() * distance;
        Vec2::new(height * self.aspect, height)
    }

    /// Ray from the camera through a normalized-device-coordinate point
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let target = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, target - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&CameraTuning::default(), 1600, 900)
    }

    #[test]
    fn test_resize_sets_aspect() {
        let mut cam = camera();
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        cam.resize(800, 800);
        assert_eq!(cam.aspect, 1.0);
        // Degenerate sizes are ignored
        cam.resize(800, 0);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let ray = camera().ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 3.0));
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_edge_ray_matches_view_size() {
        let cam = camera();
        let distance = 6.0;
        let size = cam.view_size(distance);
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 1.0));
        let t = distance / -ray.dir.z;
        let hit = ray.at(t);
        assert!((hit.x - size.x / 2.0).abs() < 1e-3);
        assert!((hit.y - size.y / 2.0).abs() < 1e-3);
    }
}
