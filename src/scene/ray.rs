//! Rays and primitive intersection tests

use glam::Vec3;

/// A half-line cast from the camera through the pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance to an axis-aligned box (slab method), `None` on a miss or
    /// when the box is entirely behind the origin
    pub fn intersect_aabb(&self, center: Vec3, half: Vec3) -> Option<f32> {
        let min = center - half;
        let max = center + half;
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.dir[axis];
            if d.abs() < f32::EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// Distance to a sphere surface
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = -b - sqrt_disc;
        let t1 = -b + sqrt_disc;
        if t1 < 0.0 {
            None
        } else if t0 >= 0.0 {
            Some(t0)
        } else {
            Some(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let t = ray.intersect_aabb(Vec3::ZERO, Vec3::splat(0.5)).unwrap();
        assert!((t - 2.5).abs() < 1e-5);

        assert!(ray.intersect_aabb(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5)).is_none());
        // Behind the origin
        assert!(ray.intersect_aabb(Vec3::new(0.0, 0.0, 10.0), Vec3::splat(0.5)).is_none());
    }

    #[test]
    fn test_aabb_flat_panel() {
        let ray = Ray::new(Vec3::new(0.2, 0.1, 3.0), Vec3::NEG_Z);
        let t = ray
            .intersect_aabb(Vec3::new(0.0, 0.0, -3.0), Vec3::new(1.0, 0.5, 0.001))
            .unwrap();
        assert!((t - 5.999).abs() < 1e-3);
    }

    #[test]
    fn test_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 3.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::new(0.0, 1.0, 0.0), 0.6).unwrap();
        assert!((t - 2.4).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(0.0, -1.0, 0.0), 0.6).is_none());
    }
}
