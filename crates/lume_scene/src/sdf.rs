//! Signed distance primitives and the closest-wins union.
//!
//! Every primitive returns an exact Euclidean signed distance (negative
//! inside the solid), which is what gives sphere tracing its
//! non-overshoot guarantee.

use glam::Vec3;

/// One evaluation of a distance field: the signed distance to the nearest
/// surface and the material id of that surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    pub distance: f32,
    pub material: f32,
}

impl DistanceSample {
    /// Create a new sample.
    pub fn new(distance: f32, material: f32) -> Self {
        Self { distance, material }
    }

    /// Closest-wins union of two samples.
    ///
    /// On an exact distance tie the receiver (the first-encountered
    /// primitive in scene composition order) wins, so the winner is
    /// deterministic frame to frame.
    pub fn union(self, other: DistanceSample) -> DistanceSample {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

/// Sphere of radius `r` centered at the origin.
pub fn sd_sphere(p: Vec3, r: f32) -> f32 {
    p.length() - r
}

/// Infinite plane with normal `n` (normalized internally) at signed offset `h`.
pub fn sd_plane(p: Vec3, n: Vec3, h: f32) -> f32 {
    p.dot(n.normalize()) + h
}

/// Axis-aligned box with half-extents `b`, centered at the origin.
pub fn sd_box(p: Vec3, b: Vec3) -> f32 {
    let q = p.abs() - b;
    q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_distances() {
        // On the surface, outside, and inside
        assert_eq!(sd_sphere(Vec3::new(1.0, 0.0, 0.0), 1.0), 0.0);
        assert_eq!(sd_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0), 2.0);
        assert_eq!(sd_sphere(Vec3::ZERO, 1.0), -1.0);
    }

    #[test]
    fn test_plane_distance() {
        // Ground plane through the origin
        assert_eq!(sd_plane(Vec3::new(5.0, 2.0, -3.0), Vec3::Y, 0.0), 2.0);
        assert_eq!(sd_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 0.0), -1.0);
        // Non-unit input normal must not scale the distance
        assert_eq!(sd_plane(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 10.0, 0.0), 0.0), 2.0);
    }

    #[test]
    fn test_box_distances() {
        let b = Vec3::new(1.0, 2.0, 3.0);
        // Face distance
        assert_eq!(sd_box(Vec3::new(2.0, 0.0, 0.0), b), 1.0);
        // Corner distance is Euclidean, not Chebyshev
        let corner = sd_box(Vec3::new(2.0, 3.0, 4.0), b);
        assert!((corner - 3.0_f32.sqrt()).abs() < 1e-6);
        // Inside is negative: distance to the closest face
        assert_eq!(sd_box(Vec3::ZERO, b), -1.0);
    }

    #[test]
    fn test_union_picks_closest() {
        let a = DistanceSample::new(2.0, 1.0);
        let b = DistanceSample::new(1.0, 2.0);
        assert_eq!(a.union(b).material, 2.0);
        assert_eq!(b.union(a).material, 2.0);
    }

    #[test]
    fn test_union_tie_keeps_first() {
        // Exact ties must resolve to the first-encountered primitive,
        // otherwise equal-distance surfaces flicker between frames.
        let first = DistanceSample::new(1.0, 3.0);
        let second = DistanceSample::new(1.0, 4.0);
        assert_eq!(first.union(second).material, 3.0);
    }
}
