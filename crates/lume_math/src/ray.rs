use crate::Vec3;

/// A ray in 3D space with origin and unit-length direction.
///
/// Rays represent a half-line starting at `origin` and traveling in
/// `direction`. The constructor normalizes the direction so marching
/// code can treat the ray parameter as world-space distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
