//! Material palette lookups keyed by distance-field material id.
//!
//! Material ids travel through the distance field as floats, so the
//! palette classifies by half-open threshold rather than exact match;
//! ids at or above the last band fall back to a neutral gray.

use glam::Vec3;

/// Ids below this band render the floor grid overlay.
pub const FLOOR_MAX_ID: f32 = 1.5;

/// Ids above this band take the single mirror bounce in direct mode.
pub const REFLECTIVE_MIN_ID: f32 = 4.5;

/// Base albedo for a material id.
pub fn albedo(id: f32) -> Vec3 {
    if id < 1.5 {
        Vec3::splat(0.8)
    } else if id < 2.5 {
        Vec3::new(0.9, 0.2, 0.2)
    } else if id < 3.5 {
        Vec3::new(0.2, 0.8, 0.9)
    } else if id < 4.5 {
        Vec3::new(0.8, 0.8, 0.2)
    } else if id < 5.5 {
        Vec3::splat(0.85)
    } else {
        Vec3::splat(0.7)
    }
}

/// True for floor materials (grid overlay applies).
pub fn is_floor(id: f32) -> bool {
    id < FLOOR_MAX_ID
}

/// True for materials that receive the discrete reflection bounce.
pub fn is_reflective(id: f32) -> bool {
    id > REFLECTIVE_MIN_ID
}
