//! Sphere tracing against the scene distance field.
//!
//! The marcher advances a ray by the signed distance reported at its
//! current position. Because the field never overestimates, the ray can
//! never tunnel through a surface; it converges onto the hit or walks
//! out past the far plane.

use glam::Vec3;
use lume_math::Ray;
use lume_scene::SceneId;

/// Shadow-ray penumbra steepness.
pub const SHADOW_SHARPNESS: f32 = 8.0;

/// Start offset for shadow rays, lifting them off the shading point.
const SHADOW_START: f32 = 0.02;

/// Shadow march range and iteration cap.
const SHADOW_MAX_DIST: f32 = 40.0;
const SHADOW_STEPS: u32 = 48;

/// Step, precision and range limits for one march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchConfig {
    pub max_steps: u32,
    pub epsilon: f32,
    pub far_plane: f32,
}

impl MarchConfig {
    /// Primary and reflection rays in direct mode.
    pub const PRIMARY: MarchConfig = MarchConfig {
        max_steps: 128,
        epsilon: 5e-4,
        far_plane: 80.0,
    };

    /// Path-traced rays. The lower per-pixel frequency of path mode
    /// affords a larger step and range budget.
    pub const PATH: MarchConfig = MarchConfig {
        max_steps: 200,
        epsilon: 8e-4,
        far_plane: 120.0,
    };
}

/// Outcome of one march: distance travelled plus the hit material.
///
/// A miss reports material 0 and a travelled distance at or beyond the
/// far plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub distance: f32,
    pub material: f32,
}

impl MarchResult {
    /// True when the march stopped on a surface rather than escaping.
    pub fn is_hit(&self, config: &MarchConfig) -> bool {
        self.distance < config.far_plane
    }
}

/// Sphere-trace `ray` through the scene.
///
/// Running out of steps without converging is a normal miss, not an
/// error; the result is clamped onto the far plane so miss detection
/// stays a single comparison.
pub fn march(ray: &Ray, scene: SceneId, time: f32, config: &MarchConfig) -> MarchResult {
    let mut t = 0.0;
    for _ in 0..config.max_steps {
        let sample = scene.evaluate(ray.at(t), time);
        if sample.distance < config.epsilon {
            return MarchResult {
                distance: t,
                material: sample.material,
            };
        }
        t += sample.distance;
        if t > config.far_plane {
            return MarchResult {
                distance: t,
                material: 0.0,
            };
        }
    }
    MarchResult {
        distance: config.far_plane,
        material: 0.0,
    }
}

/// Visibility toward a light direction, in [0, 1].
///
/// Marches toward the light and keeps the minimum of
/// `SHADOW_SHARPNESS * distance / travelled`, which shrinks smoothly as
/// the ray grazes an occluder. Produces continuous penumbrae rather
/// than a binary shadow test.
pub fn soft_shadow(origin: Vec3, light_dir: Vec3, scene: SceneId, time: f32) -> f32 {
    let mut res = 1.0_f32;
    let mut t = SHADOW_START;
    for _ in 0..SHADOW_STEPS {
        let d = scene.evaluate(origin + light_dir * t, time).distance;
        res = res.min(SHADOW_SHARPNESS * d / t);
        t += d.clamp(0.01, 0.5);
        if t > SHADOW_MAX_DIST {
            break;
        }
    }
    res.clamp(0.0, 1.0)
}
