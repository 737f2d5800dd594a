//! Progressive unidirectional path integrator.
//!
//! Each sample walks up to `bounces` diffuse segments and collects
//! radiance only when a segment escapes to the sky; there is no
//! explicit light sampling. The diffuse BRDF is importance-sampled with
//! cosine-weighted directions, so no cosine or pdf term appears in the
//! estimator; variance is controlled entirely by the sample and bounce
//! counts.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lume_math::Ray;
use lume_scene::{material, SceneId};

use crate::march::{march, MarchConfig};
use crate::shade::light_dir;

/// Offset lifting bounce origins off the surface.
const BOUNCE_BIAS: f32 = 0.003;

/// Deterministic per-pixel generator.
///
/// The seed is a pure function of pixel coordinates and the accumulation
/// frame counter, never wall-clock time or call order. Identical seeds
/// reproduce a frame exactly, while consecutive frames decorrelate, which
/// is what makes the running average converge instead of biasing.
pub fn pixel_rng(x: u32, y: u32, frame: u32) -> SmallRng {
    let packed = ((x as u64) << 40) ^ ((y as u64) << 20) ^ frame as u64;
    // splitmix64 finalizer to spread neighboring pixels across the seed space
    let mut z = packed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    SmallRng::seed_from_u64(z ^ (z >> 31))
}

/// Sky radiance for escaped rays: the sole light source of path mode.
///
/// A horizon-to-zenith gradient plus a warm glow around the directional
/// light, keeping converged images consistent with direct mode's light.
pub fn sky(dir: Vec3, light: Vec3) -> Vec3 {
    let t = 0.5 * (dir.y + 1.0);
    let base = Vec3::new(0.35, 0.40, 0.52).lerp(Vec3::new(0.75, 0.85, 1.05), t);
    let glow = Vec3::new(1.0, 0.92, 0.75) * dir.dot(light).max(0.0).powf(32.0) * 4.0;
    base + glow
}

/// Estimate radiance along one camera ray.
pub fn sample(ray: Ray, scene: SceneId, time: f32, bounces: u32, rng: &mut SmallRng) -> Vec3 {
    let light = light_dir();
    let mut throughput = Vec3::ONE;
    let mut current = ray;

    for _ in 0..bounces {
        let hit = march(&current, scene, time, &MarchConfig::PATH);
        if !hit.is_hit(&MarchConfig::PATH) {
            return throughput * sky(current.direction, light);
        }

        let pos = current.at(hit.distance);
        let normal = scene.normal(pos, time);
        throughput *= material::albedo(hit.material);

        let dir = cosine_hemisphere(normal, rng);
        current = Ray::new(pos + normal * BOUNCE_BIAS, dir);
    }

    // Path used its whole bounce budget without reaching the sky
    Vec3::ZERO
}

/// Cosine-weighted direction about `normal`.
///
/// Adding a uniform unit vector to the normal yields the cosine
/// distribution directly; `Ray::new` normalizes the sum.
fn cosine_hemisphere(normal: Vec3, rng: &mut SmallRng) -> Vec3 {
    let dir = normal + random_unit_vector(rng);

    // Catch degenerate direction when the two nearly cancel
    if dir.length_squared() < 1e-8 {
        normal
    } else {
        dir
    }
}

fn random_unit_vector(rng: &mut SmallRng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let len_sq = p.length_squared();
        if len_sq > 1e-7 && len_sq < 1.0 {
            return p / len_sq.sqrt();
        }
    }
}
