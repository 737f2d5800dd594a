//! Analytic single-bounce shading for direct mode.
//!
//! One fixed directional light, Lambertian diffuse attenuated by the
//! soft shadow, Blinn-Phong specular, and a single discrete mirror
//! bounce for reflective materials. The weights here are tuned for
//! visual plausibility; they are constants with defaults, not derived
//! quantities.

use glam::Vec3;
use lume_math::Ray;
use lume_scene::{material, SceneId};

use crate::march::{march, soft_shadow, MarchConfig};

/// Ambient floor of the lighting model.
pub const AMBIENT: f32 = 0.12;

/// Diffuse weight applied with the shadow factor.
pub const DIFFUSE_WEIGHT: f32 = 0.9;

/// Blinn-Phong exponent and weight.
pub const SPECULAR_EXPONENT: f32 = 64.0;
pub const SPECULAR_WEIGHT: f32 = 0.25;

/// Blend factor of the mirror bounce into the base color.
pub const REFLECTION_BLEND: f32 = 0.5;

/// Surface offsets for secondary rays.
const SHADOW_BIAS: f32 = 0.01;
const REFLECTION_BIAS: f32 = 0.02;

/// Display transfer gamma.
const GAMMA: f32 = 2.2;

/// The single directional light of the scene.
pub fn light_dir() -> Vec3 {
    Vec3::new(0.6, 0.8, 0.3).normalize()
}

/// Trace one primary ray in direct mode and return linear radiance.
pub fn trace(ray: &Ray, scene: SceneId, time: f32) -> Vec3 {
    let hit = march(ray, scene, time, &MarchConfig::PRIMARY);
    if !hit.is_hit(&MarchConfig::PRIMARY) {
        return background(ray.direction);
    }
    let pos = ray.at(hit.distance);
    let normal = scene.normal(pos, time);
    shade(ray, pos, normal, hit.material, scene, time)
}

/// Shade a surface hit.
pub fn shade(
    ray: &Ray,
    pos: Vec3,
    normal: Vec3,
    material_id: f32,
    scene: SceneId,
    time: f32,
) -> Vec3 {
    let ldir = light_dir();
    let mut col = lit_color(ray.direction, pos, normal, material_id, scene, time, ldir);

    // One discrete mirror bounce; the reflected hit is lit with diffuse
    // and shadow only, no further reflection.
    if material::is_reflective(material_id) {
        let rdir = reflect(ray.direction, normal);
        let rray = Ray::new(pos + normal * REFLECTION_BIAS, rdir);
        let rhit = march(&rray, scene, time, &MarchConfig::PRIMARY);
        if rhit.is_hit(&MarchConfig::PRIMARY) {
            let rpos = rray.at(rhit.distance);
            let rnormal = scene.normal(rpos, time);
            let rdiff = rnormal.dot(ldir).max(0.0)
                * soft_shadow(rpos + rnormal * SHADOW_BIAS, ldir, scene, time);
            let rcol = material::albedo(rhit.material) * (0.1 + rdiff * DIFFUSE_WEIGHT);
            col = col.lerp(rcol, REFLECTION_BLEND);
        }
    }

    if material::is_floor(material_id) {
        col = apply_grid(col, pos);
    }
    col
}

fn lit_color(
    view_dir: Vec3,
    pos: Vec3,
    normal: Vec3,
    material_id: f32,
    scene: SceneId,
    time: f32,
    ldir: Vec3,
) -> Vec3 {
    let diff = normal.dot(ldir).max(0.0);
    let shadow = soft_shadow(pos + normal * SHADOW_BIAS, ldir, scene, time);
    let half = (ldir - view_dir).normalize();
    let spec = normal.dot(half).max(0.0).powf(SPECULAR_EXPONENT);
    let base = material::albedo(material_id);
    base * (AMBIENT + diff * DIFFUSE_WEIGHT * shadow) + Vec3::ONE * spec * SPECULAR_WEIGHT * shadow
}

/// Background gradient for rays that leave the scene in direct mode.
pub fn background(dir: Vec3) -> Vec3 {
    let t = 0.5 * (dir.y + 1.0);
    let base = Vec3::new(0.08, 0.10, 0.14);
    let top = Vec3::new(0.05, 0.07, 0.12) + Vec3::new(0.05, 0.1, 0.2) * t;
    base.lerp(top, 0.7)
}

/// Darken the floor near unit-cell boundaries in the horizontal plane.
fn apply_grid(col: Vec3, pos: Vec3) -> Vec3 {
    let cx = (fract(pos.x) - 0.5).abs();
    let cz = (fract(pos.z) - 0.5).abs();
    let line = smoothstep(0.48, 0.49, cx.max(cz));
    col.lerp(col * 0.7, line)
}

/// Map linear radiance to the 2.2-gamma display transfer.
pub fn tone_map(col: Vec3) -> Vec3 {
    col.max(Vec3::ZERO).powf(1.0 / GAMMA)
}

fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
