use glam::{Vec2, Vec3};

use crate::Ray;

/// Orbit distance limits, matching the zoom clamp applied by input handling.
pub const DISTANCE_MIN: f32 = 1.5;
pub const DISTANCE_MAX: f32 = 30.0;

/// Pitch limits in radians.
///
/// Keeps the forward vector away from world-up, where the right vector
/// would degenerate to a zero-length cross product.
pub const PITCH_MIN: f32 = -1.2;
pub const PITCH_MAX: f32 = 1.2;

/// Orbit camera state: five scalars driven by external input.
///
/// The position/forward/right/up basis is derived, never stored:
/// any scalar may change between frames, so `basis()` is recomputed
/// every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Yaw in radians, unbounded (wraps naturally through sin/cos).
    pub yaw: f32,
    /// Pitch in radians, clamped to [PITCH_MIN, PITCH_MAX].
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

/// Orthonormal camera frame derived from an `OrbitCamera`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl OrbitCamera {
    /// Create an orbit camera, clamping distance and pitch into range.
    pub fn new(target: Vec3, distance: f32, yaw: f32, pitch: f32, fov_y: f32) -> Self {
        Self {
            target,
            distance: distance.clamp(DISTANCE_MIN, DISTANCE_MAX),
            yaw,
            pitch: pitch.clamp(PITCH_MIN, PITCH_MAX),
            fov_y,
        }
    }

    /// Derive the orthonormal camera frame.
    ///
    /// forward = (cos(pitch)cos(yaw), sin(pitch), cos(pitch)sin(yaw)),
    /// right = forward x world-up, up = right x forward,
    /// position = target - forward * distance.
    pub fn basis(&self) -> CameraBasis {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        let forward = Vec3::new(cy * cp, sp, sy * cp).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        let position = self.target - forward * self.distance;
        CameraBasis {
            position,
            forward,
            right,
            up,
        }
    }
}

impl CameraBasis {
    /// Build the primary ray through a point on the image plane.
    ///
    /// `ndc` is the pixel offset from the image center divided by the
    /// image height (so x spans +-aspect/2 and y spans +-0.5, y up);
    /// `tan_half_fov` is tan of half the vertical field of view.
    pub fn ray_through(&self, ndc: Vec2, tan_half_fov: f32) -> Ray {
        let dir = self.forward
            + self.right * (ndc.x * tan_half_fov)
            + self.up * (ndc.y * tan_half_fov);
        Ray::new(self.position, dir)
    }
}

impl Default for OrbitCamera {
    /// The home view: target (0,1,0), distance 6, yaw 0.35pi,
    /// pitch 0.20pi, 55 degree vertical fov.
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            distance: 6.0,
            yaw: std::f32::consts::PI * 0.35,
            pitch: std::f32::consts::PI * 0.20,
            fov_y: 55.0_f32.to_radians(),
        }
    }
}
