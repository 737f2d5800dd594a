//! The built-in scene catalog.
//!
//! Scenes are closed distance-field compositions selected by [`SceneId`].
//! Evaluation takes the scene id and time as explicit parameters rather
//! than threading ambient state, so the evaluator can be called from any
//! thread at millions of calls per frame without synchronization or
//! allocation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sdf::{sd_box, sd_plane, sd_sphere, DistanceSample};

/// Finite-difference offset for normal estimation, in world units.
const NORMAL_EPS: f32 = 1e-3;

/// Angular spacing of the orbit-ring spheres (a sixth of a turn).
const RING_SPACING: f32 = 1.0472;

/// Identifies one of the built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneId {
    /// Three static spheres resting on a gridded floor.
    StaticSpheres,
    /// A closed box room holding one reflective sphere.
    MirrorRoom,
    /// Six spheres orbiting above the floor; time-varying.
    OrbitRing,
}

impl SceneId {
    /// All defined scenes, in index order.
    pub const ALL: [SceneId; 3] = [
        SceneId::StaticSpheres,
        SceneId::MirrorRoom,
        SceneId::OrbitRing,
    ];

    /// Map an arbitrary index to a scene.
    ///
    /// Out-of-range indices fall back to the last defined scene rather
    /// than failing, so a stale UI value can never select nothing.
    pub fn from_index(index: usize) -> SceneId {
        Self::ALL
            .get(index)
            .copied()
            .unwrap_or(Self::ALL[Self::ALL.len() - 1])
    }

    /// Index of this scene within [`SceneId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// True when the distance field depends on time.
    pub fn is_animated(self) -> bool {
        matches!(self, SceneId::OrbitRing)
    }

    /// Evaluate the scene's distance field at `point`.
    ///
    /// Pure function of its inputs; `time` only affects animated scenes.
    pub fn evaluate(self, point: Vec3, time: f32) -> DistanceSample {
        match self {
            SceneId::StaticSpheres => static_spheres(point),
            SceneId::MirrorRoom => mirror_room(point),
            SceneId::OrbitRing => orbit_ring(point, time),
        }
    }

    /// Surface normal at `point`, from tetrahedral finite differences of
    /// the distance field.
    ///
    /// Near sharp edges the gradient is discontinuous and the result is a
    /// best-effort blend of the adjacent face normals; that bias is
    /// accepted rather than treated as an error.
    pub fn normal(self, point: Vec3, time: f32) -> Vec3 {
        let k0 = Vec3::new(1.0, -1.0, -1.0);
        let k1 = Vec3::new(-1.0, -1.0, 1.0);
        let k2 = Vec3::new(-1.0, 1.0, -1.0);
        let k3 = Vec3::new(1.0, 1.0, 1.0);
        (k0 * self.evaluate(point + k0 * NORMAL_EPS, time).distance
            + k1 * self.evaluate(point + k1 * NORMAL_EPS, time).distance
            + k2 * self.evaluate(point + k2 * NORMAL_EPS, time).distance
            + k3 * self.evaluate(point + k3 * NORMAL_EPS, time).distance)
            .normalize()
    }
}

fn static_spheres(p: Vec3) -> DistanceSample {
    let floor = DistanceSample::new(sd_plane(p, Vec3::Y, 0.0), 1.0);
    floor
        .union(DistanceSample::new(
            sd_sphere(p - Vec3::new(-1.2, 1.0, 0.0), 1.0),
            2.0,
        ))
        .union(DistanceSample::new(
            sd_sphere(p - Vec3::new(1.4, 0.6, 1.2), 0.6),
            3.0,
        ))
        .union(DistanceSample::new(
            sd_sphere(p - Vec3::new(0.0, 0.5, -1.5), 0.5),
            4.0,
        ))
}

fn mirror_room(p: Vec3) -> DistanceSample {
    let room = DistanceSample::new(
        sd_box(p - Vec3::new(0.0, 1.5, 0.0), Vec3::new(4.0, 2.0, 4.0)),
        1.0,
    );
    room.union(DistanceSample::new(
        sd_sphere(p - Vec3::new(0.5, 1.0, 0.0), 1.0),
        5.0,
    ))
}

fn orbit_ring(p: Vec3, time: f32) -> DistanceSample {
    let mut d = DistanceSample::new(sd_plane(p, Vec3::Y, 0.0), 1.0);
    for i in 0..6 {
        let fi = i as f32;
        let ang = time * 0.6 + fi * RING_SPACING;
        let center = Vec3::new(
            ang.cos() * 2.2,
            0.8 + 0.3 * (time * 1.5 + fi).sin(),
            ang.sin() * 2.2,
        );
        d = d.union(DistanceSample::new(
            sd_sphere(p - center, 0.5),
            2.0 + (i % 3) as f32,
        ));
    }
    d
}
