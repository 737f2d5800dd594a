//! Lume Renderer - CPU dual-mode SDF rendering.
//!
//! Two interchangeable renderers over one procedural scene description:
//!
//! - **Direct**: sphere-traced primary visibility with analytic
//!   single-bounce shading, a full image every frame.
//! - **Path traced**: progressive unidirectional path tracing that
//!   accumulates a running average across frames while the camera holds
//!   still, converging toward a noise-free image.
//!
//! The [`Engine`] is the per-frame entry point consumed by a host UI; it
//! owns the film buffers and the accumulation state and exposes the
//! configuration surface that invalidates them.

mod accum;
mod engine;
mod film;
mod march;
mod path;
mod shade;

pub use accum::Accumulator;
pub use engine::{
    resolve_resolution, ConfigError, ConfigResult, Engine, Frame, PrecisionStatus, RenderMode,
    RenderSettings,
};
pub use film::{Film, Precision};
pub use march::{march, soft_shadow, MarchConfig, MarchResult};
pub use path::pixel_rng;
pub use shade::tone_map;

/// Re-export math and scene types used at the API surface
pub use lume_math::{CameraBasis, OrbitCamera, Ray, Vec3};
pub use lume_scene::SceneId;
