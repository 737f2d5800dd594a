//! Lume Scene - procedural distance-field scenes.
//!
//! This crate provides:
//!
//! - **SDF primitives**: sphere, plane and box distance functions with a
//!   closest-wins union ([`sdf`])
//! - **Scene catalog**: the built-in scenes, evaluated by explicit id and
//!   time so the kernels stay pure and parallel-safe ([`scene`])
//! - **Material palette**: albedo and surface-class lookups keyed by the
//!   material id carried through the distance field ([`material`])
//!
//! # Example
//!
//! ```
//! use lume_scene::SceneId;
//! use lume_math::Vec3;
//!
//! let scene = SceneId::from_index(0);
//! let sample = scene.evaluate(Vec3::new(0.0, 3.0, 0.0), 0.0);
//! assert!(sample.distance > 0.0); // three units above the floor, in the open
//! ```

pub mod material;
pub mod scene;
pub mod sdf;

// Re-export commonly used types
pub use scene::SceneId;
pub use sdf::DistanceSample;
