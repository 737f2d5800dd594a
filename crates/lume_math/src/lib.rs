// Re-export glam for convenience
pub use glam::*;

// Lume math types
mod orbit;
mod ray;

pub use orbit::{CameraBasis, OrbitCamera};
pub use ray::Ray;
