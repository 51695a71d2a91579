// Re-export glam for convenience
pub use glam::*;

// Shop math types
mod aabb;
mod interval;
pub mod rotation;
mod transform;

pub use aabb::{Aabb, Axis};
pub use interval::Interval;
pub use transform::{compose_xform_ops, XformOp};
