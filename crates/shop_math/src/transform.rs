// Transform operations for placed prims
//
// Mirrors the USD xformOp stack: ops are listed in xformOpOrder and the
// first op is the outermost, so [translate, rotate, scale] composes to T * R * S.

use glam::{DMat4, DQuat, DVec3};

use crate::rotation::euler_zyx_to_quat;

/// Transform operation types authored on a prim.
#[derive(Clone, Debug, PartialEq)]
pub enum XformOp {
    /// Translation (xformOp:translate)
    Translate(DVec3),

    /// Euler rotation in degrees, Z applied first (xformOp:rotateZYX)
    RotateZYX(DVec3),

    /// Quaternion orientation (xformOp:orient)
    Orient(DQuat),

    /// Per-axis scale (xformOp:scale)
    Scale(DVec3),
}

impl XformOp {
    /// USD attribute name for this operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            XformOp::Translate(_) => "xformOp:translate",
            XformOp::RotateZYX(_) => "xformOp:rotateZYX",
            XformOp::Orient(_) => "xformOp:orient",
            XformOp::Scale(_) => "xformOp:scale",
        }
    }

    /// Convert this operation to a transformation matrix.
    pub fn to_matrix(&self) -> DMat4 {
        match self {
            XformOp::Translate(t) => DMat4::from_translation(*t),
            XformOp::RotateZYX(euler) => DMat4::from_quat(euler_zyx_to_quat(*euler)),
            XformOp::Orient(q) => DMat4::from_quat(q.normalize()),
            XformOp::Scale(s) => DMat4::from_scale(*s),
        }
    }
}

/// Combine a list of xformOps into a single matrix.
pub fn compose_xform_ops(ops: &[XformOp]) -> DMat4 {
    let mut result = DMat4::IDENTITY;
    for op in ops {
        result = result * op.to_matrix();
    }
    result
}
