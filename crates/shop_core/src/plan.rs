//! Placement plans: the normalized transform description of one product.
//!
//! A plan is derived from a record and its resolved shelf slot and says
//! everything a scene sink needs to author the product: where it lives in
//! the hierarchy, what it references, its xform ops and its rigid body
//! settings.

use shop_math::rotation::quat_from_wxyz;
use shop_math::{compose_xform_ops, DMat4, DQuat, DVec3, XformOp};
use thiserror::Error;

use crate::category::ShelfSlot;
use crate::record::{ProductRecord, RotationKind};
use crate::stage::StageError;

/// Errors that can occur while placing a single product.
///
/// None of these stop a batch; the pipeline records them and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("Could not determine category for product {0}")]
    Unresolved(String),

    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Stage error: {0}")]
    Stage(#[from] StageError),
}

impl PlacementError {
    fn malformed(id: &str, reason: impl Into<String>) -> Self {
        PlacementError::MalformedRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Caller-supplied switches that apply to every product in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementOptions {
    /// When false every product is placed static, whatever its record says
    pub physics_for_all: bool,

    /// Give rigid bodies collision shapes
    pub force_collision: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            physics_for_all: true,
            force_collision: true,
        }
    }
}

/// How a product is rotated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationDescriptor {
    /// Euler angles in degrees, Z applied first
    EulerZyx(DVec3),

    /// Quaternion orientation
    Quaternion(DQuat),
}

impl RotationDescriptor {
    /// The xform op that authors this rotation.
    pub fn to_xform_op(&self) -> XformOp {
        match self {
            RotationDescriptor::EulerZyx(euler) => XformOp::RotateZYX(*euler),
            RotationDescriptor::Quaternion(q) => XformOp::Orient(*q),
        }
    }
}

/// Rigid body settings for a physics-enabled product.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSpec {
    /// Initial linear velocity
    pub velocity: DVec3,

    /// Initial angular velocity
    pub angular_velocity: DVec3,

    /// Whether a collision shape is applied
    pub collision: bool,
}

/// Everything needed to author one product in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementPlan {
    /// Product id (last scene path component)
    pub product_id: String,

    /// `{shelf_level}/{category}/{product_id}`
    pub scene_path: String,

    /// Asset reference loaded as the prim payload
    pub asset: String,

    pub translate: DVec3,
    pub rotation: RotationDescriptor,
    pub scale: DVec3,

    /// `None` for static products
    pub physics: Option<PhysicsSpec>,
}

impl PlacementPlan {
    /// Full prim path below a stage root such as `/World/Shelf`.
    pub fn prim_path(&self, root: &str) -> String {
        format!("{}/{}", root.trim_end_matches('/'), self.scene_path)
    }

    /// Parent scope of the product (`{shelf_level}/{category}`).
    pub fn scope_path(&self) -> &str {
        self.scene_path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }

    /// Ordered xform ops: translate, rotate, scale.
    pub fn xform_ops(&self) -> Vec<XformOp> {
        vec![
            XformOp::Translate(self.translate),
            self.rotation.to_xform_op(),
            XformOp::Scale(self.scale),
        ]
    }

    /// Local transform matrix composed from the xform ops.
    pub fn local_matrix(&self) -> DMat4 {
        compose_xform_ops(&self.xform_ops())
    }

    /// Returns true if the product becomes a rigid body.
    pub fn is_dynamic(&self) -> bool {
        self.physics.is_some()
    }
}

/// Build the placement plan for one product.
///
/// Fails with [`PlacementError::MalformedRecord`] when `asset`,
/// `translate` or `scale` is missing, or when the record does not carry
/// exactly one of `rotate` / `orient`.
pub fn build(
    product_id: &str,
    record: &ProductRecord,
    slot: &ShelfSlot,
    options: &PlacementOptions,
) -> Result<PlacementPlan, PlacementError> {
    let (asset, translate, scale) = match (record.asset.as_ref(), record.translate, record.scale) {
        (Some(asset), Some(translate), Some(scale)) => (asset, translate, scale),
        _ => {
            return Err(PlacementError::malformed(
                product_id,
                format!(
                    "missing required field(s): {}",
                    record.missing_fields().join(", ")
                ),
            ))
        }
    };

    let rotation = match (record.rotation_kind(), record.rotate, record.orient) {
        (RotationKind::Euler, Some(rotate), _) => {
            RotationDescriptor::EulerZyx(DVec3::from_array(rotate))
        }
        (RotationKind::Quaternion, _, Some(orient)) => {
            RotationDescriptor::Quaternion(quat_from_wxyz(orient))
        }
        (RotationKind::Conflicting, _, _) => {
            return Err(PlacementError::malformed(
                product_id,
                "both 'rotate' and 'orient' are present",
            ))
        }
        _ => {
            return Err(PlacementError::malformed(
                product_id,
                "missing rotation data (neither 'rotate' nor 'orient')",
            ))
        }
    };

    let physics = (record.physics_enabled && options.physics_for_all).then(|| PhysicsSpec {
        velocity: record.velocity.map(DVec3::from_array).unwrap_or(DVec3::ZERO),
        angular_velocity: record
            .angular_velocity
            .map(DVec3::from_array)
            .unwrap_or(DVec3::ZERO),
        collision: options.force_collision,
    });

    Ok(PlacementPlan {
        product_id: product_id.to_string(),
        scene_path: format!("{}/{}", slot.scope_path(), product_id),
        asset: asset.clone(),
        translate: DVec3::from_array(translate),
        rotation,
        scale: DVec3::from_array(scale),
        physics,
    })
}
