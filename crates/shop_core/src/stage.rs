//! Scene sink abstraction and an in-memory stage.
//!
//! The host application owns the real scene graph. [`SceneSink`] is the
//! seam the pipeline writes through; [`MemoryStage`] records what would be
//! authored so a run can be inspected, printed and tested.

use shop_math::{Aabb, DVec3, XformOp};
use thiserror::Error;

use crate::plan::PlacementPlan;

/// Errors raised by a scene sink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("Parent scope {0} does not exist")]
    MissingParent(String),

    #[error("Prim already exists at {0}")]
    DuplicatePrim(String),

    #[error("Invalid prim path: {0:?}")]
    InvalidPath(String),
}

/// Destination for placement plans.
pub trait SceneSink {
    /// Define a grouping scope (and its ancestors) relative to the stage root.
    fn define_scope(&mut self, path: &str) -> Result<(), StageError>;

    /// Author one product.
    fn place(&mut self, plan: &PlacementPlan) -> Result<(), StageError>;
}

/// Rigid body and collision settings applied to a prim.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub velocity: DVec3,
    pub angular_velocity: DVec3,
    pub collision: bool,
    pub kinematic: bool,
}

/// What a stage prim is.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimKind {
    /// Empty grouping prim
    Scope,

    /// A placed product
    Product {
        /// Payload asset reference
        asset: String,
        /// Xform ops in xformOpOrder
        xform_ops: Vec<XformOp>,
        /// Rigid body, if physics is enabled
        rigid_body: Option<RigidBody>,
    },
}

/// One prim on the stage.
#[derive(Clone, Debug, PartialEq)]
pub struct StagePrim {
    /// Absolute prim path
    pub path: String,
    pub kind: PrimKind,
}

impl StagePrim {
    /// Prim name (last component of path)
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Translation authored on the prim, if any.
    pub fn translation(&self) -> Option<DVec3> {
        match &self.kind {
            PrimKind::Product { xform_ops, .. } => xform_ops.iter().find_map(|op| match op {
                XformOp::Translate(t) => Some(*t),
                _ => None,
            }),
            PrimKind::Scope => None,
        }
    }
}

/// An in-memory stage rooted at a fixed prim path.
#[derive(Clone, Debug)]
pub struct MemoryStage {
    /// Root prim every scope is defined under (e.g. `/World/Shelf`)
    pub root: String,

    /// Prims in definition order
    pub prims: Vec<StagePrim>,
}

impl MemoryStage {
    /// Create an empty stage with the given root prim path.
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
            prims: Vec::new(),
        }
    }

    /// Look up a prim by absolute path.
    pub fn prim(&self, path: &str) -> Option<&StagePrim> {
        self.prims.iter().find(|p| p.path == path)
    }

    /// Returns true if a prim exists at the absolute path.
    pub fn has_prim(&self, path: &str) -> bool {
        self.prim(path).is_some()
    }

    /// Placed products in placement order.
    pub fn products(&self) -> impl Iterator<Item = &StagePrim> {
        self.prims
            .iter()
            .filter(|p| matches!(p.kind, PrimKind::Product { .. }))
    }

    /// Get product count.
    pub fn product_count(&self) -> usize {
        self.products().count()
    }

    /// Get count of products with a rigid body.
    pub fn dynamic_count(&self) -> usize {
        self.products()
            .filter(|p| {
                matches!(
                    p.kind,
                    PrimKind::Product {
                        rigid_body: Some(_),
                        ..
                    }
                )
            })
            .count()
    }

    /// Get scope count.
    pub fn scope_count(&self) -> usize {
        self.prims
            .iter()
            .filter(|p| p.kind == PrimKind::Scope)
            .count()
    }

    /// Bounds of all product positions.
    pub fn world_bounds(&self) -> Aabb {
        self.products()
            .filter_map(StagePrim::translation)
            .fold(Aabb::empty(), |bounds, p| bounds.include_point(p))
    }

    fn absolute(&self, relative: &str) -> String {
        format!("{}/{}", self.root, relative)
    }
}

impl SceneSink for MemoryStage {
    fn define_scope(&mut self, path: &str) -> Result<(), StageError> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(StageError::InvalidPath(path.to_string()));
        }

        let mut current = self.root.clone();
        for segment in segments {
            current = format!("{}/{}", current, segment);
            if !self.has_prim(&current) {
                log::debug!("Defined scope {}", current);
                self.prims.push(StagePrim {
                    path: current.clone(),
                    kind: PrimKind::Scope,
                });
            }
        }
        Ok(())
    }

    fn place(&mut self, plan: &PlacementPlan) -> Result<(), StageError> {
        let parent = self.absolute(plan.scope_path());
        match self.prim(&parent) {
            Some(prim) if prim.kind == PrimKind::Scope => {}
            _ => return Err(StageError::MissingParent(parent)),
        }

        let path = plan.prim_path(&self.root);
        if self.has_prim(&path) {
            return Err(StageError::DuplicatePrim(path));
        }

        let rigid_body = plan.physics.map(|physics| RigidBody {
            velocity: physics.velocity,
            angular_velocity: physics.angular_velocity,
            collision: physics.collision,
            kinematic: false,
        });

        self.prims.push(StagePrim {
            path,
            kind: PrimKind::Product {
                asset: plan.asset.clone(),
                xform_ops: plan.xform_ops(),
                rigid_body,
            },
        });
        Ok(())
    }
}
