//! Shop Core - Product placement planning for shop shelf scenes.
//!
//! This crate provides:
//!
//! - **Product data**: `ProductRecord`, `ProductTable` and JSON loading
//! - **Categories**: prefix rules mapping product ids to shelf scopes
//! - **Placement plans**: normalized transforms and rigid body settings
//! - **Randomization**: seeded rotation randomization of a few products
//! - **Pipeline**: batch placement into a `SceneSink` with per-product reporting
//! - **Verification**: structure, position and asset checks over product data
//!
//! # Example
//!
//! ```ignore
//! use shop_core::{load_product_table, place_all, ensure_hierarchy, MemoryStage};
//! use shop_core::category::SHOP_CATEGORY_RULES;
//!
//! let table = load_product_table("assets/product_data.json")?;
//! let mut stage = MemoryStage::new("/World/Shelf");
//! ensure_hierarchy(SHOP_CATEGORY_RULES, &mut stage)?;
//! let summary = place_all(&table, SHOP_CATEGORY_RULES, &Default::default(), &mut stage);
//! println!("Placed {} of {} products", summary.success_count(), summary.total);
//! ```

pub mod category;
pub mod config;
pub mod loader;
pub mod pipeline;
pub mod plan;
pub mod randomize;
pub mod record;
pub mod stage;
pub mod verify;

// Re-export commonly used types
pub use category::{resolve, CategoryRule, ShelfLevel, ShelfSlot, SHOP_CATEGORY_RULES};
pub use config::PlacerConfig;
pub use loader::{load_product_table, load_product_table_from_str, LoadError};
pub use pipeline::{ensure_hierarchy, place_all, PlacementFailure, PlacementSummary};
pub use plan::{build, PlacementError, PlacementOptions, PlacementPlan, RotationDescriptor};
pub use randomize::randomize_rotations;
pub use record::{ProductRecord, ProductTable, RotationKind};
pub use stage::{MemoryStage, SceneSink, StageError};
