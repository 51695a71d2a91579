//! Placer configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command line flags override individual fields afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shop_math::{Aabb, DVec3};
use thiserror::Error;

use crate::plan::PlacementOptions;

/// Errors that can occur while loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Base URL every product asset is expected to live under.
pub const DEFAULT_ASSET_BASE_URL: &str =
    "https://omniverse-content-production.s3-us-west-2.amazonaws.com/Assets/Isaac/";

/// Settings for a placement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Product data JSON file
    pub product_data: PathBuf,

    /// How many products get a random rotation
    pub randomize_count: usize,

    /// Seed for the rotation randomizer (entropy when absent)
    pub seed: Option<u64>,

    /// Master switch for rigid bodies
    pub physics_for_all: bool,

    /// Give rigid bodies collision shapes
    pub force_collision: bool,

    /// Stage prim the shelf hierarchy is created under
    pub stage_root: String,

    /// Volume every product position is expected to fall in
    pub bounds: Aabb,

    /// Products below this height count as lower shelf
    pub split_height: f64,

    /// Expected prefix of every asset reference
    pub asset_base_url: String,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            product_data: PathBuf::from("assets/product_data.json"),
            randomize_count: 3,
            seed: None,
            physics_for_all: true,
            force_collision: true,
            stage_root: "/World/Shelf".to_string(),
            bounds: Aabb::from_points(DVec3::new(-26.0, 44.0, 0.8), DVec3::new(-24.0, 48.0, 2.2)),
            split_height: 1.5,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
        }
    }
}

impl PlacerConfig {
    /// Load a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Batch switches handed to the plan builder.
    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions {
            physics_for_all: self.physics_for_all,
            force_collision: self.force_collision,
        }
    }
}
