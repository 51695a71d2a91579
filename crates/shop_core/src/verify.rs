//! Sanity checks over product data.
//!
//! These never change the data; they produce issue lists and counts for
//! display before a placement run.

use shop_math::{Aabb, DVec3};

use crate::category::{categorize, Categorization, CategoryRule};
use crate::config::PlacerConfig;
use crate::record::{ProductTable, RotationKind};

/// One problem found in the product data.
#[derive(Clone, Debug, PartialEq)]
pub struct DataIssue {
    pub product_id: String,
    pub message: String,
}

impl DataIssue {
    fn new(product_id: &str, message: impl Into<String>) -> Self {
        Self {
            product_id: product_id.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.product_id, self.message)
    }
}

/// Required fields and the rotation invariant, one issue per problem.
pub fn structure_issues(table: &ProductTable) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    for (id, record) in table.iter() {
        for field in record.missing_fields() {
            issues.push(DataIssue::new(id, format!("Missing '{}' field", field)));
        }

        match record.rotation_kind() {
            RotationKind::Missing => issues.push(DataIssue::new(
                id,
                "Missing rotation data (neither 'rotate' nor 'orient')",
            )),
            RotationKind::Conflicting => issues.push(DataIssue::new(
                id,
                "Conflicting rotation data (both 'rotate' and 'orient')",
            )),
            RotationKind::Euler | RotationKind::Quaternion => {}
        }
    }

    issues
}

/// Products split by whether physics is enabled, in table order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhysicsBreakdown {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

impl PhysicsBreakdown {
    pub fn total(&self) -> usize {
        self.enabled.len() + self.disabled.len()
    }
}

pub fn physics_breakdown(table: &ProductTable) -> PhysicsBreakdown {
    let mut breakdown = PhysicsBreakdown::default();
    for (id, record) in table.iter() {
        if record.physics_enabled {
            breakdown.enabled.push(id.to_string());
        } else {
            breakdown.disabled.push(id.to_string());
        }
    }
    breakdown
}

/// Products below and above the shelf split height.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShelfSplit {
    pub lower: Vec<String>,
    pub upper: Vec<String>,
}

/// Positions outside the expected volume, one issue per offending axis.
pub fn position_issues(table: &ProductTable, bounds: &Aabb) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    for (id, record) in table.iter() {
        let Some(translate) = record.translate else {
            continue;
        };
        let position = DVec3::from_array(translate);
        if bounds.contains_point(position) {
            continue;
        }

        for axis in bounds.outside_axes(position) {
            issues.push(DataIssue::new(
                id,
                format!(
                    "{}={:.2} out of range {}",
                    axis,
                    axis.component(position),
                    bounds.axis_interval(axis)
                ),
            ));
        }
    }

    issues
}

/// Split products into lower and upper shelf by height.
pub fn shelf_split(table: &ProductTable, split_height: f64) -> ShelfSplit {
    let mut split = ShelfSplit::default();
    for (id, record) in table.iter() {
        let Some([_, _, z]) = record.translate else {
            continue;
        };
        if z < split_height {
            split.lower.push(id.to_string());
        } else {
            split.upper.push(id.to_string());
        }
    }
    split
}

/// Coarse classification of asset references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    YcbPhysics,
    YcbStandard,
    Food,
    Other,
}

impl AssetKind {
    pub fn classify(asset: &str) -> Self {
        if asset.contains("YCB") {
            if asset.contains("Physics") {
                AssetKind::YcbPhysics
            } else {
                AssetKind::YcbStandard
            }
        } else if asset.contains("Food") {
            AssetKind::Food
        } else {
            AssetKind::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::YcbPhysics => "YCB Physics",
            AssetKind::YcbStandard => "YCB Standard",
            AssetKind::Food => "Food",
            AssetKind::Other => "Other",
        }
    }
}

/// Assets that do not live under `base_url` or are not `.usd` files.
pub fn asset_issues(table: &ProductTable, base_url: &str) -> Vec<DataIssue> {
    table
        .iter()
        .filter_map(|(id, record)| {
            let asset = record.asset.as_deref()?;
            if !asset.starts_with(base_url) {
                Some(DataIssue::new(id, "Invalid base URL"))
            } else if !asset.ends_with(".usd") {
                Some(DataIssue::new(id, "Not a USD file"))
            } else {
                None
            }
        })
        .collect()
}

/// Count products per asset kind, in order of first appearance.
pub fn asset_kinds(table: &ProductTable) -> Vec<(AssetKind, usize)> {
    let mut counts: Vec<(AssetKind, usize)> = Vec::new();
    for (_, record) in table.iter() {
        let kind = AssetKind::classify(record.asset.as_deref().unwrap_or(""));
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
}

/// Everything the verification tooling reports about a table.
#[derive(Clone, Debug)]
pub struct DataReport {
    pub product_count: usize,
    pub structure: Vec<DataIssue>,
    pub physics: PhysicsBreakdown,
    pub categories: Categorization,
    pub positions: Vec<DataIssue>,
    pub split: ShelfSplit,
    pub assets: Vec<DataIssue>,
    pub asset_kinds: Vec<(AssetKind, usize)>,
}

impl DataReport {
    pub fn build(table: &ProductTable, rules: &[CategoryRule], config: &PlacerConfig) -> Self {
        Self {
            product_count: table.len(),
            structure: structure_issues(table),
            physics: physics_breakdown(table),
            categories: categorize(table, rules),
            positions: position_issues(table, &config.bounds),
            split: shelf_split(table, config.split_height),
            assets: asset_issues(table, &config.asset_base_url),
            asset_kinds: asset_kinds(table),
        }
    }

    /// True when the data is structurally fit for placement.
    pub fn is_valid(&self) -> bool {
        self.structure.is_empty()
    }
}
