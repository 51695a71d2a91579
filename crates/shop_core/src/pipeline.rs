//! Batch placement of a whole product table.
//!
//! A bad record never stops the batch: each failure is logged, recorded
//! in the [`PlacementSummary`] and the next product is placed.

use rayon::prelude::*;

use crate::category::{resolve, CategoryRule};
use crate::plan::{build, PlacementError, PlacementOptions, PlacementPlan};
use crate::record::{ProductRecord, ProductTable};
use crate::stage::{SceneSink, StageError};

/// A product that could not be placed.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementFailure {
    pub product_id: String,
    pub error: PlacementError,
}

impl std::fmt::Display for PlacementFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.product_id, self.error)
    }
}

/// Outcome of placing a product table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementSummary {
    /// Number of products attempted
    pub total: usize,

    /// Ids placed, in table order
    pub placed: Vec<String>,

    /// Products skipped and why, in table order
    pub failures: Vec<PlacementFailure>,
}

impl PlacementSummary {
    pub fn success_count(&self) -> usize {
        self.placed.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when at least one product made it onto the stage.
    pub fn is_success(&self) -> bool {
        !self.placed.is_empty()
    }
}

/// Resolve and build the plan for one product.
pub fn plan_product(
    product_id: &str,
    record: &ProductRecord,
    rules: &[CategoryRule],
    options: &PlacementOptions,
) -> Result<PlacementPlan, PlacementError> {
    let slot = resolve(product_id, rules)?;
    build(product_id, record, &slot, options)
}

/// Build plans for every product, keeping table order.
///
/// Records are independent, so the work is spread over rayon's pool.
pub fn plan_all(
    table: &ProductTable,
    rules: &[CategoryRule],
    options: &PlacementOptions,
) -> Vec<(String, Result<PlacementPlan, PlacementError>)> {
    table
        .entries()
        .par_iter()
        .map(|(id, record)| (id.clone(), plan_product(id, record, rules, options)))
        .collect()
}

/// Define the shelf-level and category scopes for every rule.
pub fn ensure_hierarchy(rules: &[CategoryRule], sink: &mut dyn SceneSink) -> Result<(), StageError> {
    for rule in rules {
        sink.define_scope(&rule.slot().scope_path())?;
    }
    log::info!("Created product hierarchy for {} categories", rules.len());
    Ok(())
}

/// Place every product of the table into the sink.
pub fn place_all(
    table: &ProductTable,
    rules: &[CategoryRule],
    options: &PlacementOptions,
    sink: &mut dyn SceneSink,
) -> PlacementSummary {
    let mut summary = PlacementSummary {
        total: table.len(),
        ..Default::default()
    };

    for (product_id, planned) in plan_all(table, rules, options) {
        let outcome = planned.and_then(|plan| {
            sink.place(&plan)?;
            Ok(plan)
        });

        match outcome {
            Ok(plan) => {
                if plan.is_dynamic() {
                    log::debug!("Placed {} with physics at {}", product_id, plan.translate);
                } else {
                    log::debug!("Placed {} as static at {}", product_id, plan.translate);
                }
                summary.placed.push(product_id);
            }
            Err(error) => {
                log::warn!("Failed to place product {}: {}", product_id, error);
                summary.failures.push(PlacementFailure { product_id, error });
            }
        }
    }

    log::info!(
        "Successfully placed {} out of {} products",
        summary.success_count(),
        summary.total
    );
    summary
}
