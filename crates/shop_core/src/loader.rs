//! Product data loading.
//!
//! Product data is a JSON object mapping product ids to records. Object
//! order is kept (serde_json `preserve_order`) so the table iterates in
//! authoring order.

use std::path::Path;

use thiserror::Error;

use crate::record::{ProductRecord, ProductTable};

/// Errors that can occur while loading product data.
///
/// Any of these aborts the run before a single product is placed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Product data must be a JSON object keyed by product id")]
    NotAnObject,

    #[error("Product data contains no products")]
    Empty,

    #[error("Product {id}: {source}")]
    Record {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load product data from a JSON file.
///
/// # Example
///
/// ```ignore
/// use shop_core::loader::load_product_table;
///
/// let table = load_product_table("assets/product_data.json")?;
/// println!("Loaded {} products", table.len());
/// ```
pub fn load_product_table<P: AsRef<Path>>(path: P) -> LoadResult<ProductTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let table = load_product_table_from_str(&content)?;

    log::info!("Loaded {} products from {}", table.len(), path.display());
    Ok(table)
}

/// Load product data from a JSON string (useful for testing).
pub fn load_product_table_from_str(content: &str) -> LoadResult<ProductTable> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(map) = value else {
        return Err(LoadError::NotAnObject);
    };

    if map.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut table = ProductTable::new();
    for (id, value) in map {
        let record: ProductRecord = serde_json::from_value(value)
            .map_err(|source| LoadError::Record { id: id.clone(), source })?;
        table.insert(id, record);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RotationKind;

    const SAMPLE: &str = r#"{
        "_10_potted_meat_can_24": {
            "asset": "https://example.com/YCB/Axis_Aligned/010_potted_meat_can.usd",
            "translate": [-25.049380299928515, 44.521806528176384, 0.9167479613211755],
            "orient": [0.5, -0.5, 0.5, -0.5],
            "scale": [1.3333334, 1.3333334, 1.3333334],
            "physics_enabled": true
        },
        "_06_mustard_bottle_05": {
            "asset": "https://example.com/YCB/Axis_Aligned_Physics/006_mustard_bottle.usd",
            "translate": [-25.086469880134647, 46.04343291587653, 0.9831003337342358],
            "rotate": [-90, 90, 0],
            "scale": [1.3333334, 1.3333334, 1.3333334],
            "physics_enabled": false,
            "description": "Mustard bottle, front row"
        }
    }"#;

    #[test]
    fn test_load_sample() {
        let table = load_product_table_from_str(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);

        // Authoring order, not sorted order
        let ids: Vec<&str> = table.ids().collect();
        assert_eq!(ids, vec!["_10_potted_meat_can_24", "_06_mustard_bottle_05"]);

        let spam = table.get("_10_potted_meat_can_24").unwrap();
        assert_eq!(spam.rotation_kind(), RotationKind::Quaternion);
        assert!(spam.physics_enabled);
        assert_eq!(spam.translate.unwrap()[0], -25.049380299928515);

        let mustard = table.get("_06_mustard_bottle_05").unwrap();
        assert_eq!(mustard.rotate, Some([-90.0, 90.0, 0.0]));
        assert_eq!(mustard.description.as_deref(), Some("Mustard bottle, front row"));
    }

    #[test]
    fn test_missing_fields_still_load() {
        let table = load_product_table_from_str(r#"{"x": {"translate": [0, 0, 0]}}"#).unwrap();
        let record = table.get("x").unwrap();
        assert_eq!(record.missing_fields(), vec!["asset", "scale"]);
        assert!(!record.physics_enabled);
    }

    #[test]
    fn test_invalid_json() {
        let result = load_product_table_from_str("{ not json");
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_not_an_object() {
        let result = load_product_table_from_str("[1, 2, 3]");
        assert!(matches!(result, Err(LoadError::NotAnObject)));
    }

    #[test]
    fn test_empty_object() {
        let result = load_product_table_from_str("{}");
        assert!(matches!(result, Err(LoadError::Empty)));
    }

    #[test]
    fn test_wrong_field_type_names_product() {
        let result = load_product_table_from_str(r#"{"bad_1": {"translate": [1, 2]}}"#);
        match result {
            Err(LoadError::Record { id, .. }) => assert_eq!(id, "bad_1"),
            other => panic!("expected record error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = load_product_table("/nonexistent/product_data.json");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
