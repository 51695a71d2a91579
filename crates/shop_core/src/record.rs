//! Product records and the ordered product table.
//!
//! A record is one placeable item as authored in the product data file.
//! `asset`, `translate` and `scale` are optional at this level so that a
//! record missing one of them can be reported per product instead of
//! failing the whole load; the plan builder enforces their presence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One placeable product as authored in the product data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Asset reference (payload path or URL), not interpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,

    /// Position (x, y, z)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f64; 3]>,

    /// Euler angles in degrees, applied Z then Y then X
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<[f64; 3]>,

    /// Unit quaternion as (w, x, y, z)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<[f64; 4]>,

    /// Per-axis scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,

    /// Whether the product becomes a rigid body
    #[serde(default)]
    pub physics_enabled: bool,

    /// Initial linear velocity (physics only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<[f64; 3]>,

    /// Initial angular velocity (physics only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_velocity: Option<[f64; 3]>,

    /// Free-form note carried by some data files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which rotation representation a record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationKind {
    /// Only `rotate` is present
    Euler,
    /// Only `orient` is present
    Quaternion,
    /// Neither is present
    Missing,
    /// Both are present
    Conflicting,
}

impl ProductRecord {
    /// Classify the rotation fields of this record.
    pub fn rotation_kind(&self) -> RotationKind {
        match (self.rotate.is_some(), self.orient.is_some()) {
            (true, false) => RotationKind::Euler,
            (false, true) => RotationKind::Quaternion,
            (false, false) => RotationKind::Missing,
            (true, true) => RotationKind::Conflicting,
        }
    }

    /// Returns true if exactly one rotation representation is present.
    pub fn has_valid_rotation(&self) -> bool {
        matches!(
            self.rotation_kind(),
            RotationKind::Euler | RotationKind::Quaternion
        )
    }

    /// Names of required fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.asset.is_none() {
            missing.push("asset");
        }
        if self.translate.is_none() {
            missing.push("translate");
        }
        if self.scale.is_none() {
            missing.push("scale");
        }
        missing
    }
}

/// Product records keyed by product id, in authoring order.
///
/// Ids are unique; inserting an existing id replaces its record in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductTable {
    entries: Vec<(String, ProductRecord)>,
    index: HashMap<String, usize>,
}

impl ProductTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the previous record for this id if any.
    pub fn insert(&mut self, id: impl Into<String>, record: ProductRecord) -> Option<ProductRecord> {
        let id = id.into();
        match self.index.get(&id) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, record)),
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, record));
                None
            }
        }
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.index.get(id).map(|&position| &self.entries[position].1)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProductRecord> {
        let position = *self.index.get(id)?;
        Some(&mut self.entries[position].1)
    }

    /// Mutable access to the record at `position` in authoring order.
    ///
    /// Panics if `position` is out of range, like slice indexing.
    pub fn record_at_mut(&mut self, position: usize) -> (&str, &mut ProductRecord) {
        let (id, record) = &mut self.entries[position];
        (id.as_str(), record)
    }

    /// Returns true if the id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Product ids in authoring order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// `(id, record)` pairs in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Borrow the underlying entries (used for parallel iteration).
    pub fn entries(&self) -> &[(String, ProductRecord)] {
        &self.entries
    }

    /// Number of records with physics enabled.
    pub fn physics_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.physics_enabled).count()
    }
}

impl FromIterator<(String, ProductRecord)> for ProductTable {
    fn from_iter<I: IntoIterator<Item = (String, ProductRecord)>>(iter: I) -> Self {
        let mut table = ProductTable::new();
        for (id, record) in iter {
            table.insert(id, record);
        }
        table
    }
}

impl Serialize for ProductTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn euler_record() -> ProductRecord {
        ProductRecord {
            asset: Some("https://example.com/Props/YCB/006_mustard_bottle.usd".to_string()),
            translate: Some([1.0, 2.0, 3.0]),
            rotate: Some([-90.0, 90.0, 0.0]),
            scale: Some([1.0, 1.0, 1.0]),
            ..Default::default()
        }
    }

    #[test]
    fn test_rotation_kind() {
        let mut record = euler_record();
        assert_eq!(record.rotation_kind(), RotationKind::Euler);
        assert!(record.has_valid_rotation());

        record.orient = Some([1.0, 0.0, 0.0, 0.0]);
        assert_eq!(record.rotation_kind(), RotationKind::Conflicting);
        assert!(!record.has_valid_rotation());

        record.rotate = None;
        assert_eq!(record.rotation_kind(), RotationKind::Quaternion);

        record.orient = None;
        assert_eq!(record.rotation_kind(), RotationKind::Missing);
    }

    #[test]
    fn test_missing_fields() {
        assert!(euler_record().missing_fields().is_empty());

        let record = ProductRecord {
            asset: Some("a.usd".to_string()),
            ..Default::default()
        };
        assert_eq!(record.missing_fields(), vec!["translate", "scale"]);
    }

    #[test]
    fn test_table_lookup_after_many_inserts() {
        let mut table = ProductTable::new();
        for i in 0..500 {
            let mut record = euler_record();
            record.translate = Some([i as f64, 0.0, 0.0]);
            table.insert(format!("product_{:03}", i), record);
        }

        // Replacing keeps the original position
        let mut moved = euler_record();
        moved.translate = Some([-1.0, 0.0, 0.0]);
        table.insert("product_250", moved);

        assert_eq!(table.len(), 500);
        assert!(table.contains("product_499"));
        assert!(!table.contains("product_500"));
        assert_eq!(table.get("product_123").unwrap().translate, Some([123.0, 0.0, 0.0]));
        assert_eq!(table.get("product_250").unwrap().translate, Some([-1.0, 0.0, 0.0]));
        assert_eq!(table.ids().nth(250), Some("product_250"));

        table.get_mut("product_007").unwrap().physics_enabled = true;
        assert_eq!(table.physics_count(), 1);
    }

    #[test]
    fn test_record_at_mut() {
        let mut table = ProductTable::new();
        table.insert("a", euler_record());
        table.insert("b", euler_record());

        let (id, record) = table.record_at_mut(1);
        assert_eq!(id, "b");
        record.rotate = None;

        assert_eq!(table.get("b").unwrap().rotate, None);
        assert!(table.get("a").unwrap().rotate.is_some());
    }

    #[test]
    fn test_table_preserves_insertion_order() {
        let mut table = ProductTable::new();
        table.insert("b", euler_record());
        table.insert("a", euler_record());
        table.insert("c", euler_record());

        let ids: Vec<&str> = table.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_table_insert_replaces_in_place() {
        let mut table = ProductTable::new();
        table.insert("a", euler_record());
        table.insert("b", euler_record());

        let mut replacement = euler_record();
        replacement.physics_enabled = true;
        let previous = table.insert("a", replacement);

        assert!(previous.is_some());
        assert_eq!(table.len(), 2);
        assert_eq!(table.ids().next(), Some("a"));
        assert!(table.get("a").map(|r| r.physics_enabled).unwrap_or(false));
        assert_eq!(table.physics_count(), 1);
    }

    #[test]
    fn test_record_json_field_names() {
        let json = serde_json::to_value(euler_record()).unwrap();
        assert_eq!(json["rotate"], serde_json::json!([-90.0, 90.0, 0.0]));
        assert!(json.get("orient").is_none());
        assert_eq!(json["physics_enabled"], serde_json::json!(false));
    }

    #[test]
    fn test_table_serializes_in_order() {
        let table: ProductTable = vec![
            ("z".to_string(), euler_record()),
            ("a".to_string(), euler_record()),
        ]
        .into_iter()
        .collect();

        let text = serde_json::to_string(&table).unwrap();
        let z = text.find("\"z\"").unwrap();
        let a = text.find("\"a\"").unwrap();
        assert!(z < a);
    }
}
