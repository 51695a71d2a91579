//! Product id classification into shelf levels and categories.
//!
//! Rules are checked in order and the first literal prefix match wins.

use crate::plan::PlacementError;
use crate::record::ProductTable;

/// Coarse placement tier on the shelf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShelfLevel {
    Lower,
    Upper,
}

impl ShelfLevel {
    /// Scope name used in scene paths.
    pub fn as_str(self) -> &'static str {
        match self {
            ShelfLevel::Lower => "Items_Lower",
            ShelfLevel::Upper => "Items_Upper",
        }
    }
}

impl std::fmt::Display for ShelfLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a product id prefix to a shelf level and category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryRule {
    /// Literal product id prefix
    pub prefix: &'static str,

    /// Shelf the category lives on
    pub shelf_level: ShelfLevel,

    /// Category scope name
    pub category: &'static str,

    /// Human-readable name for reports
    pub label: &'static str,
}

impl CategoryRule {
    pub const fn new(
        prefix: &'static str,
        shelf_level: ShelfLevel,
        category: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            prefix,
            shelf_level,
            category,
            label,
        }
    }

    /// Returns true if this rule applies to the product id.
    pub fn matches(&self, product_id: &str) -> bool {
        product_id.starts_with(self.prefix)
    }

    /// The resolved slot for products matching this rule.
    pub fn slot(&self) -> ShelfSlot {
        ShelfSlot {
            shelf_level: self.shelf_level,
            category: self.category,
            label: self.label,
        }
    }
}

/// The known shop categories, in resolution order.
pub const SHOP_CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule::new("_06_mustard_bottle", ShelfLevel::Lower, "MustardBottles", "Mustard Bottles"),
    CategoryRule::new("_10_potted_meat_can", ShelfLevel::Lower, "Spam", "Spam Cans"),
    CategoryRule::new("_07_tuna_fish_can", ShelfLevel::Lower, "TunaCans", "Tuna Cans"),
    CategoryRule::new("_21_bleach_cleanser", ShelfLevel::Lower, "Cleaner", "Bleach Cleanser"),
    CategoryRule::new("_03_cracker_box", ShelfLevel::Upper, "Crackers", "Cracker Boxes"),
    CategoryRule::new("_05_tomato_soup_can", ShelfLevel::Upper, "TomatoCans", "Tomato Soup Cans"),
    CategoryRule::new("_25_mug", ShelfLevel::Upper, "Mugs", "Mugs"),
    CategoryRule::new("mac_n_cheese", ShelfLevel::Upper, "Mac_n_Cheese", "Mac-n-Cheese"),
];

/// Where a product goes: shelf level plus category scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShelfSlot {
    pub shelf_level: ShelfLevel,
    pub category: &'static str,
    pub label: &'static str,
}

impl ShelfSlot {
    /// `{shelf_level}/{category}`
    pub fn scope_path(&self) -> String {
        format!("{}/{}", self.shelf_level, self.category)
    }
}

/// Resolve a product id against an ordered rule list.
///
/// Returns [`PlacementError::Unresolved`] when no prefix matches; the
/// caller reports it and carries on with the other products.
pub fn resolve(product_id: &str, rules: &[CategoryRule]) -> Result<ShelfSlot, PlacementError> {
    rules
        .iter()
        .find(|rule| rule.matches(product_id))
        .map(CategoryRule::slot)
        .ok_or_else(|| PlacementError::Unresolved(product_id.to_string()))
}

/// Products of a table grouped by rule.
#[derive(Clone, Debug, Default)]
pub struct Categorization {
    /// One group per rule, in rule order (groups may be empty)
    pub groups: Vec<(CategoryRule, Vec<String>)>,

    /// Ids that matched no rule, in table order
    pub unresolved: Vec<String>,
}

impl Categorization {
    /// Groups that received at least one product.
    pub fn non_empty(&self) -> impl Iterator<Item = &(CategoryRule, Vec<String>)> {
        self.groups.iter().filter(|(_, ids)| !ids.is_empty())
    }

    /// Total number of products that resolved to a category.
    pub fn resolved_count(&self) -> usize {
        self.groups.iter().map(|(_, ids)| ids.len()).sum()
    }
}

/// Group every product in the table by its resolved category.
pub fn categorize(table: &ProductTable, rules: &[CategoryRule]) -> Categorization {
    let mut categorization = Categorization {
        groups: rules.iter().map(|rule| (*rule, Vec::new())).collect(),
        unresolved: Vec::new(),
    };

    for id in table.ids() {
        match rules.iter().position(|rule| rule.matches(id)) {
            Some(index) => categorization.groups[index].1.push(id.to_string()),
            None => categorization.unresolved.push(id.to_string()),
        }
    }

    categorization
}
