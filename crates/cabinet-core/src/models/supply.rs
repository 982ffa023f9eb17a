//! Supply (consumables inventory) records.

use serde::{Deserialize, Serialize};

use super::{CollectionKind, Extra, Record};

/// A consumable kept in stock at the practice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub id: String,
    pub name: String,
    /// Grouping shown in the inventory view (dressings, injection...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Units currently in stock
    #[serde(default)]
    pub quantity: u32,
    /// Reorder threshold
    #[serde(default)]
    pub minimum_quantity: u32,
    /// Counting unit (box, piece, roll...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Fields outside the schema, kept as they are
    #[serde(flatten)]
    pub extra: Extra,
}

impl Supply {
    /// Create an unsaved supply line.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            ..Default::default()
        }
    }

    /// Stock is at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_quantity
    }
}

/// Partial update for a [`Supply`].
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupplyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub minimum_quantity: Option<u32>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub unit: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub supplier: Option<Option<String>>,
    /// Other fields, merged into the record's extra fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Supply {
    type Patch = SupplyPatch;
    const KIND: CollectionKind = CollectionKind::Supplies;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: SupplyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(minimum) = patch.minimum_quantity {
            self.minimum_quantity = minimum;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
        super::merge_extra(&mut self.extra, patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock() {
        let mut supply = Supply::new("Compresses", 10);
        supply.minimum_quantity = 5;
        assert!(!supply.is_low_stock());

        supply.apply(SupplyPatch {
            quantity: Some(5),
            ..Default::default()
        });
        assert!(supply.is_low_stock());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let json = r#"{"id": "s1", "name": "Gants", "quantity": -3}"#;
        assert!(serde_json::from_str::<Supply>(json).is_err());
    }
}
