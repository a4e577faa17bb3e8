//! Cart lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// One product line in the cart.
///
/// `price` is the unit price; `attributes` holds the chosen variant
/// options (size, color) and is part of the line's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl CartItem {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money, quantity: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            image: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Identity of the line this item merges into.
    pub fn line_key(&self) -> LineKey {
        LineKey {
            product_id: self.id.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.price.try_multiply(self.quantity)
    }

    /// Human label for the chosen options, e.g. `Color: Black, Size: M`.
    pub fn variant_label(&self) -> Option<String> {
        if self.attributes.is_empty() {
            return None;
        }
        Some(
            self.attributes
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Identifies a cart line: the product plus its chosen attributes.
///
/// Two adds of the same product with different attributes produce two
/// lines; with equal attributes they merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub attributes: BTreeMap<String, String>,
}

impl LineKey {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Does `item` belong to this line?
    pub fn matches(&self, item: &CartItem) -> bool {
        item.id == self.product_id && item.attributes == self.attributes
    }
}

impl From<ProductId> for LineKey {
    fn from(product_id: ProductId) -> Self {
        Self::new(product_id)
    }
}

impl From<&str> for LineKey {
    fn from(product_id: &str) -> Self {
        Self::new(product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_key_includes_attributes() {
        let plain = CartItem::new("2", "Smart Fitness Watch", Money::kes(14999), 1);
        let black = plain.clone().with_attribute("color", "Black");

        assert_ne!(plain.line_key(), black.line_key());
        assert!(LineKey::new("2").matches(&plain));
        assert!(!LineKey::new("2").matches(&black));
        assert!(LineKey::new("2").with_attribute("color", "Black").matches(&black));
    }

    #[test]
    fn test_line_total() {
        let item = CartItem::new("1", "Wireless Bluetooth Headphones", Money::kes(9999), 3);
        assert_eq!(item.line_total().unwrap(), Money::kes(29997));
    }

    #[test]
    fn test_variant_label() {
        let item = CartItem::new("3", "Premium Leather Backpack", Money::kes(7999), 1)
            .with_attribute("size", "L")
            .with_attribute("color", "Brown");
        assert_eq!(item.variant_label().as_deref(), Some("color: Brown, size: L"));
    }

    #[test]
    fn test_serialized_shape() {
        let item = CartItem::new("1", "Headphones", Money::kes(9999), 2).with_image("/h.jpg");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["image"], "/h.jpg");
        assert!(json.get("attributes").is_none());
    }
}
