//! Product and variant types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartItem, CartState, LineKey};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    /// Original price, shown struck through when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub images: Vec<String>,
    pub thumbnail: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub in_stock: bool,
    pub stock_quantity: i64,
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Descriptive attributes such as brand or material.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Check if the compare-at price is above the selling price.
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare| compare.currency == self.price.currency && compare.amount > self.price.amount)
    }

    /// Percentage off the compare-at price, rounded to the nearest whole percent.
    pub fn discount_percentage(&self) -> Option<i64> {
        if !self.is_on_sale() {
            return None;
        }
        let compare = self.compare_at_price?.amount;
        let off = compare - self.price.amount;
        Some((off * 100 + compare / 2) / compare)
    }

    /// Variant whose attributes match exactly.
    pub fn find_variant(&self, attributes: &BTreeMap<String, String>) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.attributes == attributes)
    }

    /// Build the cart line an add-to-cart action dispatches against `cart`.
    ///
    /// A product with variants only accepts attributes naming one of them
    /// exactly; the variant's price and stock then apply. Units already in
    /// the matching cart line count against the stock limit.
    pub fn to_cart_item(
        &self,
        cart: &CartState,
        quantity: i64,
        attributes: BTreeMap<String, String>,
    ) -> Result<CartItem, CommerceError> {
        if !self.in_stock {
            return Err(CommerceError::OutOfStock(self.id.to_string()));
        }

        let (price, available) = match self.find_variant(&attributes) {
            Some(variant) if !variant.in_stock => {
                return Err(CommerceError::OutOfStock(format!(
                    "{} ({})",
                    self.id, variant.title
                )));
            }
            Some(variant) => (variant.price, variant.stock_quantity),
            None if !self.variants.is_empty() && !attributes.is_empty() => {
                let wanted: Vec<String> =
                    attributes.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                return Err(CommerceError::UnknownVariant(format!(
                    "{} ({})",
                    self.id,
                    wanted.join(", ")
                )));
            }
            None => (self.price, self.stock_quantity),
        };

        let key = LineKey {
            product_id: self.id.clone(),
            attributes: attributes.clone(),
        };
        let in_cart = cart.get(&key).map_or(0, |line| line.quantity);
        let requested = quantity.saturating_add(in_cart);
        if requested > available {
            return Err(CommerceError::QuantityExceedsLimit(requested, available));
        }

        Ok(CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price,
            quantity,
            image: self.thumbnail.clone(),
            attributes,
        })
    }
}

/// A purchasable option of a product (e.g., size/color combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Variant name (e.g., "Black / Large").
    pub title: String,
    pub sku: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    /// Options that define this variant.
    pub attributes: BTreeMap<String, String>,
    pub stock_quantity: i64,
    pub in_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{reduce, CartCommand};

    fn watch() -> Product {
        Product {
            id: ProductId::new("2"),
            name: "Smart Fitness Watch".into(),
            description: "Track your health and fitness goals.".into(),
            price: Money::kes(14999),
            compare_at_price: Some(Money::kes(17999)),
            images: vec!["/images/products/watch-1.jpg".into()],
            thumbnail: "/images/products/watch-thumb.jpg".into(),
            category: "Electronics".into(),
            subcategory: Some("Wearables".into()),
            featured: true,
            in_stock: true,
            stock_quantity: 30,
            sku: "SW-002".into(),
            attributes: BTreeMap::new(),
            variants: vec![
                ProductVariant {
                    id: VariantId::new("2-black"),
                    title: "Black".into(),
                    sku: "SW-002-BLK".into(),
                    price: Money::kes(14999),
                    compare_at_price: None,
                    attributes: BTreeMap::from([("color".to_string(), "Black".to_string())]),
                    stock_quantity: 20,
                    in_stock: true,
                },
                ProductVariant {
                    id: VariantId::new("2-gold"),
                    title: "Gold".into(),
                    sku: "SW-002-GLD".into(),
                    price: Money::kes(16999),
                    compare_at_price: None,
                    attributes: BTreeMap::from([("color".to_string(), "Gold".to_string())]),
                    stock_quantity: 0,
                    in_stock: false,
                },
            ],
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn test_on_sale() {
        let mut product = watch();
        assert!(product.is_on_sale());
        assert_eq!(product.discount_percentage(), Some(17));

        product.compare_at_price = Some(Money::kes(14999));
        assert!(!product.is_on_sale());
        product.compare_at_price = None;
        assert_eq!(product.discount_percentage(), None);
    }

    #[test]
    fn test_to_cart_item() {
        let item = watch().to_cart_item(&CartState::default(), 2, BTreeMap::new()).unwrap();
        assert_eq!(item.id.as_str(), "2");
        assert_eq!(item.price, Money::kes(14999));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.image, "/images/products/watch-thumb.jpg");
    }

    #[test]
    fn test_to_cart_item_uses_variant() {
        let attrs = BTreeMap::from([("color".to_string(), "Black".to_string())]);
        let item = watch().to_cart_item(&CartState::default(), 1, attrs.clone()).unwrap();
        assert_eq!(item.attributes, attrs);

        let err = watch().to_cart_item(&CartState::default(), 21, attrs).unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(21, 20)));
    }

    #[test]
    fn test_out_of_stock() {
        let gold = BTreeMap::from([("color".to_string(), "Gold".to_string())]);
        assert!(matches!(
            watch().to_cart_item(&CartState::default(), 1, gold),
            Err(CommerceError::OutOfStock(_))
        ));

        let mut product = watch();
        product.in_stock = false;
        assert!(matches!(
            product.to_cart_item(&CartState::default(), 1, BTreeMap::new()),
            Err(CommerceError::OutOfStock(_))
        ));
    }

    #[test]
    fn test_attributes_must_name_a_variant() {
        let gold_medium = BTreeMap::from([
            ("color".to_string(), "Gold".to_string()),
            ("size".to_string(), "M".to_string()),
        ]);
        let err = watch()
            .to_cart_item(&CartState::default(), 1, gold_medium)
            .unwrap_err();
        assert!(matches!(err, CommerceError::UnknownVariant(ref v) if v == "2 (color=Gold, size=M)"));

        let lowercase = BTreeMap::from([("color".to_string(), "gold".to_string())]);
        assert!(matches!(
            watch().to_cart_item(&CartState::default(), 1, lowercase),
            Err(CommerceError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_attributes_on_plain_product() {
        let mut product = watch();
        product.variants.clear();
        let attrs = BTreeMap::from([("engraving".to_string(), "JD".to_string())]);
        let item = product
            .to_cart_item(&CartState::default(), 1, attrs.clone())
            .unwrap();
        assert_eq!(item.price, Money::kes(14999));
        assert_eq!(item.attributes, attrs);
    }

    #[test]
    fn test_stock_counts_units_already_in_cart() {
        let black = BTreeMap::from([("color".to_string(), "Black".to_string())]);
        let first = watch()
            .to_cart_item(&CartState::default(), 15, black.clone())
            .unwrap();
        let cart = reduce(&CartState::default(), &CartCommand::AddItem(first)).unwrap();

        let err = watch().to_cart_item(&cart, 6, black.clone()).unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(21, 20)));
        assert!(watch().to_cart_item(&cart, 5, black).is_ok());

        // Another line of the same product has its own stock.
        let mut plain = watch();
        plain.variants.clear();
        assert!(plain.to_cart_item(&cart, 30, BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{
            "id": "9", "name": "Mug", "description": "Ceramic",
            "price": {"amount": 99900, "currency": "KES"},
            "thumbnail": "/mug.jpg", "category": "Home & Kitchen",
            "inStock": true, "stockQuantity": 3, "sku": "MUG-9",
            "createdAt": "2023-01-01T00:00:00Z", "updatedAt": "2023-01-01T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.variants.is_empty());
        assert!(!product.is_on_sale());
    }
}
