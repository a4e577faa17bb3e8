//! Shipping tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// The two fixed delivery options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingTier {
    #[default]
    Standard,
    Express,
}

impl ShippingTier {
    pub const ALL: [ShippingTier; 2] = [ShippingTier::Standard, ShippingTier::Express];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingTier::Standard => "standard",
            ShippingTier::Express => "express",
        }
    }

    /// Fixed price of the tier.
    pub fn price(&self) -> Money {
        match self {
            ShippingTier::Standard => Money::kes(599),
            ShippingTier::Express => Money::kes(1499),
        }
    }

    /// Full catalog entry for the tier.
    pub fn method(&self) -> ShippingMethod {
        match self {
            ShippingTier::Standard => ShippingMethod {
                id: *self,
                name: "Standard Shipping".to_string(),
                price: self.price(),
                min_delivery_days: Some(3),
                max_delivery_days: Some(5),
            },
            ShippingTier::Express => ShippingMethod {
                id: *self,
                name: "Express Shipping".to_string(),
                price: self.price(),
                min_delivery_days: Some(1),
                max_delivery_days: Some(2),
            },
        }
    }
}

impl fmt::Display for ShippingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ShippingTier::Standard),
            "express" => Ok(ShippingTier::Express),
            other => Err(format!("unknown shipping method '{}'", other)),
        }
    }
}

/// A shipping option as shown to the customer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub id: ShippingTier,
    pub name: String,
    pub price: Money,
    pub min_delivery_days: Option<i32>,
    pub max_delivery_days: Option<i32>,
}

impl ShippingMethod {
    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_delivery_days, self.max_delivery_days) {
            (Some(min), Some(max)) if min == max => Some(format!("{} business days", min)),
            (Some(min), Some(max)) => Some(format!("{}-{} business days", min, max)),
            (Some(min), None) => Some(format!("{}+ business days", min)),
            (None, Some(max)) => Some(format!("Up to {} business days", max)),
            (None, None) => None,
        }
    }

    /// Check if this is free shipping.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// Every tier in display order.
pub fn shipping_methods() -> Vec<ShippingMethod> {
    ShippingTier::ALL.iter().map(ShippingTier::method).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_prices() {
        assert_eq!(ShippingTier::Standard.price(), Money::kes(599));
        assert_eq!(ShippingTier::Express.price(), Money::kes(1499));
        assert_eq!(ShippingTier::default(), ShippingTier::Standard);
    }

    #[test]
    fn test_delivery_estimate() {
        let standard = ShippingTier::Standard.method();
        assert_eq!(standard.name, "Standard Shipping");
        assert_eq!(
            standard.delivery_estimate().as_deref(),
            Some("3-5 business days")
        );
        assert!(!standard.is_free());

        let express = ShippingTier::Express.method();
        assert_eq!(
            express.delivery_estimate().as_deref(),
            Some("1-2 business days")
        );
    }

    #[test]
    fn test_catalog_order() {
        let ids: Vec<_> = shipping_methods().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![ShippingTier::Standard, ShippingTier::Express]);
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("Express".parse::<ShippingTier>(), Ok(ShippingTier::Express));
        assert!("overnight".parse::<ShippingTier>().is_err());
        assert_eq!(
            serde_json::to_string(&ShippingTier::Standard).unwrap(),
            "\"standard\""
        );
    }
}
