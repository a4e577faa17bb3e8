//! Order summary calculation.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::checkout::ShippingTier;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// VAT in basis points (16%).
pub const VAT_RATE_BPS: i64 = 1600;

/// Pricing breakdown shown before the order is placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSummary {
    /// Sum of unit price × quantity.
    pub subtotal: Money,
    /// Price of the chosen shipping tier.
    pub shipping: Money,
    /// VAT on the subtotal.
    pub tax: Money,
    /// subtotal + shipping + tax.
    pub total: Money,
}

/// Compute the summary for `items` shipped with `tier`.
///
/// Pure. Tax applies to the subtotal only, rounded half away from zero to
/// the minor unit. Shipping tiers are priced in KES, so items in any other currency
/// fail with [`CommerceError::CurrencyMismatch`].
pub fn calculate_summary(
    items: &[CartItem],
    tier: ShippingTier,
) -> Result<CheckoutSummary, CommerceError> {
    let currency = items
        .first()
        .map(|i| i.price.currency)
        .unwrap_or(Currency::KES);

    let mut subtotal = Money::zero(currency);
    for item in items {
        subtotal = subtotal.try_add(&item.line_total()?)?;
    }

    let shipping = tier.price();
    let tax = subtotal.basis_points(VAT_RATE_BPS)?;
    let total = subtotal.try_add(&shipping)?.try_add(&tax)?;

    Ok(CheckoutSummary {
        subtotal,
        shipping,
        tax,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<CartItem> {
        vec![
            CartItem::new("1", "Wireless Bluetooth Headphones", Money::kes(9999), 1),
            CartItem::new("3", "Premium Leather Backpack", Money::kes(7999), 1),
        ]
    }

    #[test]
    fn test_standard_summary_is_exact() {
        let summary = calculate_summary(&items(), ShippingTier::Standard).unwrap();
        assert_eq!(summary.subtotal, Money::kes(17998));
        assert_eq!(summary.shipping, Money::kes(599));
        assert_eq!(summary.tax, Money::new(287_968, Currency::KES));
        assert_eq!(summary.total, Money::new(2_147_668, Currency::KES));
        assert_eq!(summary.total.display(), "KES 21,476.68");
    }

    #[test]
    fn test_express_summary() {
        let summary = calculate_summary(&items(), ShippingTier::Express).unwrap();
        assert_eq!(summary.shipping, Money::kes(1499));
        assert_eq!(summary.total, Money::new(2_237_668, Currency::KES));
    }

    #[test]
    fn test_quantities_multiply() {
        let items = vec![CartItem::new("2", "Smart Fitness Watch", Money::kes(14999), 2)];
        let summary = calculate_summary(&items, ShippingTier::Standard).unwrap();
        assert_eq!(summary.subtotal, Money::kes(29998));
        assert_eq!(summary.tax, Money::new(479_968, Currency::KES));
    }

    #[test]
    fn test_tax_rounds_to_nearest_minor_unit() {
        // 16% of 3 cents is 0.48 cents; of 4 cents, 0.64.
        let items = vec![CartItem::new("9", "Sticker", Money::new(3, Currency::KES), 1)];
        let summary = calculate_summary(&items, ShippingTier::Standard).unwrap();
        assert!(summary.tax.is_zero());

        let items = vec![CartItem::new("9", "Sticker", Money::new(4, Currency::KES), 1)];
        let summary = calculate_summary(&items, ShippingTier::Standard).unwrap();
        assert_eq!(summary.tax, Money::new(1, Currency::KES));
    }

    #[test]
    fn test_empty_items_still_charge_shipping() {
        let summary = calculate_summary(&[], ShippingTier::Standard).unwrap();
        assert!(summary.subtotal.is_zero());
        assert!(summary.tax.is_zero());
        assert_eq!(summary.total, Money::kes(599));
    }

    #[test]
    fn test_repeatable() {
        let a = calculate_summary(&items(), ShippingTier::Standard).unwrap();
        let b = calculate_summary(&items(), ShippingTier::Standard).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_foreign_currency_is_rejected() {
        let items = vec![CartItem::new("7", "Import", Money::from_major(10, Currency::USD), 1)];
        let err = calculate_summary(&items, ShippingTier::Standard).unwrap_err();
        assert!(matches!(err, CommerceError::CurrencyMismatch { .. }));
    }
}
