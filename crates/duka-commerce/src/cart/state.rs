//! Cart state and its reducer.

use serde::Serialize;

use crate::cart::{CartItem, LineKey};
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Snapshot of the cart.
///
/// Fields are private so `total_items` and `total_price` can only come
/// from [`reduce`] and always agree with `items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<CartItem>,
    total_items: i64,
    total_price: Money,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_price: Money::zero(Currency::default()),
        }
    }
}

impl CartState {
    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> i64 {
        self.total_items
    }

    /// Sum of price × quantity.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items.iter().find(|i| key.matches(i))
    }

    /// Currency of the cart; the first line decides.
    pub fn currency(&self) -> Currency {
        self.items
            .first()
            .map(|i| i.price.currency)
            .unwrap_or_default()
    }

    fn from_items(items: Vec<CartItem>) -> Result<Self, CommerceError> {
        let currency = items
            .first()
            .map(|i| i.price.currency)
            .unwrap_or_default();

        let mut total_items: i64 = 0;
        let mut total_price = Money::zero(currency);
        for item in &items {
            total_items = total_items
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            total_price = total_price.try_add(&item.line_total()?)?;
        }

        Ok(Self {
            items,
            total_items,
            total_price,
        })
    }
}

/// A cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add `quantity` of a line, merging into an existing line with the
    /// same [`LineKey`].
    AddItem(CartItem),
    /// Drop a line. Unknown keys are a no-op.
    RemoveItem(LineKey),
    /// Set a line's quantity. Zero or below removes the line.
    UpdateQuantity { key: LineKey, quantity: i64 },
    /// Empty the cart.
    Clear,
}

impl CartCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::AddItem(_) => "add_item",
            CartCommand::RemoveItem(_) => "remove_item",
            CartCommand::UpdateQuantity { .. } => "update_quantity",
            CartCommand::Clear => "clear",
        }
    }
}

fn check_limit(quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

/// Apply `command` to `state`, producing the next state.
///
/// Pure: the input is never modified, and a rejected command leaves no
/// partial result behind.
///
/// Returns an error if:
/// - An added quantity is not positive
/// - A line would exceed [`MAX_QUANTITY_PER_ITEM`]
/// - An added price is negative or in a different currency than the cart
/// - Totals overflow
pub fn reduce(state: &CartState, command: &CartCommand) -> Result<CartState, CommerceError> {
    let mut items = state.items.clone();

    match command {
        CartCommand::AddItem(item) => {
            if item.quantity <= 0 {
                return Err(CommerceError::InvalidQuantity(item.quantity));
            }
            if item.price.is_negative() {
                return Err(CommerceError::InvalidPrice(item.price.amount));
            }

            let key = item.line_key();
            if let Some(existing) = items.iter_mut().find(|i| key.matches(i)) {
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CommerceError::Overflow)?;
                check_limit(quantity)?;
                existing.quantity = quantity;
            } else {
                check_limit(item.quantity)?;
                items.push(item.clone());
            }
        }
        CartCommand::RemoveItem(key) => {
            items.retain(|i| !key.matches(i));
        }
        CartCommand::UpdateQuantity { key, quantity } => {
            if *quantity <= 0 {
                items.retain(|i| !key.matches(i));
            } else {
                check_limit(*quantity)?;
                if let Some(existing) = items.iter_mut().find(|i| key.matches(i)) {
                    existing.quantity = *quantity;
                }
            }
        }
        CartCommand::Clear => items.clear(),
    }

    CartState::from_items(items)
}
