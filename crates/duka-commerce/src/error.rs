//! Commerce error types.

use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Saved address not found.
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// The chosen attributes do not name any variant of the product.
    #[error("No variant matches: {0}")]
    UnknownVariant(String),

    /// Product cannot be added because it is out of stock.
    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Negative unit price.
    #[error("Invalid price: {0}")]
    InvalidPrice(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// User-correctable field errors.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A collaborator (order service, catalog) failed transiently.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Durable storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] duka_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// The requested entity does not exist; callers should fall back to a
    /// listing instead of rendering a detail view.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommerceError::ProductNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::AddressNotFound(_)
        )
    }

    /// Nothing was committed, so repeating the same call is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CommerceError::Unavailable(_) | CommerceError::Storage(_)
        )
    }

    /// Field errors carried by a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CommerceError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
