//! Order submission collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::checkout::CheckoutFormData;
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::order::Order;

/// What checkout sends when the customer confirms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<CartItem>,
    pub form_data: CheckoutFormData,
}

/// Accepts orders and answers lookups for placed ones.
///
/// Implementations must signal a missing order with
/// [`CommerceError::OrderNotFound`] and transport problems with
/// [`CommerceError::Unavailable`], so callers can tell them apart.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order, returning its identifier.
    async fn submit(&self, request: &OrderRequest) -> Result<OrderId, CommerceError>;

    /// Fetch one order.
    async fn get(&self, id: &OrderId) -> Result<Order, CommerceError>;

    /// All orders, most recent first.
    async fn list(&self) -> Result<Vec<Order>, CommerceError>;
}
