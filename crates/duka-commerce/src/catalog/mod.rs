//! Product catalog module.
//!
//! Contains product types, listing queries and the read-only
//! [`ProductCatalog`] collaborator.

mod product;
mod query;
mod recommend;

pub use product::{Product, ProductVariant};
pub use query::{Filter, ProductQuery, SortOption};
pub use recommend::{Recommendation, DEFAULT_RECOMMENDATION_LIMIT};

use async_trait::async_trait;

use crate::error::CommerceError;
use crate::ids::ProductId;

/// Read-only product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products passing `query`, in the order it asks for.
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError>;

    /// One product, or [`CommerceError::ProductNotFound`].
    async fn get(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Up to `limit` products for a recommendation shelf.
    async fn recommend(
        &self,
        shelf: &Recommendation,
        limit: usize,
    ) -> Result<Vec<Product>, CommerceError> {
        self.list(&shelf.query(limit)).await
    }
}
