use async_trait::async_trait;
use duka_commerce::catalog::{Product, ProductCatalog, ProductQuery, Recommendation};
use duka_commerce::{CommerceError, ProductId};
use tracing::{debug, info};

use crate::latency::pause;
use crate::MockBackend;

#[async_trait]
impl ProductCatalog for MockBackend {
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError> {
        pause(self.latency.product_list_ms).await;

        let products = query.apply(&self.products);
        info!(
            matched = products.len(),
            total = self.products.len(),
            "listed products"
        );
        Ok(products)
    }

    async fn get(&self, id: &ProductId) -> Result<Product, CommerceError> {
        pause(self.latency.product_detail_ms).await;

        debug!(product_id = %id, "fetching product");
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    async fn recommend(
        &self,
        shelf: &Recommendation,
        limit: usize,
    ) -> Result<Vec<Product>, CommerceError> {
        pause(self.latency.recommendation_ms).await;

        let products = shelf.query(limit).apply(&self.products);
        debug!(?shelf, found = products.len(), "recommended products");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_commerce::catalog::SortOption;
    use duka_commerce::Money;

    #[tokio::test]
    async fn test_list_all() {
        let backend = MockBackend::instant();
        let products = ProductCatalog::list(&backend, &ProductQuery::default())
            .await
            .unwrap();
        assert_eq!(products.len(), 8);
    }

    #[tokio::test]
    async fn test_list_filtered_and_sorted() {
        let backend = MockBackend::instant();
        let query = ProductQuery::default()
            .with_category("Electronics")
            .with_sort(SortOption::PriceLow);
        let products = ProductCatalog::list(&backend, &query).await.unwrap();

        let prices: Vec<_> = products.iter().map(|p| p.price).collect();
        assert_eq!(
            prices,
            vec![Money::kes(9999), Money::kes(14999), Money::kes(49999)]
        );
    }

    #[tokio::test]
    async fn test_recommendation_shelves() {
        let backend = MockBackend::instant();
        let ids = |products: Vec<Product>| {
            products
                .into_iter()
                .map(|p| p.id.as_str().to_string())
                .collect::<Vec<_>>()
        };

        let featured = backend.recommend(&Recommendation::Featured, 4).await.unwrap();
        assert_eq!(ids(featured), vec!["1", "2", "3", "5"]);

        let sale = backend.recommend(&Recommendation::Sale, 2).await.unwrap();
        assert_eq!(ids(sale), vec!["1", "3"]);

        let watch = ProductCatalog::get(&backend, &ProductId::new("2")).await.unwrap();
        let related = backend
            .recommend(&Recommendation::related_to(&watch), 4)
            .await
            .unwrap();
        assert_eq!(ids(related), vec!["1", "5"]);
    }

    #[tokio::test]
    async fn test_get_unknown_product() {
        let backend = MockBackend::instant();
        let err = ProductCatalog::get(&backend, &ProductId::new("999"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(ref id) if id == "999"));
        assert!(err.is_not_found());
    }
}
