//! Product recommendation shelves.

use crate::catalog::{Product, ProductQuery};
use crate::ids::ProductId;

/// Products shown per shelf unless the caller asks otherwise.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 4;

/// Which shelf of products to recommend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// Products flagged as featured.
    Featured,
    /// Other products in `category`, never `product_id` itself.
    Related {
        product_id: ProductId,
        category: String,
    },
    /// Discounted products.
    Sale,
}

impl Recommendation {
    /// The "you may also like" shelf for `product`.
    pub fn related_to(product: &Product) -> Self {
        Recommendation::Related {
            product_id: product.id.clone(),
            category: product.category.clone(),
        }
    }

    /// Catalog query that fills this shelf with at most `limit` products.
    pub fn query(&self, limit: usize) -> ProductQuery {
        let query = match self {
            Recommendation::Featured => ProductQuery::new().featured_only(),
            Recommendation::Related {
                product_id,
                category,
            } => ProductQuery::new()
                .with_category(category.clone())
                .excluding(product_id.clone()),
            Recommendation::Sale => ProductQuery::new().on_sale_only(),
        };
        query.with_limit(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Filter;

    #[test]
    fn test_related_query() {
        let rec = Recommendation::Related {
            product_id: ProductId::new("2"),
            category: "Electronics".into(),
        };
        let query = rec.query(3);
        assert_eq!(
            query.filters,
            vec![
                Filter::category("Electronics"),
                Filter::Exclude(ProductId::new("2")),
            ]
        );
        assert_eq!(query.limit, Some(3));
        assert_eq!(query.sort, None);
    }

    #[test]
    fn test_shelf_filters() {
        assert_eq!(
            Recommendation::Featured.query(DEFAULT_RECOMMENDATION_LIMIT).filters,
            vec![Filter::Featured]
        );
        assert_eq!(Recommendation::Sale.query(1).filters, vec![Filter::OnSale]);
    }
}
