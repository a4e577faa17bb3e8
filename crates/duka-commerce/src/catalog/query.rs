//! Product list filtering and sorting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Most recently created first.
    Newest,
    /// Sort by price, low to high.
    PriceLow,
    /// Sort by price, high to low.
    PriceHigh,
    /// Sort by name A-Z, ignoring case.
    Name,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceLow => "price-low",
            SortOption::PriceHigh => "price-high",
            SortOption::Name => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceLow => "Price: Low to High",
            SortOption::PriceHigh => "Price: High to Low",
            SortOption::Name => "Name: A-Z",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOption::Newest),
            "price-low" => Ok(SortOption::PriceLow),
            "price-high" => Ok(SortOption::PriceHigh),
            "name" => Ok(SortOption::Name),
            other => Err(format!(
                "unknown sort '{}' (expected newest, price-low, price-high or name)",
                other
            )),
        }
    }
}

/// A product filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring of name or description.
    Text(String),
    /// Case-insensitive exact category.
    Category(String),
    /// Inclusive price bounds.
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Only show in-stock items.
    InStock,
    /// Only show discounted items.
    OnSale,
    /// Only products flagged for the storefront's featured shelf.
    Featured,
    /// Everything except this product.
    Exclude(ProductId),
}

impl Filter {
    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Create a category filter.
    pub fn category(name: impl Into<String>) -> Self {
        Filter::Category(name.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Does `product` pass this filter?
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(query) => {
                let needle = query.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
            Filter::Category(name) => product.category.to_lowercase() == name.to_lowercase(),
            Filter::PriceRange { min, max } => {
                let price = product.price;
                let above = min.map_or(true, |m| m.currency == price.currency && price.amount >= m.amount);
                let below = max.map_or(true, |m| m.currency == price.currency && price.amount <= m.amount);
                above && below
            }
            Filter::InStock => product.in_stock,
            Filter::OnSale => product.is_on_sale(),
            Filter::Featured => product.featured,
            Filter::Exclude(id) => &product.id != id,
        }
    }
}

/// Filters plus an optional sort and limit. With no sort, catalog order is
/// kept.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductQuery {
    /// Filters to apply; a product must pass all of them.
    pub filters: Vec<Filter>,
    pub sort: Option<SortOption>,
    /// Keep at most this many products, taken after sorting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query. Blank queries are ignored.
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.trim().is_empty() {
            self.filters.push(Filter::Text(q.trim().to_string()));
        }
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.filters.push(Filter::category(category));
        self
    }

    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        if min.is_some() || max.is_some() {
            self.filters.push(Filter::price_range(min, max));
        }
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.filters.push(Filter::InStock);
        self
    }

    pub fn on_sale_only(mut self) -> Self {
        self.filters.push(Filter::OnSale);
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.filters.push(Filter::Featured);
        self
    }

    pub fn excluding(mut self, id: ProductId) -> Self {
        self.filters.push(Filter::Exclude(id));
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filter and sort `products`. Sorting is stable.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut out: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            Some(SortOption::Newest) => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Some(SortOption::PriceLow) => out.sort_by_key(|p| p.price.amount),
            Some(SortOption::PriceHigh) => out.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            Some(SortOption::Name) => out.sort_by_key(|p| p.name.to_lowercase()),
            None => {}
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}
