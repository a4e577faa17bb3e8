//! In-memory stand-in for the storefront's remote services.
//!
//! [`MockBackend`] answers the catalog, order and address-book calls from
//! seeded data held in memory, sleeping for a configurable
//! [`LatencyProfile`] on each call so callers see realistic timing.
//!
//! ```rust
//! use duka_backend::MockBackend;
//! use duka_commerce::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = MockBackend::instant();
//! let product = ProductCatalog::get(&backend, &ProductId::new("1")).await.unwrap();
//! assert_eq!(product.name, "Wireless Bluetooth Headphones");
//! # }
//! ```

mod addresses;
mod catalog;
mod latency;
mod orders;
pub mod seed;

pub use latency::LatencyProfile;

use duka_commerce::account::SavedAddress;
use duka_commerce::catalog::Product;
use duka_commerce::ids::UserId;
use duka_commerce::order::Order;
use tokio::sync::Mutex;

/// Seeded in-memory backend for one signed-in customer.
#[derive(Debug)]
pub struct MockBackend {
    latency: LatencyProfile,
    user_id: UserId,
    products: Vec<Product>,
    orders: Mutex<Vec<Order>>,
    addresses: Mutex<Vec<SavedAddress>>,
}

impl MockBackend {
    /// Seeded backend with the given delays.
    pub fn new(latency: LatencyProfile) -> Self {
        Self {
            latency,
            user_id: UserId::new(seed::DEMO_USER),
            products: seed::products(),
            orders: Mutex::new(seed::orders()),
            addresses: Mutex::new(seed::addresses()),
        }
    }

    /// Seeded backend with the default delays.
    pub fn seeded() -> Self {
        Self::new(LatencyProfile::default())
    }

    /// Seeded backend that never sleeps.
    pub fn instant() -> Self {
        Self::new(LatencyProfile::zero())
    }

    /// Backend with no products, orders or addresses.
    pub fn empty(latency: LatencyProfile) -> Self {
        Self {
            latency,
            user_id: UserId::new(seed::DEMO_USER),
            products: Vec::new(),
            orders: Mutex::new(Vec::new()),
            addresses: Mutex::new(Vec::new()),
        }
    }

    pub fn latency(&self) -> &LatencyProfile {
        &self.latency
    }

    /// The customer every call acts on behalf of.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::seeded()
    }
}
