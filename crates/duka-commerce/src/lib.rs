//! Storefront domain core for duka.
//!
//! - **Cart**: a pure reducer over [`CartState`](cart::CartState) and a
//!   durable [`CartStore`](cart::CartStore)
//! - **Checkout**: the four-step workflow, summary pricing, order placement
//! - **Catalog**: products, listing queries, the product lookup collaborator
//! - **Order**: order records and the order-submission collaborator
//! - **Account**: the saved-address book
//!
//! # Example
//!
//! ```rust
//! use duka_cache::MemoryStore;
//! use duka_commerce::prelude::*;
//!
//! let mut cart = CartStore::open(MemoryStore::new());
//! cart.add_item(CartItem::new("1", "Wireless Bluetooth Headphones", Money::kes(9999), 1))
//!     .unwrap();
//! cart.add_item(CartItem::new("3", "Premium Leather Backpack", Money::kes(7999), 1))
//!     .unwrap();
//!
//! let summary = calculate_summary(cart.state().items(), ShippingTier::Standard).unwrap();
//! assert_eq!(summary.total.display(), "KES 21,476.68");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validation;

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::validation::{FieldError, FieldErrors};

    // Account
    pub use crate::account::{AddressLabel, NewAddress, SavedAddress};

    // Cart
    pub use crate::cart::{
        reduce, CartCommand, CartItem, CartState, CartStore, LineKey, MAX_QUANTITY_PER_ITEM,
    };

    // Catalog
    pub use crate::catalog::{
        Filter, Product, ProductCatalog, ProductQuery, ProductVariant, Recommendation, SortOption,
    };

    // Checkout
    pub use crate::checkout::{
        calculate_summary, complete_checkout, shipping_methods, CheckoutFormData, CheckoutStep,
        CheckoutSummary, CheckoutWorkflow, PaymentMethod, ShippingMethod, ShippingTier,
    };

    // Order
    pub use crate::order::{
        Order, OrderAddress, OrderGateway, OrderItem, OrderRequest, OrderStatus, ShippingInfo,
    };
}
