//! Durable key-value slots for the duka storefront.
//!
//! A slot is a named value in a [`KvStore`]. [`Cache`] layers JSON
//! serialization and optimistic read-modify-write on top of any store.
//!
//! # Example
//!
//! ```rust
//! use duka_cache::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! cache.set("cart", &Cart { items: vec!["1".into()] }).unwrap();
//! let cart: Option<Cart> = cache.get("cart").unwrap();
//! assert_eq!(cart.unwrap().items.len(), 1);
//!
//! cache.delete("cart").unwrap();
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::{Cache, MAX_UPDATE_RETRIES};
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
