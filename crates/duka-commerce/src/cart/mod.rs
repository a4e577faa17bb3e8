//! Shopping cart module.
//!
//! The cart is a pure reducer over [`CartState`] plus a [`CartStore`] that
//! persists every successful transition to a durable slot.

mod item;
mod state;
mod store;

pub use item::{CartItem, LineKey};
pub use state::{reduce, CartCommand, CartState, MAX_QUANTITY_PER_ITEM};
pub use store::{CartStore, CART_SLOT};
