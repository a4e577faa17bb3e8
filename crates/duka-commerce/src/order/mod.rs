//! Orders and the order-submission collaborator.

mod address;
mod gateway;
mod order;

pub use address::OrderAddress;
pub use gateway::{OrderGateway, OrderRequest};
pub use order::{Order, OrderItem, OrderStatus, ShippingInfo};
