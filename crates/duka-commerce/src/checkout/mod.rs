//! Checkout module.
//!
//! A four-step workflow (information, shipping, payment, review) that
//! accumulates [`CheckoutFormData`], prices the cart and hands the order to
//! an [`OrderGateway`](crate::order::OrderGateway).

mod flow;
mod form;
mod shipping;
mod summary;

pub use flow::{complete_checkout, CheckoutStep, CheckoutWorkflow};
pub use form::{CheckoutFormData, PaymentMethod};
pub use shipping::{shipping_methods, ShippingMethod, ShippingTier};
pub use summary::{calculate_summary, CheckoutSummary, VAT_RATE_BPS};
