//! Checkout step machine.

use std::fmt;

use duka_cache::KvStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart::{CartItem, CartState, CartStore};
use crate::checkout::{calculate_summary, CheckoutFormData, CheckoutSummary};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::order::{OrderGateway, OrderRequest};
use crate::validation::FieldErrors;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Contact details and shipping address.
    #[default]
    Information,
    /// Shipping tier.
    Shipping,
    /// Payment details and billing address.
    Payment,
    /// Final review before the order is placed.
    Review,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Information,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Information => "information",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Information => "Information",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Information => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Information => Some(CheckoutStep::Shipping),
            CheckoutStep::Shipping => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => None,
        }
    }

    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Information => None,
            CheckoutStep::Shipping => Some(CheckoutStep::Information),
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PLACED: &str = "placed";

/// One checkout session.
///
/// Holds the current step, the form data accumulated so far and the field
/// errors from the last rejected transition. Moving backward never
/// validates and never discards form data. Once an order has been placed
/// the workflow is finished and rejects every further transition.
#[derive(Debug, Clone, Default)]
pub struct CheckoutWorkflow {
    step: CheckoutStep,
    form: CheckoutFormData,
    errors: FieldErrors,
    placed_order: Option<OrderId>,
}

impl CheckoutWorkflow {
    /// Start at the information step with a fresh form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the information step with pre-filled form data.
    pub fn with_form(form: CheckoutFormData) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn form(&self) -> &CheckoutFormData {
        &self.form
    }

    /// Field errors from the last rejected forward transition.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Identifier of the placed order, once checkout is complete.
    pub fn placed_order(&self) -> Option<&OrderId> {
        self.placed_order.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.placed_order.is_some()
    }

    /// Edit the form in place.
    pub fn update_form(&mut self, f: impl FnOnce(&mut CheckoutFormData)) {
        f(&mut self.form);
    }

    fn ensure_open(&self, to: &str) -> Result<(), CommerceError> {
        if self.is_complete() {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: PLACED.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Errors that block leaving the current step.
    fn gate(&self) -> FieldErrors {
        match self.step {
            CheckoutStep::Information => self.form.validate_information(),
            CheckoutStep::Payment => self.form.validate_payment(),
            CheckoutStep::Shipping | CheckoutStep::Review => FieldErrors::new(),
        }
    }

    /// Advance to the next step.
    ///
    /// When the current step's fields don't validate, the step stays put,
    /// [`errors`](Self::errors) is populated and the same errors come back
    /// as [`CommerceError::Validation`].
    pub fn advance(&mut self) -> Result<CheckoutStep, CommerceError> {
        let next = self
            .step
            .next()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: PLACED.to_string(),
            })?;
        self.ensure_open(next.as_str())?;

        let errors = self.gate();
        if !errors.is_empty() {
            debug!(step = %self.step, errors = errors.len(), "checkout step rejected");
            self.errors = errors.clone();
            return Err(CommerceError::Validation(errors));
        }

        self.errors.clear();
        self.step = next;
        debug!(step = %next, "checkout advanced");
        Ok(next)
    }

    /// Go back to the previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = self
            .step
            .previous()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;
        self.ensure_open(prev.as_str())?;

        self.errors.clear();
        self.step = prev;
        Ok(prev)
    }

    /// Jump back to an earlier step (or stay on the current one).
    /// Forward jumps must go through [`advance`](Self::advance).
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        self.ensure_open(step.as_str())?;
        if step.number() > self.step.number() {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            });
        }

        self.errors.clear();
        self.step = step;
        Ok(())
    }

    /// Summary for `items` with the currently selected shipping tier.
    pub fn summary(&self, items: &[CartItem]) -> Result<CheckoutSummary, CommerceError> {
        calculate_summary(items, self.form.shipping_method)
    }

    /// The request [`place_order`](Self::place_order) would submit.
    pub fn order_request(&self, cart: &CartState) -> OrderRequest {
        OrderRequest {
            items: cart.items().to_vec(),
            form_data: self.form.clone(),
        }
    }

    /// Submit the order from the review step.
    ///
    /// Reads the cart and form without changing either; clearing the cart
    /// is the caller's job once an identifier comes back (see
    /// [`complete_checkout`]). Both form gates are re-checked because the
    /// form may have been edited after the steps were passed.
    pub async fn place_order(
        &self,
        cart: &CartState,
        gateway: &dyn OrderGateway,
    ) -> Result<OrderId, CommerceError> {
        self.ensure_open(PLACED)?;
        if self.step != CheckoutStep::Review {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: PLACED.to_string(),
            });
        }
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let mut errors = self.form.validate_information();
        errors.merge(self.form.validate_payment());
        errors.into_result()?;

        let request = self.order_request(cart);
        info!(
            items = cart.total_items(),
            shipping = %self.form.shipping_method,
            payment = %self.form.payment_method,
            "submitting order"
        );

        match gateway.submit(&request).await {
            Ok(id) => {
                info!(order_id = %id, "order placed");
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "order submission failed");
                Err(e)
            }
        }
    }

    /// Record a successful placement, finishing the workflow.
    pub fn mark_placed(&mut self, id: OrderId) -> Result<(), CommerceError> {
        self.ensure_open(PLACED)?;
        if self.step != CheckoutStep::Review {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: PLACED.to_string(),
            });
        }
        self.errors.clear();
        self.placed_order = Some(id);
        Ok(())
    }
}

/// Place the order and, only once an identifier is back, clear the cart
/// and finish the workflow.
///
/// A failed submission leaves the cart, the workflow and its form exactly
/// as they were, so the call can simply be repeated. If the order went
/// through but the cart slot cannot be written, the order still counts as
/// placed and the failure is logged.
pub async fn complete_checkout<S: KvStore>(
    workflow: &mut CheckoutWorkflow,
    store: &mut CartStore<S>,
    gateway: &dyn OrderGateway,
) -> Result<OrderId, CommerceError> {
    let id = workflow.place_order(store.state(), gateway).await?;

    if let Err(e) = store.clear_cart() {
        warn!(order_id = %id, error = %e, "order placed but cart could not be cleared");
    }
    workflow.mark_placed(id.clone())?;
    Ok(id)
}
