//! Checkout: walk the steps, confirm, place the order.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use duka_commerce::checkout::{complete_checkout, CheckoutFormData, CheckoutStep, CheckoutWorkflow};
use duka_commerce::{AddressId, CommerceError};
use serde::Serialize;
use tracing::info;

use super::CheckoutArgs;
use crate::context::Context;

const TOTAL_STEPS: usize = CheckoutStep::ALL.len();

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Placed<'a> {
    order_id: &'a str,
    total: String,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;
    if store.state().is_empty() {
        bail!("Your cart is empty. Add something with `duka cart add <product-id>` first.");
    }

    let form_path = ctx.resolve_path(&args.form);
    let mut form = load_form(&form_path)?;

    if let Some(address_id) = args.address {
        let id = AddressId::new(address_id);
        let saved = match ctx.backend.get_address(&id).await {
            Ok(saved) => saved,
            Err(e) if e.is_not_found() => {
                ctx.output
                    .info("Run `duka addresses list` to see saved addresses");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        ctx.output
            .debug(&format!("shipping to saved address {}", saved.id));
        form.apply_saved_address(&saved);
    }

    let mut workflow = CheckoutWorkflow::with_form(form);
    ctx.output.header("Checkout");

    while workflow.step() != CheckoutStep::Review {
        let step = workflow.step();
        ctx.output
            .step(step.number() as usize, TOTAL_STEPS, step.display_name());
        match workflow.advance() {
            Ok(_) => {}
            Err(CommerceError::Validation(errors)) => {
                ctx.output.field_errors(&errors);
                bail!(
                    "{} step has {} invalid field(s); fix them in {}",
                    step.display_name(),
                    errors.len(),
                    form_path.display()
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    let review = workflow.step();
    ctx.output
        .step(review.number() as usize, TOTAL_STEPS, review.display_name());

    let summary = workflow.summary(store.state().items())?;
    let form = workflow.form();

    if !ctx.output.is_json() {
        for item in store.state().items() {
            let total = item.line_total()?;
            let name = match item.variant_label() {
                Some(variant) => format!("{} ({})", item.name, variant),
                None => item.name.clone(),
            };
            ctx.output
                .list_item(&format!("{} × {}  {}", item.quantity, name, total.display()));
        }
        ctx.output.kv("Ship to", &form.shipping_address().one_line());
        let method = form.shipping_method.method();
        ctx.output.kv(
            "Shipping",
            &format!(
                "{} ({})",
                method.name,
                method.delivery_estimate().unwrap_or_default()
            ),
        );
        ctx.output.kv("Payment", &form.payment_summary());
        ctx.output.kv("Subtotal", &summary.subtotal.display());
        ctx.output.kv("Shipping cost", &summary.shipping.display());
        ctx.output.kv("VAT (16%)", &summary.tax.display());
        ctx.output.kv("Total", &summary.total.display());
        println!();
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", summary.total.display()))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Order not placed; your cart is unchanged");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = complete_checkout(&mut workflow, &mut store, &ctx.backend).await;
    spinner.finish_and_clear();

    let id = match result {
        Ok(id) => id,
        Err(e) => {
            if e.is_retryable() {
                ctx.output
                    .warn("Your cart was kept; run the same command again to retry");
            }
            return Err(e).context("Order could not be placed");
        }
    };

    info!(order_id = %id, total = %summary.total, "checkout complete");

    if ctx.output.is_json() {
        ctx.output.json(&Placed {
            order_id: id.as_str(),
            total: summary.total.display(),
        });
    } else {
        ctx.output.success(&format!("Order {} placed", id));
        ctx.output
            .info(&format!("Track it with `duka orders show {}`", id));
    }

    Ok(())
}

/// Read checkout form fields from a TOML file. Keys use the same camelCase
/// names as the form (`firstName`, `zipCode`, `paymentMethod`, ...);
/// absent keys keep their defaults.
fn load_form(path: &Path) -> Result<CheckoutFormData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read checkout form: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse checkout form: {}", path.display()))
}
