//! Cart commands.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use duka_cache::KvStore;
use duka_commerce::cart::{CartState, CartStore, LineKey};
use duka_commerce::catalog::ProductCatalog;
use duka_commerce::checkout::{calculate_summary, ShippingTier};
use duka_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;
    ctx.output
        .debug(&format!("cart slot: {}/{}", ctx.storage_dir().display(), store.slot()));

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {
            show_cart(store.state(), ctx);
            Ok(())
        }
        CartCommand::Add {
            product_id,
            quantity,
            attrs,
        } => add(&mut store, product_id, quantity, attrs, ctx).await,
        CartCommand::Remove { product_id, attrs } => {
            let key = line_key(product_id, attrs);
            let before = store.state().unique_item_count();
            store.remove_item(key.clone())?;
            if store.state().unique_item_count() == before {
                ctx.output.warn(&format!("{} is not in the cart", describe(&key)));
            } else {
                ctx.output.success(&format!("Removed {}", describe(&key)));
            }
            show_cart(store.state(), ctx);
            Ok(())
        }
        CartCommand::Update {
            product_id,
            quantity,
            attrs,
        } => {
            let key = line_key(product_id, attrs);
            store.update_quantity(key.clone(), quantity)?;
            if quantity <= 0 {
                ctx.output.success(&format!("Removed {}", describe(&key)));
            } else {
                ctx.output
                    .success(&format!("Set {} to {}", describe(&key), quantity));
            }
            show_cart(store.state(), ctx);
            Ok(())
        }
        CartCommand::Clear { yes } => clear(&mut store, yes, ctx),
    }
}

async fn add<S: KvStore>(
    store: &mut CartStore<S>,
    product_id: String,
    quantity: i64,
    attrs: Vec<(String, String)>,
    ctx: &Context,
) -> Result<()> {
    let id = ProductId::new(product_id);
    let product = ProductCatalog::get(&ctx.backend, &id)
        .await
        .with_context(|| format!("Cannot add product {}", id))?;

    let item = product.to_cart_item(store.state(), quantity, attrs.into_iter().collect())?;
    let label = match item.variant_label() {
        Some(variant) => format!("{} ({})", item.name, variant),
        None => item.name.clone(),
    };

    store.add_item(item)?;
    ctx.output.success(&format!("Added {} × {}", quantity, label));
    show_cart(store.state(), ctx);
    Ok(())
}

fn clear<S: KvStore>(store: &mut CartStore<S>, yes: bool, ctx: &Context) -> Result<()> {
    if store.state().is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all {} items from the cart?",
                store.state().total_items()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(());
        }
    }

    store.clear_cart()?;
    ctx.output.success("Cart cleared");
    Ok(())
}

fn line_key(product_id: String, attrs: Vec<(String, String)>) -> LineKey {
    attrs
        .into_iter()
        .fold(LineKey::new(product_id), |key, (name, value)| {
            key.with_attribute(name, value)
        })
}

fn describe(key: &LineKey) -> String {
    if key.attributes.is_empty() {
        return format!("product {}", key.product_id);
    }
    let attrs: Vec<String> = key
        .attributes
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("product {} ({})", key.product_id, attrs.join(", "))
}

/// Print the cart with a standard-shipping estimate.
pub fn show_cart(cart: &CartState, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(cart);
        return;
    }

    ctx.output.header("Your Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty. Try `duka products list`.");
        return;
    }

    let widths = [4, 36, 5, 16];
    ctx.output.table_row(&["ID", "ITEM", "QTY", "TOTAL"], &widths);
    for item in cart.items() {
        let name = match item.variant_label() {
            Some(variant) => format!("{} ({})", item.name, variant),
            None => item.name.clone(),
        };
        let total = item
            .line_total()
            .map(|m| m.display())
            .unwrap_or_else(|_| "overflow".to_string());
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &truncate(&name, widths[1]),
                &item.quantity.to_string(),
                &total,
            ],
            &widths,
        );
    }

    ctx.output.kv("Items", &cart.total_items().to_string());
    ctx.output.kv("Subtotal", &cart.total_price().display());
    if let Ok(summary) = calculate_summary(cart.items(), ShippingTier::Standard) {
        ctx.output.kv(
            "Estimated total",
            &format!("{} with standard shipping and VAT", summary.total.display()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_key_from_attrs() {
        let key = line_key(
            "2".to_string(),
            vec![("color".to_string(), "Black".to_string())],
        );
        assert_eq!(key.product_id.as_str(), "2");
        assert_eq!(key.attributes.get("color").map(String::as_str), Some("Black"));
        assert_eq!(describe(&key), "product 2 (color=Black)");
        assert_eq!(describe(&LineKey::new("1")), "product 1");
    }
}
