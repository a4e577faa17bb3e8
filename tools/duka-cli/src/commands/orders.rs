//! Order history.

use anyhow::Result;
use duka_commerce::checkout::PaymentMethod;
use duka_commerce::order::OrderGateway;
use duka_commerce::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(OrdersCommand::List) {
        OrdersCommand::List => list_orders(ctx).await,
        OrdersCommand::Show { id } => show_order(&OrderId::new(id), ctx).await,
    }
}

async fn list_orders(ctx: &Context) -> Result<()> {
    let orders = OrderGateway::list(&ctx.backend).await?;

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Order History");
    if orders.is_empty() {
        ctx.output.info("No orders yet");
        return Ok(());
    }

    let widths = [14, 12, 6, 16, 10];
    ctx.output
        .table_row(&["ORDER", "DATE", "ITEMS", "TOTAL", "STATUS"], &widths);
    for order in &orders {
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &order.created_at.format("%Y-%m-%d").to_string(),
                &order.item_count().to_string(),
                &order.total.display(),
                &status_badge(order.status),
            ],
            &widths,
        );
    }

    Ok(())
}

async fn show_order(id: &OrderId, ctx: &Context) -> Result<()> {
    let order = match OrderGateway::get(&ctx.backend, id).await {
        Ok(order) => order,
        Err(e) if e.is_not_found() => {
            ctx.output.warn(&format!("No order with number {}", id));
            ctx.output
                .info("Run `duka orders list` to see your order numbers");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output
        .kv("Placed", &order.created_at.format("%B %-d, %Y %H:%M").to_string());
    ctx.output
        .kv("Updated", &order.updated_at.format("%B %-d, %Y %H:%M").to_string());

    ctx.output.info("Items:");
    for item in &order.items {
        let total = item.line_total()?;
        ctx.output.list_item(&format!(
            "{} × {}  {}",
            item.quantity,
            item.name,
            total.display()
        ));
    }

    ctx.output.kv("Subtotal", &order.subtotal.display());
    ctx.output.kv("Shipping", &order.shipping.display());
    ctx.output.kv("Tax", &order.tax.display());
    ctx.output.kv("Total", &order.total.display());

    let shipping = &order.shipping_info;
    ctx.output.kv("Delivery", &shipping.method);
    if let Some(carrier) = &shipping.carrier {
        ctx.output.kv("Carrier", carrier);
    }
    if let Some(tracking) = &shipping.tracking_number {
        ctx.output.kv("Tracking", tracking);
    }
    if let Some(eta) = &shipping.estimated_delivery {
        ctx.output.kv("Estimated delivery", eta);
    }

    ctx.output.kv("Ship to", &order.shipping_address.one_line());
    if order.billing_address != order.shipping_address {
        ctx.output.kv("Bill to", &order.billing_address.one_line());
    }
    let payment = order
        .payment_method
        .parse::<PaymentMethod>()
        .map(|m| m.display_name().to_string())
        .unwrap_or_else(|_| order.payment_method.clone());
    ctx.output.kv("Payment", &payment);

    Ok(())
}
