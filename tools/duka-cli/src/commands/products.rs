//! Catalog browsing.

use anyhow::Result;
use duka_commerce::catalog::{
    Product, ProductCatalog, ProductQuery, Recommendation, DEFAULT_RECOMMENDATION_LIMIT,
};
use duka_commerce::{Money, ProductId};

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List {
            search,
            category,
            sort,
            min,
            max,
            in_stock,
            on_sale,
            featured,
            limit,
        } => {
            let mut query = ProductQuery::new();
            if let Some(search) = search {
                query = query.with_search(search);
            }
            if let Some(category) = category {
                query = query.with_category(category);
            }
            if min.is_some() || max.is_some() {
                query = query.with_price_range(min.map(Money::kes), max.map(Money::kes));
            }
            if in_stock {
                query = query.in_stock_only();
            }
            if on_sale {
                query = query.on_sale_only();
            }
            if featured {
                query = query.featured_only();
            }
            if let Some(sort) = sort {
                query = query.with_sort(sort);
            }
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }
            list_products(&query, ctx).await
        }
        ProductsCommand::Show { id } => show_product(&ProductId::new(id), ctx).await,
    }
}

async fn list_products(query: &ProductQuery, ctx: &Context) -> Result<()> {
    let products = ProductCatalog::list(&ctx.backend, query).await?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    if products.is_empty() {
        ctx.output.info("No products match your filters");
        return Ok(());
    }

    let widths = [4, 32, 16, 16, 14];
    ctx.output
        .table_row(&["ID", "NAME", "CATEGORY", "PRICE", "STOCK"], &widths);
    for product in &products {
        let name = truncate(&product.name, widths[1]);
        let price = price_label(product);
        let stock = stock_label(product);
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &name,
                &product.category,
                &price,
                &stock,
            ],
            &widths,
        );
    }

    Ok(())
}

async fn show_product(id: &ProductId, ctx: &Context) -> Result<()> {
    let product = match ProductCatalog::get(&ctx.backend, id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            ctx.output
                .info("Run `duka products list` to see available products");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("SKU", &product.sku);
    ctx.output.kv("Price", &price_label(&product));
    match &product.subcategory {
        Some(sub) => ctx
            .output
            .kv("Category", &format!("{} / {}", product.category, sub)),
        None => ctx.output.kv("Category", &product.category),
    }
    ctx.output.kv("Stock", &stock_label(&product));
    ctx.output.kv("Description", &product.description);

    for (name, value) in &product.attributes {
        ctx.output.kv(name, value);
    }

    if !product.variants.is_empty() {
        ctx.output.info("Variants:");
        for variant in &product.variants {
            let options: Vec<String> = variant
                .attributes
                .iter()
                .map(|(k, v)| format!("--attr {}={}", k, v))
                .collect();
            let status = if variant.in_stock { "" } else { " (out of stock)" };
            ctx.output.list_item(&format!(
                "{}  {}  {}{}",
                variant.title,
                variant.price.display(),
                options.join(" "),
                status
            ));
        }
    }

    let related = ctx
        .backend
        .recommend(
            &Recommendation::related_to(&product),
            DEFAULT_RECOMMENDATION_LIMIT,
        )
        .await?;
    if !related.is_empty() {
        ctx.output.info("You may also like:");
        for other in &related {
            ctx.output.list_item(&format!(
                "[{}] {}  {}",
                other.id,
                other.name,
                price_label(other)
            ));
        }
    }

    Ok(())
}

fn price_label(product: &Product) -> String {
    match (product.compare_at_price, product.discount_percentage()) {
        (Some(was), Some(pct)) => {
            format!("{} (was {}, -{}%)", product.price.display(), was.display(), pct)
        }
        _ => product.price.display(),
    }
}

fn stock_label(product: &Product) -> String {
    if product.in_stock {
        format!("{} in stock", product.stock_quantity)
    } else {
        "Out of stock".to_string()
    }
}
