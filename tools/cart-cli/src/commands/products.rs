//! Catalog listing with in-cart amounts.

use anyhow::{Context as _, Result};
use cart_core::catalog::Product;
use serde::Serialize;

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{format_price, truncate};

const WIDTHS: [usize; 4] = [6, 32, 14, 8];

#[derive(Serialize)]
struct ListedProduct<'a> {
    #[serde(flatten)]
    product: &'a Product,
    in_cart: i64,
}

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let amounts = session.store.cart().amounts_by_product();

    let products = ctx
        .storefront()?
        .list_products()
        .await
        .context("Failed to list products")?;

    let listed: Vec<ListedProduct<'_>> = products
        .iter()
        .map(|product| ListedProduct {
            product,
            in_cart: amounts.get(&product.id).copied().unwrap_or(0),
        })
        .filter(|p| !args.in_cart || p.in_cart > 0)
        .collect();

    let missing = amounts
        .keys()
        .filter(|id| !products.iter().any(|p| p.id == **id))
        .count();
    if missing > 0 {
        ctx.output.warn(&format!(
            "{} product(s) in the cart are no longer in the catalog",
            missing
        ));
    }

    if ctx.output.is_json() {
        ctx.output.json(&listed);
        return Ok(());
    }

    if listed.is_empty() {
        ctx.output.info("No products");
        return Ok(());
    }

    ctx.output.header("Products");
    ctx.output
        .table_header(&["ID", "PRODUCT", "PRICE", "IN CART"], &WIDTHS);
    for p in &listed {
        ctx.output.table_row(
            &[
                &p.product.id.to_string(),
                &truncate(&p.product.title, WIDTHS[1]),
                &format_price(p.product.price),
                &p.in_cart.to_string(),
            ],
            &WIDTHS,
        );
    }

    Ok(())
}
