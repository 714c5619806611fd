//! Cart commands: show, add, remove, update and the +/- shortcuts.

use anyhow::{bail, Result};
use cart_core::notice::Notice;
use cart_core::{Cart, CartError, CartLine, Outcome, ProductId};
use serde::Serialize;

use super::{ProductArgs, UpdateArgs};
use crate::context::{Context, Session};
use crate::output::{format_price, truncate};

const WIDTHS: [usize; 5] = [6, 32, 5, 14, 14];

#[derive(Serialize)]
struct LineView<'a> {
    #[serde(flatten)]
    line: &'a CartLine,
    subtotal: f64,
}

#[derive(Serialize)]
struct CartView<'a> {
    lines: Vec<LineView<'a>>,
    item_count: i64,
    total: f64,
}

impl<'a> CartView<'a> {
    fn new(cart: &'a Cart) -> Self {
        Self {
            lines: cart
                .iter()
                .map(|line| LineView {
                    line,
                    subtotal: line.subtotal(),
                })
                .collect(),
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}

#[derive(Serialize)]
struct OperationView<'a> {
    committed: bool,
    version: u64,
    cart: CartView<'a>,
    notices: Vec<Notice>,
}

#[derive(Serialize)]
struct FailureView {
    error: String,
    notices: Vec<Notice>,
}

/// Print the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let cart = session.store.cart();

    if ctx.output.is_json() {
        ctx.output.json(&CartView::new(&cart));
    } else {
        print_cart(ctx, &cart);
    }
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: ProductArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let result = session.store.add_product(ProductId::new(args.id)).await;
    report(ctx, &session, result)
}

/// Remove a product's line.
pub async fn remove(args: ProductArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let result = session.store.remove_product(ProductId::new(args.id)).await;
    report(ctx, &session, result)
}

/// Set a product's amount.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let result = session
        .store
        .update_product_amount(ProductId::new(args.id), args.amount)
        .await;
    report(ctx, &session, result)
}

/// Raise a product's amount by one.
pub async fn increment(args: ProductArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let product_id = ProductId::new(args.id);
    let amount = session.store.cart().amount_of(product_id);
    if amount == 0 {
        bail!("Product {} is not in the cart", product_id);
    }

    let result = session
        .store
        .update_product_amount(product_id, amount + 1)
        .await;
    report(ctx, &session, result)
}

/// Lower a product's amount by one. Never goes below 1.
pub async fn decrement(args: ProductArgs, ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let product_id = ProductId::new(args.id);
    let amount = session.store.cart().amount_of(product_id);
    match amount {
        0 => bail!("Product {} is not in the cart", product_id),
        1 => bail!(
            "Amount cannot go below 1; use `cart remove {}` to drop the product",
            product_id
        ),
        _ => {}
    }

    let result = session
        .store
        .update_product_amount(product_id, amount - 1)
        .await;
    report(ctx, &session, result)
}

/// Print the notices an operation produced and its resulting cart.
///
/// A failed operation has already been surfaced through its notice, so the
/// returned error only decides the exit status.
fn report(ctx: &Context, session: &Session, result: Result<Outcome, CartError>) -> Result<()> {
    let notices = session.notices.drain();

    match result {
        Ok(outcome) => {
            let cart = session.store.cart();
            if ctx.output.is_json() {
                ctx.output.json(&OperationView {
                    committed: outcome.is_committed(),
                    version: session.store.version(),
                    cart: CartView::new(&cart),
                    notices,
                });
                return Ok(());
            }

            for notice in &notices {
                ctx.output.notice(notice);
            }
            match outcome {
                Outcome::Committed(_) => print_cart(ctx, &cart),
                Outcome::Unchanged => ctx.output.info("Cart unchanged"),
            }
            Ok(())
        }
        Err(err) => {
            if ctx.output.is_json() {
                ctx.output.json(&FailureView {
                    error: err.to_string(),
                    notices,
                });
            } else {
                for notice in &notices {
                    ctx.output.notice(notice);
                }
            }
            Err(err.into())
        }
    }
}

fn print_cart(ctx: &Context, cart: &Cart) {
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    ctx.output.header("Cart");
    ctx.output
        .table_header(&["ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"], &WIDTHS);
    for line in cart {
        ctx.output.table_row(
            &[
                &line.product_id.to_string(),
                &truncate(&line.title, WIDTHS[1]),
                &line.amount.to_string(),
                &format_price(line.price),
                &format_price(line.subtotal()),
            ],
            &WIDTHS,
        );
    }

    println!();
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &format_price(cart.total()));
}
