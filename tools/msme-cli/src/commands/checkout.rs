//! Place an order for the cart contents.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use dialoguer::Confirm;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let policy = ctx.pricing_policy(args.coupon.as_deref())?;

    if !args.yes && !ctx.output.is_json() {
        let pricing = store.pricing(&policy)?;
        ctx.output.header("Checkout");
        ctx.output.cart_table(&store.items());
        ctx.output.info("");
        ctx.output.pricing(&pricing);
        ctx.output.info("");

        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled; cart left as it was");
            return Ok(());
        }
    }

    let order = store.checkout(&policy).context("Checkout failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    let placed_at = DateTime::from_timestamp(order.placed_at, 0)
        .map(|t| t.with_timezone(&Local).format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| order.placed_at.to_string());

    ctx.output.success(&format!("Order {} placed", order.id));
    ctx.output.kv("Placed at", &placed_at);
    ctx.output.kv("Total paid", &order.pricing.grand_total.display());

    let bookings: Vec<String> = order
        .bookings()
        .map(|b| match (&b.duration, &b.location) {
            (Some(duration), _) => format!("{} ({})", b.name, duration),
            (None, Some(location)) => format!("{} @ {}", b.name, location),
            (None, None) => b.name.clone(),
        })
        .collect();
    if !bookings.is_empty() {
        ctx.output.kv("Bookings", &bookings.join(", "));
    }

    Ok(())
}
