//! Price the cart without placing an order.

use anyhow::Result;

use super::TotalArgs;
use crate::context::Context;

/// Run the total command.
pub async fn run(args: TotalArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let policy = ctx.pricing_policy(args.coupon.as_deref())?;
    let pricing = store.pricing(&policy)?;

    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return Ok(());
    }

    ctx.output.header(&format!("Cart total ({} items)", store.item_count()));
    ctx.output.pricing(&pricing);

    Ok(())
}
