//! Cart mutation and listing commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use msme_commerce::cart::{CartItem, CartKey, CartStore};
use msme_commerce::{CatalogId, Money};

use super::{AddArgs, ClearArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;

/// Run the add command.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let item = build_item(args)?;
    let key = item.key();
    let store = ctx.open_store()?;

    store.add_item(item);

    report_row(&store, &key, ctx)
}

/// Run the update command.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let key = CartKey::new(args.id, args.item_type);

    if !store.update_quantity(&key.id, key.item_type, args.quantity) {
        bail!("No {} '{}' in the cart", key.item_type, key.id);
    }
    if args.quantity < 1 {
        ctx.output
            .warn("Quantity cannot go below 1; use `msme remove` to drop the item");
    }

    let row = confirm_update(&store, &key, args.quantity)?;
    show_row(&store, &row, ctx);
    Ok(())
}

/// Run the remove command.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let id = CatalogId::new(args.id);

    if !store.remove_item(&id, args.item_type) {
        bail!("No {} '{}' in the cart", args.item_type, id);
    }

    if ctx.output.is_json() {
        ctx.output.json(&store.items());
    } else {
        ctx.output
            .success(&format!("Removed {} '{}'", args.item_type, id));
        ctx.output
            .kv("Items in cart", &store.item_count().to_string());
    }
    Ok(())
}

/// Run the list command.
pub async fn list(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let cart = store.cart();

    if ctx.output.is_json() {
        ctx.output.json(&cart);
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.header(&format!(
        "Cart ({} items, {} rows)",
        cart.item_count(),
        cart.unique_item_count()
    ));
    ctx.output.cart_table(cart.items());
    ctx.output.info("");
    ctx.output.kv("Subtotal", &cart.total().display());

    Ok(())
}

/// Run the clear command.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let count = store.item_count();

    if count == 0 {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", count))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cancelled");
            return Ok(());
        }
    }

    store.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}

fn build_item(args: AddArgs) -> Result<CartItem> {
    let price = parse_amount("price", args.price)?;

    let mut item = CartItem::new(args.id, args.item_type, args.name, price)
        .with_quantity(args.quantity.max(1));

    if let Some(original) = args.original_price {
        item = item.with_original_price(parse_amount("original price", original)?);
    }
    if let Some(image) = args.image {
        item = item.with_image(image);
    }
    if let Some(duration) = args.duration {
        item = item.with_duration(duration);
    }
    if let Some(location) = args.location {
        item = item.with_location(location);
    }
    if let Some(capacity) = args.capacity {
        item = item.with_capacity(capacity);
    }
    if let Some(brand) = args.brand {
        item = item.with_brand(brand);
    }
    if let Some(seller) = args.seller {
        item = item.with_seller(seller);
    }

    Ok(item)
}

fn parse_amount(field: &str, rupees: f64) -> Result<Money> {
    if !rupees.is_finite() || rupees < 0.0 {
        bail!("{} must be a non-negative amount, got {}", field, rupees);
    }
    Ok(Money::from_decimal(rupees))
}

/// Show the affected row, or fail if the write did not stick.
fn report_row(store: &CartStore, key: &CartKey, ctx: &Context) -> Result<()> {
    let Some(row) = store.get_item(key) else {
        bail!("Cart could not be saved; see the log for details");
    };
    show_row(store, &row, ctx);
    Ok(())
}

/// Re-read a row after an update and check it holds the clamped quantity.
fn confirm_update(store: &CartStore, key: &CartKey, requested: i64) -> Result<CartItem> {
    let expected = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
    match store.get_item(key) {
        Some(row) if row.quantity == expected => Ok(row),
        _ => bail!("Cart could not be saved; see the log for details"),
    }
}

fn show_row(store: &CartStore, row: &CartItem, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(row);
        return;
    }

    ctx.output
        .success(&format!("{} x{} ({})", row.name, row.quantity, row.item_type));
    ctx.output.kv("Line total", &row.line_total().display());
    ctx.output
        .kv("Items in cart", &store.item_count().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use msme_cache::{Cache, MemoryStore};
    use msme_commerce::cart::{ItemType, DEFAULT_CART_KEY};

    fn args() -> AddArgs {
        AddArgs {
            id: "v1".to_string(),
            item_type: ItemType::Space,
            name: "Rooftop".to_string(),
            price: 4999.5,
            quantity: 0,
            original_price: None,
            image: None,
            duration: None,
            location: Some("Indiranagar".to_string()),
            capacity: Some(40),
            brand: None,
            seller: None,
        }
    }

    #[test]
    fn test_build_item_from_args() {
        let item = build_item(args()).unwrap();
        assert_eq!(item.price, Money::from_paise(4_99_950));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.location.as_deref(), Some("Indiranagar"));
        assert_eq!(item.capacity, Some(40));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut a = args();
        a.price = -1.0;
        assert!(build_item(a).is_err());

        let mut a = args();
        a.original_price = Some(f64::NAN);
        assert!(build_item(a).is_err());
    }

    #[test]
    fn test_confirm_update_reads_back_clamped_quantity() {
        let store = CartStore::new(Cache::open_default());
        let item = build_item(args()).unwrap();
        let key = item.key();
        store.add_item(item);

        assert!(store.update_quantity(&key.id, key.item_type, -4));
        assert_eq!(confirm_update(&store, &key, -4).unwrap().quantity, 1);

        assert!(store.update_quantity(&key.id, key.item_type, 12));
        assert_eq!(confirm_update(&store, &key, 12).unwrap().quantity, 12);
    }

    #[test]
    fn test_confirm_update_fails_when_write_is_dropped() {
        let item = build_item(args()).unwrap();
        let key = item.key();
        // Exactly enough room for the cart with quantity 1
        let bytes = serde_json::to_vec(&vec![item.clone()]).unwrap();
        let backend = MemoryStore::with_quota(DEFAULT_CART_KEY.len() + bytes.len());
        let store = CartStore::new(Cache::with_backend(backend));
        store.add_item(item);
        assert_eq!(store.item_count(), 1);

        assert!(store.update_quantity(&key.id, key.item_type, 1_000_000));
        assert_eq!(store.item_count(), 1);
        assert!(confirm_update(&store, &key, 1_000_000).is_err());
    }
}
