//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod total;

use clap::{Args, Subcommand};
use msme_commerce::cart::ItemType;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Catalogue id of the product, service or space.
    #[arg(long)]
    pub id: String,

    /// Which catalogue the id belongs to (product, service, space).
    #[arg(short = 't', long = "type", default_value = "product")]
    pub item_type: ItemType,

    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// Unit price in rupees.
    #[arg(short, long)]
    pub price: f64,

    /// Quantity to add.
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Pre-discount price in rupees.
    #[arg(long)]
    pub original_price: Option<f64>,

    /// Image URL or path.
    #[arg(long)]
    pub image: Option<String>,

    /// Service duration (e.g. "45 min").
    #[arg(long)]
    pub duration: Option<String>,

    /// Space location.
    #[arg(long)]
    pub location: Option<String>,

    /// Space capacity.
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Product brand.
    #[arg(long)]
    pub brand: Option<String>,

    /// Product seller.
    #[arg(long)]
    pub seller: Option<String>,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Catalogue id.
    pub id: String,

    /// Item type (product, service, space).
    pub item_type: ItemType,

    /// New quantity; values below 1 become 1.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Catalogue id.
    pub id: String,

    /// Item type (product, service, space).
    pub item_type: ItemType,
}

/// Arguments for the total command.
#[derive(Args)]
pub struct TotalArgs {
    /// Coupon code to preview.
    #[arg(long)]
    pub coupon: Option<String>,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Coupon code to apply.
    #[arg(long)]
    pub coupon: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Write a default msme.toml in the current directory.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration.
    Validate,
}
