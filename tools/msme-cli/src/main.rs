//! MSME CLI - a command-line cart for the MSME portal.
//!
//! Commands:
//! - `msme add` - Add a product, service or space to the cart
//! - `msme update` - Change a row's quantity
//! - `msme remove` - Remove a row
//! - `msme list` - Show the cart
//! - `msme total` - Price the cart (GST, coupons)
//! - `msme clear` - Empty the cart
//! - `msme checkout` - Place an order and empty the cart
//! - `msme config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, CheckoutArgs, ClearArgs, ConfigArgs, RemoveArgs, TotalArgs, UpdateArgs};

/// MSME CLI - Manage a local storefront, salon and venue cart
#[derive(Parser)]
#[command(name = "msme")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the cart
    Add(AddArgs),

    /// Set the quantity of a cart row
    Update(UpdateArgs),

    /// Remove a row from the cart
    Remove(RemoveArgs),

    /// List cart contents
    List,

    /// Show the priced total
    Total(TotalArgs),

    /// Empty the cart
    Clear(ClearArgs),

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Update(args) => commands::cart::update(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::List => commands::cart::list(&ctx).await,
        Commands::Total(args) => commands::total::run(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Send `tracing` events to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "msme={lvl},msme_commerce={lvl},msme_cache={lvl}",
            lvl = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .init();
}
