//! ShopEase CLI - browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered by category
//! shopease products --category apparel
//!
//! # Show one product
//! shopease product 7
//!
//! # Reserve one unit and add it to the cart
//! shopease add 7 --variant M
//!
//! # Show, edit and clear the cart
//! shopease cart show
//! shopease cart set 7 3 --variant M
//! shopease cart remove 7 --variant M
//! shopease cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPEASE_API_BASE_URL` - Catalog API base URL (default `http://localhost:8000`)
//! - `SHOPEASE_DATA_DIR` - Directory holding the persisted cart (default `.shopease`)
//! - `SHOPEASE_HTTP_TIMEOUT_SECS` - Catalog request timeout (default 10)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use shopease_core::ProductId;
use shopease_storefront::config::StorefrontConfig;
use shopease_storefront::error::AppError;
use shopease_storefront::state::Storefront;

mod commands;

#[derive(Parser)]
#[command(name = "shopease")]
#[command(author, version, about = "ShopEase storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a product's details
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Reserve stock and add a product to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// Variant to add (required for products with variants)
        #[arg(short, long)]
        variant: Option<String>,

        /// Units to add, one reservation each (floored, minimum 1)
        #[arg(short, long, default_value_t = 1.0)]
        quantity: f64,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Show the number of units in the cart
    Count,
    /// Replace a line's quantity (zero or less removes it)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Variant of the line
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: ProductId,

        /// Variant of the line
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Return all held stock and empty the cart
    Clear,
}

/// Initialize Sentry error tracking if a DSN is configured.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopease_storefront=info,shopease_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(io::stderr(), "Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        e.report();
        let _ = writeln!(io::stderr(), "Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let storefront = Storefront::new(config)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Products { category } => {
            commands::products::list(&storefront, category.as_deref(), &mut out).await
        }
        Commands::Product { id } => commands::products::show(&storefront, id, &mut out).await,
        Commands::Add {
            id,
            variant,
            quantity,
        } => {
            commands::products::add(&storefront, id, variant.as_deref(), quantity, &mut out).await
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront, &mut out),
            CartAction::Count => commands::cart::count(&storefront, &mut out),
            CartAction::Set {
                id,
                quantity,
                variant,
            } => commands::cart::set(&storefront, id, variant.as_deref(), quantity, &mut out),
            CartAction::Remove { id, variant } => {
                commands::cart::remove(&storefront, id, variant.as_deref(), &mut out)
            }
            CartAction::Clear => commands::cart::clear(&storefront, &mut out).await,
        },
    }
}
