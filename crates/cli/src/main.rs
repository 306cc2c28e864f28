//! QKart CLI - Terminal storefront for the QKart backend.
//!
//! # Usage
//!
//! ```bash
//! # List the full catalog
//! qkart products
//!
//! # Search the catalog
//! qkart search "basket"
//!
//! # Show, add to and edit the cart (requires QKART_AUTH_TOKEN)
//! qkart cart
//! qkart add BW0jAAeDJmlZCF8i
//! qkart set-quantity BW0jAAeDJmlZCF8i 3
//!
//! # Interactive session with debounced search-as-you-type
//! qkart shell
//! ```
//!
//! Configuration is read from the environment (and `.env`); see
//! `qkart_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use qkart_storefront::{
    ConfigError, GatewayError, HttpGateway, Notifier, Storefront, StorefrontConfig,
};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKart terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the full catalog
    Products,
    /// Search the catalog by name or category
    Search {
        /// Search text (case-insensitive)
        text: String,
    },
    /// Show the cart
    Cart,
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        product_id: String,
    },
    /// Set the quantity of a product in the cart (0 removes it)
    SetQuantity {
        /// Product ID
        product_id: String,
        /// New absolute quantity
        quantity: u32,
    },
    /// Interactive session; typed lines are search input
    Shell,
}

/// Errors that abort a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cart was not updated")]
    NotUpdated,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
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
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing layer that feeds it
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qkart_storefront=info,qkart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let gateway = HttpGateway::new(&config.backend)?;
    let (notifier, notifications) = Notifier::channel();
    let storefront = Storefront::new(
        gateway,
        config.session,
        config.search_debounce,
        notifier,
    );

    match cli.command {
        Commands::Products => commands::catalog::products(&storefront, notifications).await,
        Commands::Search { text } => {
            commands::catalog::search(&storefront, notifications, &text).await
        }
        Commands::Cart => commands::cart::show(&storefront, notifications).await,
        Commands::Add { product_id } => {
            commands::cart::add(&storefront, notifications, product_id.into()).await
        }
        Commands::SetQuantity {
            product_id,
            quantity,
        } => {
            commands::cart::set_quantity(&storefront, notifications, product_id.into(), quantity)
                .await
        }
        Commands::Shell => commands::shell::run(&storefront, notifications).await,
    }
}
