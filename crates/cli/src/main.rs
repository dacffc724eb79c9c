//! Supplement Store CLI - catalogue and order management tools.
//!
//! # Usage
//!
//! ```bash
//! # List bestselling protein products, cheapest first
//! ss-cli products list --category protein --bestseller --sort price-low
//!
//! # List shipped orders placed in January
//! ss-cli orders list --status shipped --from 2026-01-01 --to 2026-01-31
//!
//! # Show one order and move it along
//! ss-cli orders show ORD-1767261600000
//! ss-cli orders set-status ORD-1767261600000 delivered
//!
//! # Replace the order book with demo orders
//! ss-cli seed orders --clear
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted JSON blobs (default `data`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use supplement_store_core::{Category, OrderStatus};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(author, version, about = "Supplement Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalogue
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and update placed orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Load demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products matching the given filters
    List {
        /// Case-insensitive text in the name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Category slug (e.g. `protein`, `pre-workout`)
        #[arg(short, long)]
        category: Option<Category>,

        /// Only bestsellers
        #[arg(short, long)]
        bestseller: bool,

        /// Inclusive minimum price in dollars
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Inclusive maximum price in dollars
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Sort order (`name`, `price-low`, `price-high`, `bestseller`)
        #[arg(long, default_value = "name")]
        sort: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Order ID, customer name or product name
        #[arg(short, long)]
        search: Option<String>,

        /// Order status
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one order in full
    Show {
        /// Order ID (e.g. `ORD-1767261600000`)
        id: String,
    },
    /// Change an order's status
    SetStatus {
        /// Order ID
        id: String,

        /// New status (`pending`, `processing`, `shipped`, `delivered`, `cancelled`)
        status: OrderStatus,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed demo orders from a YAML file
    Orders {
        /// YAML file to load (defaults to the bundled demo orders)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Discard existing orders first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before tracing so RUST_LOG and STOREFRONT_* apply
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                search,
                category,
                bestseller,
                min_price,
                max_price,
                sort,
            } => {
                commands::products::list(search, category, bestseller, min_price, max_price, &sort);
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List {
                search,
                status,
                from,
                to,
                page,
            } => commands::orders::list(search, status, from, to, page).await?,
            OrdersAction::Show { id } => commands::orders::show(&id).await?,
            OrdersAction::SetStatus { id, status } => {
                commands::orders::set_status(&id, status).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Orders { file, clear } => {
                commands::seed::orders(file.as_deref(), clear).await?;
            }
        },
    }
    Ok(())
}
