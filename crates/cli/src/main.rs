//! LabFlow CLI - Command-line front end for the lab management client.
//!
//! # Usage
//!
//! ```bash
//! # Log in (persists the session for later commands)
//! labflow login -e admin@admin.com -p admin
//!
//! # Day-to-day views
//! labflow dashboard
//! labflow orders list
//! labflow financials --from 2024-01-01 --to 2024-06-30
//!
//! # Catalog management (admin role)
//! labflow products add --name "Corona" --material "Zirconia" --price 150.00
//!
//! # Ask the assistant
//! labflow chat "¿Qué órdenes vencen esta semana?"
//! ```
//!
//! # Environment Variables
//!
//! - `LABFLOW_API_URL` - Backend API base URL (required)
//! - `CLAUDE_API_KEY` - Chat assistant credentials (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]
// This is the presentation layer; its output goes to stdout/stderr by design.
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};

use labflow_client::{ClientConfig, Store};

mod commands;

#[derive(Parser)]
#[command(name = "labflow")]
#[command(author, version, about = "LabFlow dental laboratory management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and remove the persisted session
    Logout,
    /// Register a new account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Account role (`admin`, `user`); server default is `user`
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Change the current account's password
    ChangePassword {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password (min 6 characters)
        #[arg(long)]
        new: String,
    },
    /// Show pending orders, client and product counters, and recent orders
    Dashboard,
    /// Financial KPIs and monthly realized revenue
    Financials {
        /// Inclusive range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only orders for this client
        #[arg(long)]
        client: Option<String>,

        /// Only orders containing this product
        #[arg(long)]
        product: Option<String>,
    },
    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: commands::clients::ClientAction,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Manage suppliers
    Suppliers {
        #[command(subcommand)]
        action: commands::suppliers::SupplierAction,
    },
    /// Manage work orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Preview the delivery-notice email for an order
    Notify {
        /// Work order identifier
        order_id: String,
    },
    /// Ask the lab assistant a question
    Chat {
        /// The message to send
        message: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; RUST_LOG controls verbosity (default warn).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let mut store = Store::from_config(&config)?;
    store.initialize().await;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&mut store, &email, &password).await?,
        Commands::Logout => commands::auth::logout(&mut store),
        Commands::Register {
            email,
            password,
            role,
        } => commands::auth::register(&store, &email, &password, role.as_deref()).await?,
        Commands::ChangePassword { current, new } => {
            commands::auth::change_password(&store, &current, &new).await?;
        }
        Commands::Dashboard => commands::reports::dashboard(&store)?,
        Commands::Financials {
            from,
            to,
            client,
            product,
        } => commands::reports::financials(
            &store,
            from.as_deref(),
            to.as_deref(),
            client.as_deref(),
            product.as_deref(),
        )?,
        Commands::Clients { action } => commands::clients::run(&mut store, action).await?,
        Commands::Products { action } => commands::products::run(&mut store, action).await?,
        Commands::Suppliers { action } => commands::suppliers::run(&mut store, action).await?,
        Commands::Orders { action } => commands::orders::run(&mut store, action).await?,
        Commands::Notify { order_id } => commands::reports::notify(&store, &order_id)?,
        Commands::Chat { message } => commands::chat::send(&mut store, &message).await,
    }
    Ok(())
}
