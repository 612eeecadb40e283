//! BlitzShop CLI - shop and administer a BlitzShop backend from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept in $BLITZSHOP_STATE_DIR/storage.json)
//! blitz login -e ana@example.com -p secret1
//!
//! # Browse and fill the cart
//! blitz products list --category Lamps --min-price 10 --max-price 50
//! blitz cart add 3 --quantity 2
//!
//! # Place the order and pay with a coupon
//! blitz orders place --shipping "1 Main St" --billing "1 Main St"
//! blitz checkout 12 --coupon SAVE10
//!
//! # Admin reports
//! blitz admin revenue --days 30
//! blitz admin export orders --days 7 > orders.csv
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami` - Session management
//! - `products`, `cart`, `coupon`, `orders`, `checkout`, `invoices`, `account` - Shopper flows
//! - `admin` - Admin console (requires an admin account)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blitzshop_storefront::ClientConfig;

mod commands;
mod output;

use commands::{
    AccountAction, AdminAction, CartAction, CommandError, InvoiceAction, OrderAction,
    ProductAction,
};

#[derive(Parser)]
#[command(name = "blitz")]
#[command(author, version, about = "BlitzShop command-line client")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "BLITZSHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "BLITZSHOP_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Check a coupon against a cart total
    Coupon {
        code: String,

        /// Cart total to check against (defaults to the current cart)
        #[arg(long)]
        total: Option<rust_decimal::Decimal>,
    },
    /// Place and inspect orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Pay for a pending order
    Checkout {
        order_id: i32,

        /// Coupon to apply before paying
        #[arg(long)]
        coupon: Option<String>,
    },
    /// List and download invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },
    /// Profile, password and notification settings
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
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

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "blitzshop_cli=info,blitzshop_storefront=info,blitzshop_admin=info".into()
    });

    // Logs go to stderr so command output can be piped
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .with(sentry_tracing::layer().event_filter(sentry_event_filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(sentry_tracing::layer().event_filter(sentry_event_filter))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.log_json);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(cli.log_json);

    if let Err(e) = run(cli, &config).await {
        if let CommandError::Client(client) = &e {
            client.capture();
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CommandError> {
    let shop = commands::connect(config).await?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&shop, &email, &password).await?;
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            username,
        } => {
            let form = blitzshop_storefront::validation::RegistrationForm {
                email,
                confirm_password: password.clone(),
                password,
                first_name,
                last_name,
                username,
            };
            commands::session::register(&shop, &form).await?;
        }
        Commands::Logout => commands::session::logout(&shop).await?,
        Commands::Whoami => commands::session::whoami(&shop).await?,
        Commands::Products { action } => commands::shop::products(&shop, action).await?,
        Commands::Cart { action } => commands::shop::cart(&shop, action).await?,
        Commands::Coupon { code, total } => commands::shop::coupon(&shop, &code, total).await?,
        Commands::Orders { action } => commands::shop::orders(&shop, action).await?,
        Commands::Checkout { order_id, coupon } => {
            commands::shop::checkout(&shop, config, order_id, coupon.as_deref()).await?;
        }
        Commands::Invoices { action } => commands::account::invoices(&shop, action).await?,
        Commands::Account { action } => commands::account::account(&shop, action).await?,
        Commands::Admin { action } => commands::admin::run(&shop, action).await?,
    }
    Ok(())
}
