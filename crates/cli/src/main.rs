//! `EcoFinds` CLI - Browse, sell, and buy second-hand goods from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (signs in immediately)
//! ecofinds register -e alice@example.com -p hunter2 -u alice
//!
//! # List something for sale
//! ecofinds sell --title "Desk lamp" --description "Works fine" --category Home --price 12.50
//!
//! # Browse and buy
//! ecofinds products --search lamp --category Home
//! ecofinds cart add <PRODUCT_ID>
//! ecofinds checkout
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `whoami`, `profile` - Account
//! - `products`, `categories`, `show` - Browse the catalog
//! - `sell`, `edit-listing`, `delist`, `my-listings` - Manage your listings
//! - `cart`, `checkout`, `purchases` - Shopping cart and history
//! - `seed` - Import listings from a YAML file
//! - `reset` - Delete all local data
//!
//! State lives in `ECOFINDS_DATA_DIR` (default `.ecofinds`), or `--data-dir`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ecofinds_core::{Category, CategoryFilter, Price, ProductId};
use ecofinds_storefront::config::{LogFormat, StorefrontConfig};
use ecofinds_storefront::state::AppState;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ecofinds")]
#[command(author, version, about = "EcoFinds second-hand marketplace")]
struct Cli {
    /// Directory holding the marketplace data (overrides `ECOFINDS_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        username: String,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update your profile (only the given fields change)
    Profile(commands::account::ProfileArgs),
    /// List products, optionally filtered
    Products {
        /// Case-insensitive search over title and description
        #[arg(short, long)]
        search: Option<String>,
        /// Category to show (`All` for every category)
        #[arg(short, long)]
        category: Option<CategoryFilter>,
    },
    /// List categories present in the catalog
    Categories,
    /// Show one product
    Show { id: ProductId },
    /// List an item for sale
    Sell {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: Category,
        /// Price, e.g. `12.50` or `$12.50`
        #[arg(long)]
        price: Price,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit one of your listings
    EditListing(commands::listings::EditArgs),
    /// Remove one of your listings
    Delist { id: ProductId },
    /// List your listings
    MyListings,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Buy everything in the cart
    Checkout,
    /// Show your purchase history
    Purchases,
    /// Import listings from a YAML seed file
    Seed { file: PathBuf },
    /// Delete all local marketplace data
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents (default)
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product's whole line
    Remove { id: ProductId },
    /// Set a line's quantity; zero or less removes it
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let config = match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config) {
        if e.is_internal() {
            tracing::error!(detail = %e, "{}", e.user_message());
        } else {
            tracing::warn!("{}", e.user_message());
        }
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so stdout stays
/// reserved for command output.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecofinds_storefront=info,ecofinds_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let mut state = AppState::from_config(config)?;

    match cli.command {
        Commands::Register {
            email,
            password,
            username,
        } => commands::account::register(&mut state, &email, &password, &username)?,
        Commands::Login { email, password } => {
            commands::account::login(&mut state, &email, &password)?;
        }
        Commands::Logout => commands::account::logout(&mut state)?,
        Commands::Whoami => commands::account::whoami(&state),
        Commands::Profile(args) => commands::account::profile(&mut state, args)?,
        Commands::Products { search, category } => {
            commands::browse::products(&mut state, search, category);
        }
        Commands::Categories => commands::browse::categories(&state),
        Commands::Show { id } => commands::browse::show(&state, &id)?,
        Commands::Sell {
            title,
            description,
            category,
            price,
            image,
        } => commands::listings::sell(&mut state, title, description, category, price, image)?,
        Commands::EditListing(args) => commands::listings::edit(&mut state, args)?,
        Commands::Delist { id } => commands::listings::delist(&mut state, &id)?,
        Commands::MyListings => commands::listings::mine(&state)?,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id } => commands::cart::add(&mut state, &id)?,
            CartAction::Remove { id } => commands::cart::remove(&mut state, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&mut state, &id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&mut state)?,
        },
        Commands::Checkout => commands::cart::checkout(&mut state)?,
        Commands::Purchases => commands::cart::purchases(&state)?,
        Commands::Seed { file } => commands::seed::from_file(&mut state, &file)?,
        Commands::Reset { yes } => commands::reset(&mut state, yes)?,
    }
    Ok(())
}
