mod cart;
mod catalog;
mod dashboard;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{cart::CartCommands, catalog::CatalogCommands};

#[derive(Debug, Parser)]
#[command(name = "truenorth-cli")]
#[command(about = "TrueNorth storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Show the admin dashboard
    Dashboard,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = truenorth_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("truenorth-cli: run with --help to list commands");
        return Ok(());
    };

    let catalog = truenorth_core::load_catalog(config.catalog_path.as_deref())?;
    tracing::debug!(products = catalog.products().len(), "catalog loaded");

    match command {
        Commands::Catalog { command } => match command {
            CatalogCommands::List(filters) => {
                catalog::run_catalog_list(&catalog, &filters.shop_params());
            }
            CatalogCommands::Show { slug } => catalog::run_catalog_show(&catalog, &slug)?,
        },
        Commands::Cart { command } => {
            let policy = truenorth_core::CheckoutPolicy::from_app_config(&config);
            match command {
                CartCommands::Add {
                    slug,
                    variant,
                    quantity,
                } => {
                    cart::run_cart_add(
                        &catalog,
                        &config.cart_path,
                        &slug,
                        variant.as_deref(),
                        quantity,
                    )?;
                }
                CartCommands::Update { item_id, quantity } => {
                    cart::run_cart_update(&config.cart_path, &item_id, quantity)?;
                }
                CartCommands::Remove { item_id } => {
                    cart::run_cart_remove(&config.cart_path, &item_id)?;
                }
                CartCommands::Clear => {
                    cart::run_cart_clear(&config.cart_path)?;
                }
                CartCommands::Show { discount } => {
                    cart::run_cart_show(&config.cart_path, &policy, discount)?;
                }
            }
        }
        Commands::Dashboard => dashboard::run_dashboard(&catalog, config.low_stock_threshold),
    }

    Ok(())
}
