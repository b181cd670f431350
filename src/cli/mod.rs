//! Command-line interface

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use storefront::{
    cart::CartStore,
    catalog::{Catalog, CatalogError, add_to_cart},
    checkout::{Checkout, CheckoutError, Notice, NoticeLevel, Notifier, SOLD_OUT_MESSAGE},
    handoff::Platform,
    pricing::PricingError,
    storage::{CartStorage, FileStorage},
};
use thiserror::Error;
use tracing::{info, warn};

pub mod config;
pub mod logging;
mod render;

use config::{LoggingConfig, StorefrontConfig};
use render::{TerminalNotifier, write_cart, write_catalog, write_confirmation};

const NOT_FOUND_MESSAGE: &str = "Producto no encontrado.";

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Catalog could not be loaded or queried.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Checkout did not complete.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Totals overflowed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Terminal output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart and WhatsApp checkout", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List products grouped by category
    Catalog,

    /// Add units of a product variant to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove {
        /// Cart line id, e.g. `1-Negro-42`
        id: String,
    },

    /// Show the cart
    Show,

    /// Empty the cart
    Clear,

    /// Confirm the order and print the WhatsApp link
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    #[arg(long)]
    product: String,

    /// Variant color
    #[arg(long)]
    color: String,

    /// Variant size
    #[arg(long)]
    size: String,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Customer name shown in the greeting
    #[arg(long)]
    name: Option<String>,

    /// User-agent used to pick the WhatsApp endpoint
    #[arg(long, env = "STOREFRONT_USER_AGENT", default_value = "")]
    user_agent: String,
}

/// Run the parsed command, writing output to `out`.
///
/// # Errors
///
/// Returns a [`CliError`] if the catalog or terminal fails.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let checkout = Checkout::new(cli.storefront.checkout_settings());
    let mut cart = CartStore::hydrate(FileStorage::new(&cli.storefront.data_dir));

    match cli.command {
        Command::Catalog => {
            let catalog = Catalog::load(&cli.storefront.catalog)?;

            write_catalog(out, &catalog, checkout.builder().formatter())
        }
        Command::Add(args) => {
            let catalog = Catalog::load(&cli.storefront.catalog)?;

            add(&mut cart, &catalog, &args, &mut TerminalNotifier::new(out))
        }
        Command::Remove { id } => {
            if cart.get(&id).is_none() {
                warn!(id, "no cart line with this id");
            }

            cart.remove(&id);

            write_cart(out, cart.snapshot(), checkout.builder().formatter())
        }
        Command::Show => write_cart(out, cart.snapshot(), checkout.builder().formatter()),
        Command::Clear => {
            cart.clear();

            TerminalNotifier::new(out).notify(Notice::new(NoticeLevel::Info, "Carrito vacío."));

            Ok(())
        }
        Command::Checkout(args) => checkout_cart(&checkout, &cart, &args, out),
    }
}

/// Add up to `args.quantity` units, one stock-checked add (and one write) each.
fn add<S: CartStorage>(
    cart: &mut CartStore<S>,
    catalog: &Catalog,
    args: &AddArgs,
    notifier: &mut impl Notifier,
) -> Result<(), CliError> {
    let (product, variant) = match catalog.find_variant(&args.product, &args.color, &args.size) {
        Ok(found) => found,
        Err(err) => {
            warn!(error = %err, "selection not in catalog, nothing added");
            notifier.notify(Notice::new(NoticeLevel::Error, NOT_FOUND_MESSAGE));

            return Ok(());
        }
    };

    let mut added = 0_u32;

    for _ in 0..args.quantity {
        match add_to_cart(cart, product, variant) {
            Ok(()) => added = added.saturating_add(1),
            Err(CatalogError::SoldOut(_)) => {
                notifier.notify(Notice::new(NoticeLevel::Warn, SOLD_OUT_MESSAGE));
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if added > 0 {
        notifier.notify(Notice::new(
            NoticeLevel::Success,
            format!(
                "Agregado al carrito: {} ({}, {}) x{added}",
                product.name, variant.color, variant.size
            ),
        ));
    }

    Ok(())
}

fn checkout_cart(
    checkout: &Checkout,
    cart: &CartStore<FileStorage>,
    args: &CheckoutArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let platform = Platform::from_user_agent(&args.user_agent);
    let name = args.name.as_deref().map(str::trim).filter(|name| !name.is_empty());

    let confirmation = match checkout.confirm(cart, &mut TerminalNotifier::new(&mut *out)) {
        Ok(confirmation) => confirmation,
        Err(CheckoutError::EmptyCart) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    write_confirmation(out, &confirmation)?;

    let handoff = checkout.send(cart, name, platform, &mut TerminalNotifier::new(&mut *out))?;

    info!(url = handoff.link.url(), "hand-off link ready");

    writeln!(out, "\n{}", handoff.link)?;

    Ok(())
}
