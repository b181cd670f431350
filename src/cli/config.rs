//! Storefront configuration

use std::path::PathBuf;

use clap::Args;
use storefront::{
    checkout::{CheckoutSettings, ORDER_SENT_MESSAGE},
    formatting::{DEFAULT_CURRENCY, DEFAULT_FALLBACK_SYMBOL},
    order::{DEFAULT_CLOSING, DEFAULT_GREETING},
};

/// Storage, catalog and checkout settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,

    /// Catalog file (JSON, or YAML with a .yml/.yaml extension)
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = "fixtures/products.json")]
    pub catalog: PathBuf,

    /// WhatsApp destination number, country code included
    #[arg(long, env = "STOREFRONT_WHATSAPP_PHONE", default_value = "56978736507")]
    pub phone: String,

    /// Business name
    #[arg(long, env = "STOREFRONT_BUSINESS_NAME", default_value = "AndShop")]
    pub business_name: String,

    /// Greeting used when no customer name is given
    #[arg(long, env = "STOREFRONT_GREETING", default_value = DEFAULT_GREETING)]
    pub greeting: String,

    /// Closing line of the order message
    #[arg(long, env = "STOREFRONT_CLOSING", default_value = DEFAULT_CLOSING)]
    pub closing: String,

    /// Notice shown after the order is handed off
    #[arg(long, env = "STOREFRONT_ORDER_SENT_MESSAGE", default_value = ORDER_SENT_MESSAGE)]
    pub success_message: String,

    /// ISO currency code for prices
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Symbol used when the currency cannot be resolved
    #[arg(long, env = "STOREFRONT_FALLBACK_SYMBOL", default_value = DEFAULT_FALLBACK_SYMBOL)]
    pub fallback_symbol: String,
}

impl StorefrontConfig {
    /// Checkout settings derived from this configuration.
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            phone: self.phone.clone(),
            business_name: self.business_name.clone(),
            default_greeting: self.greeting.clone(),
            closing: self.closing.clone(),
            success_message: self.success_message.clone(),
            currency: self.currency.clone(),
            fallback_symbol: self.fallback_symbol.clone(),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
