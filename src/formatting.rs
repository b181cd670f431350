//! Currency formatting
//!
//! Prices are shown in one fixed currency per deployment. When that currency
//! cannot be resolved the formatter degrades to a plain `SYMBOL 0.00`
//! rendering instead of failing.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Findable, Money, iso::Currency};
use tracing::warn;

/// Default deployment currency (Peruvian sol).
pub const DEFAULT_CURRENCY: &str = "PEN";

/// Symbol used by the fallback formatter.
pub const DEFAULT_FALLBACK_SYMBOL: &str = "S/";

/// Formats amounts for display.
#[derive(Debug, Clone)]
pub enum PriceFormatter {
    /// Currency-aware formatting through `rusty_money`.
    Locale(&'static Currency),

    /// Fixed two-decimal rendering prefixed by a symbol.
    Fixed(String),
}

impl PriceFormatter {
    /// Build a formatter for an ISO currency code, falling back to a fixed
    /// rendering with `fallback_symbol` when the code is unknown.
    pub fn for_currency(code: &str, fallback_symbol: &str) -> Self {
        if let Some(currency) = Currency::find(code) {
            Self::Locale(currency)
        } else {
            warn!(code, "unknown currency, using fallback price formatter");
            Self::Fixed(fallback_symbol.to_string())
        }
    }

    /// Format an amount, rounded half away from zero to the currency's minor
    /// unit (two decimals for the fixed rendering).
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        match self {
            Self::Locale(currency) => {
                let rounded = round_half_away(amount, currency.exponent);

                format!("{}", Money::from_decimal(rounded, *currency))
            }
            Self::Fixed(symbol) => format!("{symbol} {:.2}", round_half_away(amount, 2)),
        }
    }

    /// Whether the locale-aware formatter is in use.
    #[must_use]
    pub fn is_locale_aware(&self) -> bool {
        matches!(self, Self::Locale(_))
    }
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::for_currency(DEFAULT_CURRENCY, DEFAULT_FALLBACK_SYMBOL)
    }
}

fn round_half_away(amount: Decimal, exponent: u32) -> Decimal {
    amount.round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero)
}
