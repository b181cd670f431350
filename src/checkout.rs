//! Checkout
//!
//! Reads the cart snapshot, derives the order once and hands it off to the
//! messaging endpoint. An empty cart is reported to the user through the
//! [`Notifier`] and the flow stops before any message is derived.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::CartStore,
    formatting::{DEFAULT_CURRENCY, DEFAULT_FALLBACK_SYMBOL, PriceFormatter},
    handoff::{HandOffLink, Platform},
    order::{
        Confirmation, DEFAULT_CLOSING, DEFAULT_GREETING, OrderError, OrderMessage,
        OrderMessageBuilder, OrderSummary,
    },
    storage::CartStorage,
};

/// Shown when checkout is attempted with nothing in the cart.
pub const EMPTY_CART_MESSAGE: &str = "Tu carrito está vacío. Agrega productos antes de finalizar.";

/// Shown once the order has been handed off.
pub const ORDER_SENT_MESSAGE: &str = "¡Pedido enviado! Te responderemos pronto.";

/// Shown when a selected variant has no units left.
pub const SOLD_OUT_MESSAGE: &str = "Este producto está agotado.";

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// Completed action
    Success,
    /// Recoverable problem
    Warn,
    /// Action did not happen
    Error,
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,

    /// Message text
    pub text: String,
}

impl Notice {
    /// Create a notice.
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Surface that displays notices to the user.
pub trait Notifier {
    /// Show a notice.
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Checkout errors.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The order could not be derived.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Deployment settings for checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Destination phone number; non-digits are ignored.
    pub phone: String,

    /// Business name, used in logs and terminal output.
    pub business_name: String,

    /// Greeting used when the customer gives no name.
    pub default_greeting: String,

    /// Closing line of every message.
    pub closing: String,

    /// Notice shown after a successful hand-off.
    pub success_message: String,

    /// ISO currency code for prices.
    pub currency: String,

    /// Symbol used if the currency cannot be resolved.
    pub fallback_symbol: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            phone: "56978736507".to_string(),
            business_name: "AndShop".to_string(),
            default_greeting: DEFAULT_GREETING.to_string(),
            closing: DEFAULT_CLOSING.to_string(),
            success_message: ORDER_SENT_MESSAGE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            fallback_symbol: DEFAULT_FALLBACK_SYMBOL.to_string(),
        }
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct HandOff {
    /// The message sent.
    pub message: OrderMessage,

    /// Link carrying the message.
    pub link: HandOffLink,
}

/// Checkout flow over a cart store.
#[derive(Debug, Clone)]
pub struct Checkout {
    settings: CheckoutSettings,
    builder: OrderMessageBuilder,
}

impl Checkout {
    /// Create a checkout flow from settings.
    pub fn new(settings: CheckoutSettings) -> Self {
        let formatter = PriceFormatter::for_currency(&settings.currency, &settings.fallback_symbol);
        let builder = OrderMessageBuilder::new(formatter)
            .with_default_greeting(settings.default_greeting.clone())
            .with_closing(settings.closing.clone());

        Self { settings, builder }
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Message builder shared by confirmation and hand-off.
    #[must_use]
    pub fn builder(&self) -> &OrderMessageBuilder {
        &self.builder
    }

    /// Derive the order summary, or report an empty cart.
    fn summarize<S: CartStorage>(
        &self,
        cart: &CartStore<S>,
        notifier: &mut impl Notifier,
    ) -> Result<OrderSummary, CheckoutError> {
        if cart.is_empty() {
            warn!("checkout attempted with an empty cart");
            notifier.notify(Notice::new(NoticeLevel::Error, EMPTY_CART_MESSAGE));

            return Err(CheckoutError::EmptyCart);
        }

        Ok(OrderSummary::from_lines(cart.snapshot())?)
    }

    /// Build the confirmation shown before sending.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart is empty; an error notice was shown.
    /// - [`CheckoutError::Order`]: the order total overflowed.
    pub fn confirm<S: CartStorage>(
        &self,
        cart: &CartStore<S>,
        notifier: &mut impl Notifier,
    ) -> Result<Confirmation, CheckoutError> {
        let summary = self.summarize(cart, notifier)?;

        Ok(self.builder.confirmation(&summary))
    }

    /// Derive the order message and the hand-off link.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart is empty; an error notice was shown.
    /// - [`CheckoutError::Order`]: the order total overflowed.
    pub fn send<S: CartStorage>(
        &self,
        cart: &CartStore<S>,
        customer_name: Option<&str>,
        platform: Platform,
        notifier: &mut impl Notifier,
    ) -> Result<HandOff, CheckoutError> {
        let summary = self.summarize(cart, notifier)?;
        let message = self.builder.render(&summary, customer_name);
        let link = HandOffLink::new(&self.settings.phone, &message.text, platform);

        info!(
            business = %self.settings.business_name,
            lines = summary.lines().len(),
            total = %message.total,
            ?platform,
            "order handed off"
        );

        notifier.notify(Notice::new(
            NoticeLevel::Success,
            self.settings.success_message.clone(),
        ));

        Ok(HandOff { message, link })
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new(CheckoutSettings::default())
    }
}
