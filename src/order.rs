//! Order messages
//!
//! Derives the order summary shared by the on-screen confirmation and the
//! text sent through the hand-off link. Both go through [`OrderSummary`] so
//! the displayed total and the sent total always agree.

use std::fmt::Write;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    cart::{CartLine, LineVariant},
    formatting::PriceFormatter,
    pricing::{PricingError, line_total},
};

/// Greeting used when no customer name is given.
pub const DEFAULT_GREETING: &str = "Hola, me interesan estos productos:";

/// Closing question appended to every message.
pub const DEFAULT_CLOSING: &str = "¿Están disponibles?";

/// Name shown for lines stored without one.
pub const UNNAMED_PRODUCT: &str = "Producto sin nombre";

/// Errors raised while deriving an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// Orders need at least one line.
    #[error("cannot build an order from an empty cart")]
    EmptyCart,

    /// Line or order total overflowed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One derived order entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Display name including the variant suffix when present.
    pub description: String,

    /// Units ordered.
    pub quantity: u32,

    /// Discounted price times quantity.
    pub line_total: Decimal,

    /// Variant the line was selected at.
    pub variant: Option<LineVariant>,
}

/// Per-line totals plus the order total.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    lines: Vec<OrderLine>,
    total: Decimal,
}

impl OrderSummary {
    /// Derive a summary from a cart snapshot.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: `lines` is empty.
    /// - [`OrderError::Pricing`]: a total overflowed.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut total = Decimal::ZERO;
        let mut order_lines = Vec::with_capacity(lines.len());

        for line in lines {
            let line_total = line_total(line)?;

            total = total
                .checked_add(line_total)
                .ok_or_else(|| PricingError::Overflow(line.id().to_string()))?;

            order_lines.push(OrderLine {
                description: describe(line),
                quantity: line.quantity(),
                line_total,
                variant: line.variant().cloned(),
            });
        }

        Ok(Self {
            lines: order_lines,
            total,
        })
    }

    /// Derived lines in cart order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Display name for a line, augmented with the variant unless the name
/// already carries it.
fn describe(line: &CartLine) -> String {
    let name = line.name().trim();
    let name = if name.is_empty() { UNNAMED_PRODUCT } else { name };

    match line.variant() {
        Some(variant) => {
            let label = variant.label();

            if name.ends_with(&label) {
                name.to_string()
            } else {
                format!("{name} {label}")
            }
        }
        None => name.to_string(),
    }
}

/// A finished order message.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderMessage {
    /// Human readable message text.
    pub text: String,

    /// Order total the text reports.
    pub total: Decimal,
}

/// Entry of the on-screen confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationLine {
    /// `name xN = total`
    pub text: String,

    /// `(color, size)` shown under the entry.
    pub variant_note: Option<String>,
}

/// On-screen confirmation of an order before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// One entry per cart line.
    pub lines: Vec<ConfirmationLine>,

    /// Formatted order total.
    pub total: String,
}

/// Builds order messages and confirmations from cart snapshots.
#[derive(Debug, Clone)]
pub struct OrderMessageBuilder {
    formatter: PriceFormatter,
    default_greeting: String,
    closing: String,
}

impl OrderMessageBuilder {
    /// Create a builder with the default greeting and closing.
    pub fn new(formatter: PriceFormatter) -> Self {
        Self {
            formatter,
            default_greeting: DEFAULT_GREETING.to_string(),
            closing: DEFAULT_CLOSING.to_string(),
        }
    }

    /// Replace the greeting used when no customer name is given.
    #[must_use]
    pub fn with_default_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.default_greeting = greeting.into();
        self
    }

    /// Replace the closing line.
    #[must_use]
    pub fn with_closing(mut self, closing: impl Into<String>) -> Self {
        self.closing = closing.into();
        self
    }

    /// Formatter used for every amount.
    #[must_use]
    pub fn formatter(&self) -> &PriceFormatter {
        &self.formatter
    }

    /// Build the order message for a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the snapshot is empty or a total overflows.
    pub fn build(
        &self,
        lines: &[CartLine],
        customer_name: Option<&str>,
    ) -> Result<OrderMessage, OrderError> {
        let summary = OrderSummary::from_lines(lines)?;

        Ok(self.render(&summary, customer_name))
    }

    /// Render an already derived summary into message text.
    pub fn render(&self, summary: &OrderSummary, customer_name: Option<&str>) -> OrderMessage {
        let mut text = String::new();

        match customer_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => {
                _ = write!(text, "Hola, soy *{name}* y me interesan estos productos:\n\n");
            }
            None => {
                text.push_str(&self.default_greeting);
                text.push_str("\n\n");
            }
        }

        // writing into a String cannot fail
        for line in summary.lines() {
            _ = writeln!(
                text,
                "• {} x{} = {}",
                line.description,
                line.quantity,
                self.formatter.format(line.line_total)
            );
        }

        _ = writeln!(text, "\n*Total:* {}", self.formatter.format(summary.total()));
        text.push('\n');
        text.push_str(&self.closing);

        OrderMessage {
            text,
            total: summary.total(),
        }
    }

    /// Build the confirmation shown before the order is sent.
    pub fn confirmation(&self, summary: &OrderSummary) -> Confirmation {
        let lines = summary
            .lines()
            .iter()
            .map(|line| ConfirmationLine {
                text: format!(
                    "{} x{} = {}",
                    line.description,
                    line.quantity,
                    self.formatter.format(line.line_total)
                ),
                variant_note: line.variant.as_ref().map(LineVariant::label),
            })
            .collect();

        Confirmation {
            lines,
            total: self.formatter.format(summary.total()),
        }
    }
}

impl Default for OrderMessageBuilder {
    fn default() -> Self {
        Self::new(PriceFormatter::default())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn fixed_builder() -> OrderMessageBuilder {
        OrderMessageBuilder::new(PriceFormatter::Fixed("S/".to_string()))
    }

    fn discounted_line() -> CartLine {
        CartLine::new("A", "1", "Polo", Decimal::from(100))
            .with_discount_percent(Decimal::TEN)
            .with_quantity(2)
    }

    #[test]
    fn summary_computes_line_and_order_totals() -> TestResult {
        let lines = [
            discounted_line(),
            CartLine::new("B", "2", "Gorra", Decimal::new(2550, 2)),
        ];

        let summary = OrderSummary::from_lines(&lines)?;

        assert_eq!(summary.lines().len(), 2);
        assert_eq!(
            summary.lines().first().map(|l| l.line_total),
            Some(Decimal::from(180))
        );
        assert_eq!(summary.total(), Decimal::new(20550, 2));

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(
            fixed_builder().build(&[], None),
            Err(OrderError::EmptyCart)
        );
    }

    #[test]
    fn message_without_name() -> TestResult {
        let message = fixed_builder().build(&[discounted_line()], None)?;

        assert_eq!(
            message.text,
            "Hola, me interesan estos productos:\n\n\
             • Polo x2 = S/ 180.00\n\
             \n*Total:* S/ 180.00\n\
             \n¿Están disponibles?"
        );
        assert_eq!(message.total, Decimal::from(180));

        Ok(())
    }

    #[test]
    fn message_with_trimmed_name() -> TestResult {
        let message = fixed_builder().build(&[discounted_line()], Some("  Ana  "))?;

        assert!(
            message
                .text
                .starts_with("Hola, soy *Ana* y me interesan estos productos:\n\n"),
            "unexpected greeting: {}",
            message.text
        );

        Ok(())
    }

    #[test]
    fn blank_name_uses_default_greeting() -> TestResult {
        let message = fixed_builder()
            .with_default_greeting("Buenas:")
            .build(&[discounted_line()], Some("   "))?;

        assert!(message.text.starts_with("Buenas:\n\n"), "{}", message.text);

        Ok(())
    }

    #[test]
    fn variant_is_appended_once() -> TestResult {
        let variant = LineVariant::new("Negro", "42", 3);
        let lines = [
            CartLine::new("1-Negro-42", "1", "Zapatilla", Decimal::from(50))
                .with_variant(variant.clone()),
            CartLine::new("2-Negro-42", "2", "Botin (Negro, 42)", Decimal::from(60))
                .with_variant(variant),
        ];

        let message = fixed_builder().build(&lines, None)?;

        assert!(message.text.contains("• Zapatilla (Negro, 42) x1 = S/ 50.00\n"));
        assert!(message.text.contains("• Botin (Negro, 42) x1 = S/ 60.00\n"));

        Ok(())
    }

    #[test]
    fn unnamed_lines_get_placeholder() -> TestResult {
        let lines = [CartLine::new("X", "9", "", Decimal::ONE)];

        let message = fixed_builder().build(&lines, None)?;

        assert!(message.text.contains("• Producto sin nombre x1 = S/ 1.00"));

        Ok(())
    }

    #[test]
    fn locale_message_uses_formatter() -> TestResult {
        let builder = OrderMessageBuilder::default();
        let formatted = builder.formatter().format(Decimal::from(180));

        let message = builder.build(&[discounted_line()], None)?;

        assert!(message.text.contains(&format!("x2 = {formatted}\n")));
        assert!(message.text.contains(&format!("*Total:* {formatted}\n")));

        Ok(())
    }

    #[test]
    fn build_is_deterministic() -> TestResult {
        let builder = OrderMessageBuilder::default();
        let lines = [discounted_line(), CartLine::new("B", "2", "Gorra", Decimal::TEN)];

        assert_eq!(
            builder.build(&lines, Some("Ana"))?,
            builder.build(&lines, Some("Ana"))?
        );

        Ok(())
    }

    #[test]
    fn confirmation_agrees_with_message_total() -> TestResult {
        let builder = fixed_builder();
        let lines = [
            discounted_line(),
            CartLine::new("1-Rojo-M", "1", "Polo", Decimal::from(40))
                .with_variant(LineVariant::new("Rojo", "M", 2)),
        ];
        let summary = OrderSummary::from_lines(&lines)?;

        let confirmation = builder.confirmation(&summary);
        let message = builder.render(&summary, None);

        assert_eq!(confirmation.total, "S/ 220.00");
        assert!(message.text.contains(&format!("*Total:* {}", confirmation.total)));
        assert_eq!(
            confirmation.lines.get(1),
            Some(&ConfirmationLine {
                text: "Polo (Rojo, M) x1 = S/ 40.00".to_string(),
                variant_note: Some("(Rojo, M)".to_string()),
            })
        );

        Ok(())
    }
}
