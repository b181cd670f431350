//! Terminal output

use std::io;

use storefront::{
    cart::CartLine,
    catalog::{Catalog, category_name},
    checkout::{Notice, NoticeLevel, Notifier},
    formatting::PriceFormatter,
    order::Confirmation,
    pricing::{line_total, total_price, total_quantity},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use super::CliError;

/// Writes notices to the terminal, one per line.
#[derive(Debug)]
pub struct TerminalNotifier<W: io::Write> {
    out: W,
}

impl<W: io::Write> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: io::Write> Notifier for TerminalNotifier<W> {
    fn notify(&mut self, notice: Notice) {
        let marker = match notice.level {
            NoticeLevel::Info => "i",
            NoticeLevel::Success => "✔",
            NoticeLevel::Warn => "!",
            NoticeLevel::Error => "✖",
        };

        _ = writeln!(self.out, "{marker} {}", notice.text);
    }
}

/// Print the catalog grouped by category.
pub fn write_catalog(
    out: &mut impl io::Write,
    catalog: &Catalog,
    formatter: &PriceFormatter,
) -> Result<(), CliError> {
    for (category, products) in catalog.by_category() {
        let mut builder = Builder::default();

        builder.push_record(["Id", "Product", "Price", "Variants", "Stock"]);

        for product in products {
            let price = if product.has_discount() {
                format!(
                    "{} (-{}%)",
                    formatter.format(product.final_price()),
                    product.discount.normalize()
                )
            } else {
                formatter.format(product.final_price())
            };

            let variants = product
                .variants
                .iter()
                .map(|variant| format!("{}/{}", variant.color, variant.size))
                .collect::<Vec<_>>()
                .join(", ");

            let stock = if product.is_sold_out() {
                "agotado".to_string()
            } else {
                product.total_stock().to_string()
            };

            builder.push_record([product.id.clone(), product.name.clone(), price, variants, stock]);
        }

        let mut table = builder.build();

        table.with(Style::rounded());
        table.modify(Columns::new(2..3), Alignment::right());

        writeln!(out, "\n{}\n{table}", category_name(category))?;
    }

    Ok(())
}

/// Print the cart lines with their totals.
pub fn write_cart(
    out: &mut impl io::Write,
    lines: &[CartLine],
    formatter: &PriceFormatter,
) -> Result<(), CliError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Qty", "Unit", "Total"]);

    for line in lines {
        let unit = formatter.format(line.unit_price());
        let total = formatter.format(line_total(line)?);

        builder.push_record([
            line.id().to_string(),
            line.name().to_string(),
            line.quantity().to_string(),
            unit,
            total,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        " Items: {}  Total: {}",
        total_quantity(lines),
        formatter.format(total_price(lines)?)
    )?;

    Ok(())
}

/// Print the pre-send confirmation.
pub fn write_confirmation(
    out: &mut impl io::Write,
    confirmation: &Confirmation,
) -> Result<(), CliError> {
    writeln!(out, "Resumen del pedido")?;

    for line in &confirmation.lines {
        writeln!(out, "  {}", line.text)?;

        if let Some(note) = &line.variant_note {
            writeln!(out, "    {note}")?;
        }
    }

    writeln!(out, "  Total: {}", confirmation.total)?;

    Ok(())
}
