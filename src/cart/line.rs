//! Cart Lines

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    pricing::discount_from_points,
    wire::{deserialize_amount, deserialize_id},
};

/// Variant details captured when the line was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineVariant {
    /// Variant color
    pub color: String,

    /// Variant size
    pub size: String,

    /// Stock count at selection time. Informational only.
    #[serde(default)]
    pub stock: u32,
}

impl LineVariant {
    /// Create a new variant snapshot.
    pub fn new(color: impl Into<String>, size: impl Into<String>, stock: u32) -> Self {
        Self {
            color: color.into(),
            size: size.into(),
            stock,
        }
    }

    /// Display suffix, e.g. `(Negro, 42)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({}, {})", self.color, self.size)
    }
}

/// One purchasable selection at a specific variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default, deserialize_with = "deserialize_id")]
    id: String,

    #[serde(default, deserialize_with = "deserialize_id")]
    product_id: String,

    #[serde(default)]
    name: String,

    #[serde(
        rename = "price",
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_amount"
    )]
    unit_price: Decimal,

    #[serde(
        rename = "discount",
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_amount"
    )]
    discount_percent: Decimal,

    #[serde(default = "default_quantity")]
    quantity: u32,

    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant: Option<LineVariant>,
}

fn default_quantity() -> u32 {
    1
}

impl CartLine {
    /// Create a new line with a quantity of one and no discount.
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            discount_percent: Decimal::ZERO,
            quantity: 1,
            image_ref: None,
            variant: None,
        }
    }

    /// Set the quantity. Zero is read as "unspecified" and becomes one.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the discount in percent points, clamped to `[0, 100]`.
    #[must_use]
    pub fn with_discount_percent(mut self, points: Decimal) -> Self {
        self.discount_percent = points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Set the variant snapshot.
    #[must_use]
    pub fn with_variant(mut self, variant: LineVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Identity key of the line.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Catalog product this line was built from.
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Undiscounted price of one unit.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Discount in percent points.
    #[must_use]
    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    /// Discount as a fractional percentage.
    #[must_use]
    pub fn discount(&self) -> Percentage {
        discount_from_points(self.discount_percent)
    }

    /// Number of units.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Image reference, display only.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Variant snapshot, if the line was selected at a variant.
    #[must_use]
    pub fn variant(&self) -> Option<&LineVariant> {
        self.variant.as_ref()
    }

    pub(crate) fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub(crate) fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Bring a record back inside the line invariants: a zero quantity
    /// becomes one and the discount is clamped to `[0, 100]`.
    pub(crate) fn normalized(mut self) -> Self {
        self.quantity = self.quantity.max(1);
        self.discount_percent = self
            .discount_percent
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        self
    }
}
