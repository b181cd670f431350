//! Products

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    pricing::{discount_from_points, effective_unit_price},
    wire::{deserialize_amount, deserialize_id},
};

/// A purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    /// Variant color
    pub color: String,

    /// Variant size
    pub size: String,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Image overriding the product image
    #[serde(default)]
    pub image: Option<String>,
}

/// Catalog product record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product id
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Product name
    pub name: String,

    /// Category key, e.g. `calzado`
    #[serde(default)]
    pub category: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Base price
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub price: Decimal,

    /// Discount in percent points
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub discount: Decimal,

    /// Main image
    #[serde(default)]
    pub image: Option<String>,

    /// Gallery images
    #[serde(default)]
    pub images: Vec<String>,

    /// Purchasable variants
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Whether a positive discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    /// Price after discount. Falls back to the base price on overflow.
    pub fn final_price(&self) -> Decimal {
        effective_unit_price(self.price, discount_from_points(self.discount)).unwrap_or(self.price)
    }

    /// First gallery image, or the main image.
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().or(self.image.as_ref()).map(String::as_str)
    }

    /// Stock summed over every variant.
    pub fn total_stock(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.stock)).sum()
    }

    /// No variant has stock left.
    pub fn is_sold_out(&self) -> bool {
        self.total_stock() == 0
    }

    /// Find the variant with the given color and size.
    pub fn variant(&self, color: &str, size: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.color == color && v.size == size)
    }

    /// Variants grouped by color, colors in first-seen order.
    pub fn variants_by_color(&self) -> Vec<(&str, Vec<&Variant>)> {
        let mut groups: Vec<(&str, Vec<&Variant>)> = Vec::new();

        for variant in &self.variants {
            match groups.iter_mut().find(|(color, _)| *color == variant.color) {
                Some((_, members)) => members.push(variant),
                None => groups.push((variant.color.as_str(), vec![variant])),
            }
        }

        groups
    }

    /// Image shown for a variant: its own, else the product's main image.
    pub fn image_for<'a>(&'a self, variant: &'a Variant) -> Option<&'a str> {
        variant.image.as_deref().or(self.image.as_deref())
    }
}
