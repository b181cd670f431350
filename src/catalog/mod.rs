//! Catalog
//!
//! Read-only product records plus the glue between a product selection and
//! the cart: line identity, live availability and the final stock check.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{CartLine, CartStore, LineVariant},
    storage::CartStorage,
};

mod product;

pub use product::{Product, Variant};

/// Catalog loading and selection errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found.
    #[error("product {product} has no variant {color}/{size}")]
    VariantNotFound {
        /// Product id
        product: String,
        /// Requested color
        color: String,
        /// Requested size
        size: String,
    },

    /// Nothing left to add for this variant.
    #[error("variant {0} is sold out")]
    SoldOut(String),
}

/// Catalog documents are either a bare list or `{ products: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl From<CatalogDocument> for Vec<Product> {
    fn from(document: CatalogDocument) -> Self {
        match document {
            CatalogDocument::List(products) | CatalogDocument::Wrapped { products } => products,
        }
    }
}

/// Read-only product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from products.
    pub fn new(products: impl Into<Vec<Product>>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// Parse a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the document is malformed.
    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(contents)?;

        Ok(Self::new(Vec::from(document)))
    }

    /// Parse a YAML catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] if the document is malformed.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_norway::from_str(contents)?;

        Ok(Self::new(Vec::from(document)))
    }

    /// Load a catalog file; `.yml`/`.yaml` files are read as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

        let catalog = if is_yaml {
            Self::from_yaml_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };

        debug!(path = %path.display(), products = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&Product>)> {
        let mut groups: Vec<(&str, Vec<&Product>)> = Vec::new();

        for product in &self.products {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == product.category)
            {
                Some((_, members)) => members.push(product),
                None => groups.push((product.category.as_str(), vec![product])),
            }
        }

        groups
    }

    /// Resolve a product and one of its variants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] or [`CatalogError::VariantNotFound`].
    pub fn find_variant(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
    ) -> Result<(&Product, &Variant), CatalogError> {
        let product = self
            .get(product_id)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        let variant =
            product
                .variant(color, size)
                .ok_or_else(|| CatalogError::VariantNotFound {
                    product: product_id.to_string(),
                    color: color.to_string(),
                    size: size.to_string(),
                })?;

        Ok((product, variant))
    }
}

/// Display name for a category key.
pub fn category_name(key: &str) -> &str {
    match key {
        "all" => "Todos los productos",
        "calzado" => "Calzado",
        "ropa" => "Ropa",
        "accesorios" => "Accesorios",
        "tecnologia" => "Tecnología",
        "deporte" => "Deporte",
        other => other,
    }
}

/// Cart line id for a product variant.
pub fn line_id(product: &Product, variant: &Variant) -> String {
    format!("{}-{}-{}", product.id, variant.color, variant.size)
}

/// Units of `variant` still available given what the cart already holds.
///
/// Recomputed on every call and never persisted.
pub fn availability<S: CartStorage>(
    cart: &CartStore<S>,
    product: &Product,
    variant: &Variant,
) -> u32 {
    variant
        .stock
        .saturating_sub(cart.quantity_of(&line_id(product, variant)))
}

/// Build the cart line for one unit of `variant`.
pub fn cart_line(product: &Product, variant: &Variant) -> CartLine {
    let line = CartLine::new(
        line_id(product, variant),
        product.id.clone(),
        format!("{} ({}, {})", product.name, variant.color, variant.size),
        product.price,
    )
    .with_discount_percent(product.discount)
    .with_variant(LineVariant::new(
        variant.color.clone(),
        variant.size.clone(),
        variant.stock,
    ));

    match product.image_for(variant) {
        Some(image) => line.with_image(image),
        None => line,
    }
}

/// Add one unit of `variant` to the cart after a final stock check.
///
/// # Errors
///
/// Returns [`CatalogError::SoldOut`] if no units remain; the cart is untouched.
pub fn add_to_cart<S: CartStorage>(
    cart: &mut CartStore<S>,
    product: &Product,
    variant: &Variant,
) -> Result<(), CatalogError> {
    let id = line_id(product, variant);

    if availability(cart, product, variant) == 0 {
        warn!(id, "variant sold out, not adding to cart");
        return Err(CatalogError::SoldOut(id));
    }

    cart.add(cart_line(product, variant));

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    const CATALOG: &str = r#"[
        {
            "id": 1,
            "name": "Zapatilla Urbana",
            "category": "calzado",
            "description": "Suela de goma",
            "price": 200,
            "discount": 10,
            "image": "img/1.jpg",
            "variants": [
                {"color": "Negro", "size": "42", "stock": 2, "image": "img/1-negro.jpg"},
                {"color": "Blanco", "size": "41", "stock": 0}
            ]
        },
        {
            "id": 2,
            "name": "Polo Básico",
            "category": "ropa",
            "price": 39.9,
            "variants": [{"color": "Rojo", "size": "M", "stock": 5}]
        },
        {
            "id": 3,
            "name": "Botín",
            "category": "calzado",
            "price": 150,
            "discount": null,
            "variants": []
        }
    ]"#;

    fn catalog() -> TestResult<Catalog> {
        Ok(Catalog::from_json_str(CATALOG)?)
    }

    #[test]
    fn parses_json_list() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("2").map(|p| p.price), Some(Decimal::new(399, 1)));
        assert_eq!(catalog.get("3").map(|p| p.discount), Some(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn parses_wrapped_yaml() -> TestResult {
        let yaml = "products:\n  - id: gorra\n    name: Gorra\n    price: 25\n    variants:\n      - color: Azul\n        size: U\n        stock: 3\n";

        let catalog = Catalog::from_yaml_str(yaml)?;

        assert_eq!(catalog.get("gorra").map(Product::total_stock), Some(3));

        Ok(())
    }

    #[test]
    fn null_amounts_parse_in_both_formats() -> TestResult {
        let json = Catalog::from_json_str(
            r#"{"products": [{"id": "a", "name": "x", "price": 1.5, "discount": null}]}"#,
        )?;
        let yaml = Catalog::from_yaml_str("- id: b\n  name: y\n  price: ~\n  discount: null\n")?;

        assert_eq!(json.get("a").map(|p| p.discount), Some(Decimal::ZERO));
        assert_eq!(json.get("a").map(|p| p.price), Some(Decimal::new(15, 1)));
        assert_eq!(yaml.get("b").map(|p| p.price), Some(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn groups_by_category() -> TestResult {
        let catalog = catalog()?;

        let groups: Vec<(&str, usize)> = catalog
            .by_category()
            .iter()
            .map(|(category, products)| (*category, products.len()))
            .collect();

        assert_eq!(groups, [("calzado", 2), ("ropa", 1)]);

        Ok(())
    }

    #[test]
    fn category_names() {
        assert_eq!(category_name("tecnologia"), "Tecnología");
        assert_eq!(category_name("otros"), "otros");
    }

    #[test]
    fn cart_line_from_selection() -> TestResult {
        let catalog = catalog()?;
        let (product, variant) = catalog.find_variant("1", "Negro", "42")?;

        let line = cart_line(product, variant);

        assert_eq!(line.id(), "1-Negro-42");
        assert_eq!(line.product_id(), "1");
        assert_eq!(line.name(), "Zapatilla Urbana (Negro, 42)");
        assert_eq!(line.discount_percent(), Decimal::TEN);
        assert_eq!(line.image_ref(), Some("img/1-negro.jpg"));
        assert_eq!(line.variant(), Some(&LineVariant::new("Negro", "42", 2)));

        Ok(())
    }

    #[test]
    fn find_variant_errors() -> TestResult {
        let catalog = catalog()?;

        assert!(matches!(
            catalog.find_variant("99", "Negro", "42"),
            Err(CatalogError::ProductNotFound(_))
        ));
        assert!(matches!(
            catalog.find_variant("1", "Verde", "42"),
            Err(CatalogError::VariantNotFound { .. })
        ));

        Ok(())
    }

    #[test]
    fn availability_tracks_cart_quantity() -> TestResult {
        let catalog = catalog()?;
        let (product, variant) = catalog.find_variant("1", "Negro", "42")?;
        let mut cart = CartStore::new(MemoryStorage::new());

        assert_eq!(availability(&cart, product, variant), 2);

        add_to_cart(&mut cart, product, variant)?;
        assert_eq!(availability(&cart, product, variant), 1);

        add_to_cart(&mut cart, product, variant)?;
        assert_eq!(availability(&cart, product, variant), 0);
        assert_eq!(cart.quantity_of("1-Negro-42"), 2);

        assert!(matches!(
            add_to_cart(&mut cart, product, variant),
            Err(CatalogError::SoldOut(id)) if id == "1-Negro-42"
        ));
        assert_eq!(cart.quantity_of("1-Negro-42"), 2);

        Ok(())
    }

    #[test]
    fn zero_stock_variant_cannot_be_added() -> TestResult {
        let catalog = catalog()?;
        let (product, variant) = catalog.find_variant("1", "Blanco", "41")?;
        let mut cart = CartStore::new(MemoryStorage::new());

        assert!(add_to_cart(&mut cart, product, variant).is_err());
        assert!(cart.is_empty());

        Ok(())
    }
}
