//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CART_STORAGE_KEY, CartLine, CartStore, LineVariant},
    catalog::{Catalog, CatalogError, Product, Variant, add_to_cart, availability, line_id},
    checkout::{
        Checkout, CheckoutError, CheckoutSettings, HandOff, Notice, NoticeLevel, Notifier,
    },
    formatting::PriceFormatter,
    handoff::{HandOffLink, Platform},
    order::{Confirmation, OrderError, OrderMessage, OrderMessageBuilder, OrderSummary},
    pricing::PricingError,
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
};
