//! Storefront
//!
//! Cart state, pricing and checkout-message derivation for a storefront that
//! hands orders off to WhatsApp. The cart is mirrored into durable key/value
//! storage after every mutation; checkout turns the current snapshot into an
//! order summary and a pre-filled hand-off link.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod formatting;
pub mod handoff;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod storage;

mod wire;
