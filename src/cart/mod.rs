//! Cart

mod line;
mod store;

pub use line::{CartLine, LineVariant};
pub use store::{CART_STORAGE_KEY, CartStore, decode_lines};
