//! Shopping cart module.
//!
//! Contains the cart value, its lines, and the store that owns and persists it.

mod cart;
mod line;
mod store;

pub use cart::Cart;
pub use line::CartLine;
pub use store::{CartSnapshot, CartStore, CartStoreBuilder, Outcome, DEFAULT_CART_KEY};
