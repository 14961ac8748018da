//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - The shared cart store (mutations, persistence, clear-with-release)
//! - `card` - Product cards and the optimistic stock reservation flow

pub mod card;
pub mod cart;

pub use card::{AddOutcome, Blocked, CardError, CardState, ProductCard};
pub use cart::{CartStore, ClearReport};
