//! ShopEase Core - Shared domain types.
//!
//! This crate provides the types used across all ShopEase components:
//! - `storefront` - Catalog client, cart store, product cards and views
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart logic - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere (and tested without a runtime).
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog products and the cart model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
