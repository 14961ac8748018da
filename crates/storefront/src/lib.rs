//! ShopEase storefront library.
//!
//! Catalog client, durable cart store, product cards with optimistic stock
//! reservation, and the text views that render them. The `shopease` binary
//! drives this crate; integration tests exercise it against a mock catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod views;
