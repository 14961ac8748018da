//! Command implementations.
//!
//! Each command writes its rendered output to the given writer.

pub mod cart;
pub mod products;
