//! Storefront domain types and pure logic.
//!
//! Everything here is free of I/O except the async store and gateway traits
//! that the db and payments crates implement.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod orders;
pub mod roles;
pub mod store;
pub mod types;
pub mod wishlist;
