//! Row structs and DTOs.
//!
//! Each submodule holds a `FromRow` entity matching the table and the
//! `Deserialize` DTOs used for inserts and updates.

pub mod cart;
pub mod dashboard;
pub mod order;
pub mod product;
pub mod profile;
pub mod user;
pub mod wishlist;
