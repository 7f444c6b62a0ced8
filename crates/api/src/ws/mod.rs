//! WebSocket feed of the signed-in user's cart.

pub mod cart;

pub use cart::{cart_ws_handler, run_cart_feed};
