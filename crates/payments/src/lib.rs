//! Hosted checkout gateway client.
//!
//! [`StripeGateway`] implements [`bakery_core::checkout::PaymentGateway`]
//! against the Stripe Checkout Sessions REST API.

pub mod stripe;

pub use stripe::{StripeConfig, StripeError, StripeGateway};
