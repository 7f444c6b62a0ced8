use std::fmt::Debug;
use std::str::FromStr;

use bakery_core::account::DEFAULT_EMAIL_DOMAIN;
use bakery_payments::stripe::{StripeConfig, DEFAULT_API_BASE};

use crate::auth::jwt::JwtConfig;

/// Default ISO currency for hosted checkout sessions.
pub const DEFAULT_CHECKOUT_CURRENCY: &str = "inr";

/// Storefront server configuration.
///
/// Only `JWT_SECRET` is required; everything else falls back to local
/// development values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Storefront origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on connection draining after a shutdown signal. Open cart
    /// sockets never finish on their own, so this is what ends them.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Lowercase ISO code sent to the payment gateway.
    pub checkout_currency: String,
    /// Domain for phone-derived identity emails.
    pub email_domain: String,
    pub stripe: StripeConfig,
}

/// Read `key`, or `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e:?}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `3000`                   |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                     |
    /// | `CHECKOUT_CURRENCY`      | `inr`                    |
    /// | `SYNTHETIC_EMAIL_DOMAIN` | `bakingtales.com`        |
    /// | `STRIPE_SECRET_KEY`      | empty                    |
    /// | `STRIPE_API_BASE`        | `https://api.stripe.com` |
    ///
    /// Session token settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let checkout_currency = env_or("CHECKOUT_CURRENCY", String::new()).to_lowercase();
        let checkout_currency = if checkout_currency.is_empty() {
            DEFAULT_CHECKOUT_CURRENCY.to_string()
        } else {
            checkout_currency
        };

        let mut stripe = StripeConfig::new(env_or("STRIPE_SECRET_KEY", String::new()));
        stripe.api_base = env_or("STRIPE_API_BASE", DEFAULT_API_BASE.to_string());

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            checkout_currency,
            email_domain: env_or("SYNTHETIC_EMAIL_DOMAIN", DEFAULT_EMAIL_DOMAIN.to_string()),
            stripe,
        }
    }
}
