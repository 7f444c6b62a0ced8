//! Stripe Checkout Sessions client.
//!
//! Sessions are created with a form-encoded `POST /v1/checkout/sessions`
//! authenticated by the secret key. Prices are sent inline as `price_data`,
//! so no catalog needs to exist on the Stripe side.

use std::time::Duration;

use async_trait::async_trait;
use bakery_core::checkout::{
    CheckoutSessionRequest, GatewayError, GatewaySession, PaymentGateway,
};
use serde::Deserialize;

/// Default API origin.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// HTTP request timeout for a single session request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// API origin without a trailing slash.
    pub api_base: String,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Stripe returned a non-2xx status.
    #[error("Stripe API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Parsed response body, or the raw text wrapped in a JSON string.
        body: serde_json::Value,
    },

    /// A 2xx response that did not carry a session id and URL.
    #[error("Unexpected Stripe response: {0}")]
    Malformed(String),
}

impl From<StripeError> for GatewayError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::Api { message, body, .. } => GatewayError::new(message, body),
            StripeError::Request(e) => {
                let message = e.to_string();
                let details = serde_json::json!({ "type": "request_error", "message": message });
                GatewayError::new(message, details)
            }
            StripeError::Malformed(body) => GatewayError::new(
                "Unexpected response from payment gateway",
                serde_json::Value::String(body),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Form encoding
// ---------------------------------------------------------------------------

/// Flatten a session request into Stripe's bracketed form fields.
pub fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        ("success_url".into(), request.success_url.clone()),
        ("cancel_url".into(), request.cancel_url.clone()),
        ("metadata[userId]".into(), request.client_reference.to_string()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        form.push((
            format!("{prefix}[price_data][currency]"),
            request.currency.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.label.clone(),
        ));
        if let Some(image) = &item.image {
            form.push((
                format!("{prefix}[price_data][product_data][images][0]"),
                image.clone(),
            ));
        }
    }

    form
}

/// Build the error for a non-2xx response body.
fn api_error(status: u16, text: &str) -> StripeError {
    let body: serde_json::Value = serde_json::from_str(text)
        .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
    let message = serde_json::from_str::<ErrorEnvelope>(text)
        .ok()
        .and_then(|env| env.error.message)
        .unwrap_or_else(|| format!("Payment gateway returned HTTP {status}"));
    StripeError::Api {
        status,
        message,
        body,
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// [`PaymentGateway`] backed by Stripe Checkout.
pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a hosted checkout session.
    pub async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, StripeError> {
        let response = self
            .client
            .post(self.config.sessions_url())
            .bearer_auth(&self.config.secret_key)
            .form(&session_form(request))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        let session: SessionResponse =
            serde_json::from_str(&text).map_err(|_| StripeError::Malformed(text.clone()))?;
        let url = session
            .url
            .ok_or_else(|| StripeError::Malformed(text.clone()))?;

        tracing::info!(
            session_id = %session.id,
            user_id = request.client_reference,
            amount = request.amount_minor(),
            "Checkout session created"
        );

        Ok(GatewaySession {
            id: session.id,
            url,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, GatewayError> {
        self.create_session(request).await.map_err(|e| {
            tracing::error!(error = ?e, "Stripe checkout session failed");
            GatewayError::from(e)
        })
    }
}
