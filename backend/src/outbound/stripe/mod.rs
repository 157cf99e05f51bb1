//! Reqwest-backed Stripe payment gateway.
//!
//! This adapter owns transport details only: form encoding, bearer
//! authentication, timeout and status mapping, and decoding the client
//! secret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::error;
use zeroize::Zeroizing;

use crate::domain::PaymentIntentRequest;
use crate::domain::ports::{PaymentGateway, PaymentGatewayError, PaymentIntent};

/// Default provider base URL.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
/// Default request timeout.
pub const DEFAULT_STRIPE_TIMEOUT: Duration = Duration::from_secs(10);

const PAYMENT_INTENTS_PATH: &str = "v1/payment_intents";

/// Errors raised while building the gateway.
#[derive(Debug, thiserror::Error)]
pub enum StripeGatewayBuildError {
    /// The base URL could not be joined with the endpoint path.
    #[error("invalid Stripe API base: {0}")]
    InvalidBase(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct PaymentIntentDto {
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeDto {
    error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    message: Option<String>,
}

/// Gateway posting payment intents to Stripe.
pub struct StripePaymentGateway {
    client: Client,
    endpoint: Url,
    secret_key: Zeroizing<String>,
}

impl StripePaymentGateway {
    /// Build a gateway for `base` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URL is invalid or the reqwest client
    /// cannot be constructed.
    pub fn new(
        base: &Url,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StripeGatewayBuildError> {
        let endpoint = payment_intents_endpoint(base)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            secret_key: Zeroizing::new(secret_key.into()),
        })
    }
}

impl std::fmt::Debug for StripePaymentGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripePaymentGateway")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.secret_key.as_str())
            .form(&intent_form(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let err = map_status_error(status, body.as_ref());
            error!(status = status.as_u16(), error = %err, "payment intent creation failed");
            return Err(err);
        }

        parse_intent(body.as_ref())
    }
}

fn payment_intents_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(PAYMENT_INTENTS_PATH)
}

fn intent_form(request: &PaymentIntentRequest) -> [(&'static str, String); 3] {
    [
        ("amount", request.amount_minor().to_string()),
        ("currency", request.currency().as_str().to_owned()),
        ("payment_method_types[]", "card".to_owned()),
    ]
}

fn parse_intent(body: &[u8]) -> Result<PaymentIntent, PaymentGatewayError> {
    let decoded: PaymentIntentDto = serde_json::from_slice(body).map_err(|err| {
        PaymentGatewayError::transport(format!("invalid payment intent payload: {err}"))
    })?;
    Ok(PaymentIntent {
        client_secret: decoded.client_secret,
    })
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let detail = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::rejected(message),
        _ => PaymentGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests;
