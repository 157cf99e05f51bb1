//! Driven port for the card payment provider.

use async_trait::async_trait;

use crate::domain::{Error, PaymentIntentRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment provider adapters.
    pub enum PaymentGatewayError {
        /// The provider rejected the request (4xx).
        Rejected { message: String } => "payment provider rejected request: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } => "payment provider timed out: {message}",
        /// Transport failure or unexpected provider response.
        Transport { message: String } => "payment provider request failed: {message}",
    }
}

impl From<PaymentGatewayError> for Error {
    fn from(err: PaymentGatewayError) -> Self {
        match err {
            PaymentGatewayError::Rejected { message } => Error::invalid_request(message),
            PaymentGatewayError::Timeout { message } => Error::service_unavailable(message),
            PaymentGatewayError::Transport { message } => Error::internal(message),
        }
    }
}

/// Payment intent created by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Secret the browser uses to confirm the payment.
    pub client_secret: String,
}

/// Port for creating payment intents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a card payment intent for the given amount.
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError>;
}

/// Gateway returning deterministic secrets without network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        Ok(PaymentIntent {
            client_secret: format!(
                "pi_fixture_{}_{}_secret",
                request.amount_minor(),
                request.currency()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(PaymentGatewayError::rejected("amount too small"), ErrorCode::InvalidRequest)]
    #[case(PaymentGatewayError::timeout("10s elapsed"), ErrorCode::ServiceUnavailable)]
    #[case(PaymentGatewayError::transport("connection reset"), ErrorCode::InternalError)]
    fn provider_failures_map_to_error_codes(
        #[case] err: PaymentGatewayError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(Error::from(err).code(), expected);
    }

    #[tokio::test]
    async fn fixture_gateway_embeds_amount_and_currency() {
        let request = PaymentIntentRequest::from_price(12.5, None).expect("valid price");
        let intent = FixturePaymentGateway
            .create_intent(&request)
            .await
            .expect("fixture succeeds");
        assert_eq!(intent.client_secret, "pi_fixture_1250_usd_secret");
    }
}
