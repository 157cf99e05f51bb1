//! Payment intent amounts and currencies.

use std::fmt;

/// Validation errors for payment intent requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentValidationError {
    /// Price was not a finite number.
    #[error("price must be a finite number")]
    NotFinite,
    /// Price rounded to zero or less minor units.
    #[error("price must be greater than zero, got {price}")]
    NotPositive {
        /// Raw price supplied by the client.
        price: f64,
    },
    /// Price does not fit in minor units.
    #[error("price {price} is too large")]
    TooLarge {
        /// Raw price supplied by the client.
        price: f64,
    },
    /// Currency was not a three-letter code.
    #[error("currency must be a three-letter ISO code, got '{value}'")]
    InvalidCurrency {
        /// Raw currency supplied by the client.
        value: String,
    },
}

/// Lower-case ISO 4217 currency code.
///
/// # Examples
/// ```
/// use backend::domain::Currency;
///
/// assert_eq!(Currency::new("EUR").unwrap().as_str(), "eur");
/// assert!(Currency::new("euro").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency(String);

impl Currency {
    /// Validate and lower-case a currency code.
    pub fn new(raw: &str) -> Result<Self, PaymentValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(PaymentValidationError::InvalidCurrency {
                value: raw.to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self("usd".to_owned())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated request to open a card payment.
///
/// ## Invariants
/// - `amount_minor` is positive and equals `round(price * 100)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    amount_minor: u64,
    currency: Currency,
}

impl PaymentIntentRequest {
    /// Convert a major-unit price into a minor-unit request.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PaymentIntentRequest;
    ///
    /// let request = PaymentIntentRequest::from_price(19.99, Some("gbp")).unwrap();
    /// assert_eq!(request.amount_minor(), 1999);
    /// assert_eq!(request.currency().as_str(), "gbp");
    /// ```
    pub fn from_price(price: f64, currency: Option<&str>) -> Result<Self, PaymentValidationError> {
        if !price.is_finite() {
            return Err(PaymentValidationError::NotFinite);
        }
        let minor = (price * 100.0).round();
        if minor < 1.0 {
            return Err(PaymentValidationError::NotPositive { price });
        }
        if minor > u64::MAX as f64 {
            return Err(PaymentValidationError::TooLarge { price });
        }
        let currency = match currency.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Currency::new(code)?,
            None => Currency::default(),
        };
        Ok(Self {
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "value is rounded, positive and bounded above"
            )]
            amount_minor: minor as u64,
            currency,
        })
    }

    /// Amount in minor currency units.
    pub fn amount_minor(&self) -> u64 {
        self.amount_minor
    }

    /// Settlement currency.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, 1000)]
    #[case(0.01, 1)]
    #[case(19.999, 2000)]
    #[case(0.005, 1)]
    fn converts_to_minor_units(#[case] price: f64, #[case] expected: u64) {
        let request = PaymentIntentRequest::from_price(price, None).expect("valid price");
        assert_eq!(request.amount_minor(), expected);
        assert_eq!(request.currency().as_str(), "usd");
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(0.004)]
    fn rejects_non_positive_amounts(#[case] price: f64) {
        let err = PaymentIntentRequest::from_price(price, None).expect_err("invalid price");
        assert!(matches!(err, PaymentValidationError::NotPositive { .. }));
    }

    #[test]
    fn rejects_non_finite_prices() {
        let err = PaymentIntentRequest::from_price(f64::NAN, None).expect_err("NaN price");
        assert_eq!(err, PaymentValidationError::NotFinite);
    }

    #[rstest]
    #[case("us")]
    #[case("usd1")]
    #[case("u$d")]
    fn rejects_malformed_currencies(#[case] raw: &str) {
        assert!(PaymentIntentRequest::from_price(1.0, Some(raw)).is_err());
    }

    #[test]
    fn blank_currency_defaults_to_usd() {
        let request = PaymentIntentRequest::from_price(1.0, Some(" ")).expect("valid");
        assert_eq!(request.currency(), &Currency::default());
    }
}
