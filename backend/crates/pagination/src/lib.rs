//! Page and limit pagination primitives for listing endpoints.
//!
//! Listing endpoints accept 1-based `page` and `limit` query parameters. A
//! [`PageRequest`] turns those raw values into the `skip`/`limit` pair a
//! document store understands:
//!
//! - `skip` is `(page - 1) * limit` when `page > 0`, otherwise zero.
//! - a `limit` of zero (or an absent limit) means "no limit".
//!
//! # Examples
//! ```
//! use pagination::PageRequest;
//!
//! let page = PageRequest::new(2, 10);
//! assert_eq!(page.skip(), 10);
//! assert_eq!(page.limit(), Some(10));
//! ```

use std::fmt;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The parameter was present but is not a non-negative integer.
    #[error("{field} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Name of the offending query parameter.
        field: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
}

impl PaginationError {
    /// Name of the query parameter that failed to parse.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidNumber { field, .. } => field,
        }
    }
}

/// Requested page of a listing.
///
/// ## Invariants
/// - `page` is 1-based; zero means "first page".
/// - `limit` of zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a page request from already-parsed values.
    #[must_use]
    pub const fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// A request that returns every matching document.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { page: 0, limit: 0 }
    }

    /// Parse optional raw query values.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidNumber`] when a present value is not
    /// a non-negative integer.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let page = PageRequest::from_raw(Some("3"), Some("5")).unwrap();
    /// assert_eq!(page.skip(), 10);
    /// assert!(PageRequest::from_raw(Some("-1"), None).is_err());
    /// ```
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        Ok(Self {
            page: parse_field("page", page)?,
            limit: parse_field("limit", limit)?,
        })
    }

    /// 1-based page number; zero when unset.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Maximum number of documents to return, if bounded.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        if self.limit == 0 {
            None
        } else {
            Some(self.limit)
        }
    }

    /// Number of matching documents to skip before the page starts.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        if self.page > 0 {
            (self.page - 1).saturating_mul(self.limit)
        } else {
            0
        }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page={} limit={}", self.page, self.limit)
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<u64, PaginationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| PaginationError::InvalidNumber {
                field,
                value: value.to_owned(),
            }),
    }
}
