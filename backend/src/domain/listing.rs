//! Store-agnostic listing queries.
//!
//! A [`ListingQuery`] is the conjunction of the filter conditions a caller
//! supplied, an optional single-field sort and a page window. Outbound
//! adapters translate it into their native query language; the in-memory
//! adapter evaluates it with [`ListingQuery::matches`].
//!
//! Raw query-string values are interpreted here so every adapter agrees on
//! the edge cases: blank parameters count as absent, `order` without `sort`
//! is ignored, and a zero or absent `limit` is unbounded.

use pagination::{PageRequest, PaginationError};
use serde_json::{Value, json};

use super::{Document, Error, RecordFilters};

/// One predicate over a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value exactly.
    Equals {
        /// Document field name.
        field: String,
        /// Expected JSON value.
        value: Value,
    },
    /// Field is a string containing `needle`, ignoring case.
    ContainsIgnoreCase {
        /// Document field name.
        field: String,
        /// Literal substring; never interpreted as a pattern.
        needle: String,
    },
}

impl Condition {
    /// Exact-match condition.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive substring condition.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::ContainsIgnoreCase {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Evaluate the condition against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Equals { field, value } => document.get(field) == Some(value),
            Self::ContainsIgnoreCase { field, needle } => document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}

/// Sort direction accepted by the `order` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Parse `asc`/`desc`, `ascending`/`descending` or `1`/`-1`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::SortDirection;
    ///
    /// assert_eq!(SortDirection::parse("DESC").unwrap(), SortDirection::Descending);
    /// assert!(SortDirection::parse("sideways").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ListingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(Self::Ascending),
            "desc" | "descending" | "-1" => Ok(Self::Descending),
            _ => Err(ListingError::InvalidSortOrder {
                value: raw.to_owned(),
            }),
        }
    }

    /// Numeric form used by document stores.
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Single-field sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    field: String,
    direction: SortDirection,
}

impl SortSpec {
    /// Validate a sort field.
    ///
    /// Field names starting with `$` are operators in document stores and are
    /// rejected.
    pub fn new(field: &str, direction: SortDirection) -> Result<Self, ListingError> {
        let trimmed = field.trim();
        if trimmed.is_empty() || trimmed.starts_with('$') {
            return Err(ListingError::InvalidSortField {
                field: field.to_owned(),
            });
        }
        Ok(Self {
            field: trimmed.to_owned(),
            direction,
        })
    }

    /// Field to sort on.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Requested direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Raw sort and pagination parameters shared by every listing route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOptions {
    /// Field to sort by.
    pub sort: Option<String>,
    /// Sort direction; ignored without `sort`.
    pub order: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Maximum documents per page.
    pub limit: Option<String>,
}

/// Errors raised while interpreting listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    /// Sort field was blank or an operator.
    #[error("invalid sort field '{field}'")]
    InvalidSortField {
        /// Raw sort value.
        field: String,
    },
    /// Sort order was not recognised.
    #[error("invalid sort order '{value}'; expected asc or desc")]
    InvalidSortOrder {
        /// Raw order value.
        value: String,
    },
    /// Page or limit was not a non-negative integer.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl ListingError {
    /// Query parameter responsible for the failure.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidSortField { .. } => "sort",
            Self::InvalidSortOrder { .. } => "order",
            Self::Pagination(err) => err.field(),
        }
    }
}

impl From<ListingError> for Error {
    fn from(err: ListingError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": err.parameter() }))
    }
}

/// Filter, sort and page description for one listing request.
///
/// # Examples
/// ```
/// use backend::domain::{Condition, ListingQuery};
/// use serde_json::json;
///
/// let query = ListingQuery::all().with_condition(Condition::contains("name", "REX"));
/// let doc = json!({ "name": "T-Rex" }).as_object().cloned().unwrap();
/// assert!(query.matches(&doc));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    conditions: Vec<Condition>,
    sort: Option<SortSpec>,
    page: PageRequest,
}

impl ListingQuery {
    /// Match every document, unsorted and unbounded.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from collection filters and raw listing options.
    ///
    /// # Errors
    /// Returns [`ListingError`] when sort, order, page or limit are invalid.
    pub fn build(
        filters: &impl RecordFilters,
        options: &ListingOptions,
    ) -> Result<Self, ListingError> {
        let mut query = Self {
            conditions: filters.conditions(),
            ..Self::default()
        };

        if let Some(field) = present(options.sort.as_deref()) {
            let direction = match present(options.order.as_deref()) {
                Some(order) => SortDirection::parse(order)?,
                None => SortDirection::default(),
            };
            query.sort = Some(SortSpec::new(field, direction)?);
        }

        query.page = PageRequest::from_raw(options.page.as_deref(), options.limit.as_deref())?;
        Ok(query)
    }

    /// Add a condition to the conjunction.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Replace the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Replace the page window.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Conditions, all of which must hold.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Requested sort, if any.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Requested page window.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Whether `document` satisfies every condition.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| condition.matches(document))
    }
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
