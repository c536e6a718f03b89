//! Page request parsing and offset arithmetic.

use serde::Serialize;

/// Page number used when the caller omits or mangles `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller omits or mangles `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// One-based page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::from_query(Some("3"), Some("20"));
/// assert_eq!(request.page(), 3);
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping zero values up to one.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            limit: if limit == 0 { 1 } else { limit },
        }
    }

    /// Parse raw query values leniently.
    ///
    /// Missing, non-numeric, and non-positive values fall back to
    /// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`] instead of failing the request.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64)
            .saturating_sub(1)
            .saturating_mul(self.limit as u64)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
}
