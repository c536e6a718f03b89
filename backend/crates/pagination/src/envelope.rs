//! Response envelopes for paginated listings.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Rows available across all pages.
    pub total: u64,
    /// One-based page number echoed from the request.
    pub page: u32,
    /// Page size echoed from the request.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Assemble a page for the given request.
    #[must_use]
    pub const fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    /// Convert every row, keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Listing response carrying a human readable message beside the page.
///
/// Serialises flat: `{message, data, total, page, limit}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// Outcome message shown to API consumers.
    pub message: String,
    /// Paged rows and metadata.
    #[serde(flatten)]
    pub page: Page<T>,
}

impl<T> ListEnvelope<T> {
    /// Wrap a page with a message.
    #[must_use]
    pub fn new(message: impl Into<String>, page: Page<T>) -> Self {
        Self {
            message: message.into(),
            page,
        }
    }
}
