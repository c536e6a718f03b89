//! Page/limit pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept a one-based `page` and a `limit` and answer with
//! the requested slice plus the total row count. This crate owns the request
//! parsing rules and the response envelopes so every endpoint reports the
//! same shape:
//!
//! ```json
//! { "message": "...", "data": [], "limit": 10, "page": 1, "total": 0 }
//! ```

mod envelope;
mod request;

pub use envelope::{ListEnvelope, Page};
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest};
