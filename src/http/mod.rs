//! Request-line, header and url handling.
//!
//! This module splits a request-text document into its request line, header
//! block and body block, and resolves path-only urls against the `Host` header.

mod headers;
pub(crate) mod parser;
mod url;

pub use headers::{DefaultHeaderParser, HeaderIter, HeaderParser, Headers};
pub(crate) use url::resolve_url;
