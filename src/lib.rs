#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! Parser for plain-text HTTP request documents.
//!
//! A document holds one request: a request line, optional headers and an
//! optional body, separated by blank lines. [`RequestParser`] turns it into an
//! [`HttpRequest`] without doing any network I/O; files referenced from the
//! body are only checked for existence and are read later through
//! [`BodySource::reader`].

mod body;
mod error;
mod http;
pub mod mime;
mod notify;
mod request;
mod request_parser;
mod settings;

pub use body::{BodyReader, BodySegment, BodySource};
pub use error::ParseError;
pub use http::{DefaultHeaderParser, HeaderIter, HeaderParser, Headers};
pub use notify::{Notifier, TracingNotifier};
pub use request::HttpRequest;
pub use request_parser::{RequestParser, parse_http_request};
pub use settings::{
    DEFAULT_MAX_BODY_STREAM_SIZE, FormParamEncodingStrategy, LineEnding, ParserSettings,
};
