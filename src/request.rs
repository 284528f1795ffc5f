use crate::body::BodySource;
use crate::http::Headers;
use serde::Serialize;

/// A parsed request, ready to be handed to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: BodySource,
    /// Body lines as written, before any upload splicing or form transform.
    pub raw_body: String,
}
