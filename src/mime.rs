//! Content-type classification.
//!
//! Only the media type matters here: parameters such as `boundary=` or
//! `charset=` are dropped before comparing, and the comparison ignores case.

pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Marker type that asks for the JSON body to be flattened into form pairs.
pub const FORM_URL_ENCODED_JSON: &str = "application/x-www-form-urlencoded+json";

fn media_type(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(essence, _)| essence)
        .trim()
}

pub fn is_multipart_form_data(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| media_type(ct).eq_ignore_ascii_case(MULTIPART_FORM_DATA))
}

pub fn is_form_url_encoded(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| media_type(ct).eq_ignore_ascii_case(FORM_URL_ENCODED))
}
