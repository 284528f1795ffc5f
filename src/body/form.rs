//! Escaping of form-urlencoded bodies, and flattening of JSON into form pairs.

use crate::settings::FormParamEncodingStrategy;
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters that may not appear in a url. `%` is handled on its own.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub(crate) fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Escape what a url cannot carry, keeping delimiters such as `&`, `=` and `?`.
///
/// A `%` that already starts a `%XX` escape is kept, as is one followed by a
/// single hex digit at the very end; any other `%` becomes `%25`.
pub(crate) fn encode_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('%') {
        out.extend(utf8_percent_encode(&rest[..pos], URL_UNSAFE));
        rest = &rest[pos + 1..];
        if starts_escape(rest) {
            out.push('%');
        } else {
            out.push_str("%25");
        }
    }
    out.extend(utf8_percent_encode(rest, URL_UNSAFE));
    out
}

fn starts_escape(s: &str) -> bool {
    match s.as_bytes() {
        [a, b, ..] => a.is_ascii_hexdigit() && b.is_ascii_hexdigit(),
        [a] => a.is_ascii_hexdigit(),
        [] => false,
    }
}

pub(crate) fn encode_form_body(body: &str, strategy: FormParamEncodingStrategy) -> String {
    match strategy {
        FormParamEncodingStrategy::Never => body.to_owned(),
        FormParamEncodingStrategy::Always => body
            .split('&')
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                format!("{}={}", encode_component(name), encode_component(value))
            })
            .collect::<Vec<_>>()
            .join("&"),
        FormParamEncodingStrategy::Automatic => encode_url(body),
    }
}

/// Flatten a JSON document into `key[sub][]=value` pairs.
///
/// Object members nest as `[name]`, array items as `[]`; every composed key
/// and value is escaped.
pub(crate) fn json_to_form(raw: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let mut pairs = Vec::new();
    flatten(&value, &mut Vec::new(), &mut pairs);
    Ok(pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&"))
}

fn flatten<'v>(value: &'v Value, path: &mut Vec<&'v str>, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, member) in map {
                path.push(key);
                flatten(member, path, pairs);
                path.pop();
            }
        }
        Value::Array(items) => {
            for item in items {
                path.push("");
                flatten(item, path, pairs);
                path.pop();
            }
        }
        Value::String(s) => pairs.push((compose_key(path), s.clone())),
        Value::Number(n) => pairs.push((compose_key(path), number_text(n))),
        scalar => pairs.push((compose_key(path), scalar.to_string())),
    }
}

/// Whole-valued floats print without a fraction: `2.0` is `2`, `1e2` is `100`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_owned(),
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

fn compose_key(path: &[&str]) -> String {
    let mut segments = path.iter();
    let mut key = segments.next().map(|s| (*s).to_owned()).unwrap_or_default();
    for segment in segments {
        key.push('[');
        key.push_str(segment);
        key.push(']');
    }
    key
}
