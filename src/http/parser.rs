//! Line-level parsing of request-text documents.
//!
//! A document is a request line, optionally followed by a header block and a
//! body block. Blocks are separated by blank lines, where a blank line is one
//! that is empty or holds only whitespace.

use core::ops::Range;
use regex::Regex;
use std::sync::OnceLock;

pub(crate) const DEFAULT_METHOD: &str = "GET";

fn http_version() -> &'static Regex {
    static HTTP_VERSION: OnceLock<Regex> = OnceLock::new();
    HTTP_VERSION
        .get_or_init(|| Regex::new(r"(?i)^HTTP/\S*$").expect("http version pattern is valid"))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split the document on `line_ending` and drop leading and trailing blank lines.
///
/// Whitespace inside the kept lines is left alone.
pub(crate) fn normalize_lines<'a>(text: &'a str, line_ending: &str) -> Vec<&'a str> {
    let lines: Vec<&str> = text.split(line_ending).collect();
    let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !is_blank(l))
        .map_or(start, |last| last + 1);
    lines[start..end].to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub(crate) method: String,
    pub(crate) url: String,
}

/// Parse `[METHOD] URL [HTTP/version]`.
///
/// The url is cut out of the original line rather than rebuilt from tokens, so
/// whitespace inside it survives.
pub(crate) fn parse_request_line(line: &str) -> RequestLine {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [method, .., last] => {
            let mut url = line.trim().strip_prefix(*method).unwrap_or_default().trim();
            if http_version().is_match(last)
                && let Some(pos) = url.rfind(*last)
            {
                url = url[..pos].trim();
            }
            RequestLine {
                method: (*method).to_owned(),
                url: url.to_owned(),
            }
        }
        _ => RequestLine {
            method: DEFAULT_METHOD.to_owned(),
            url: line.trim().to_owned(),
        },
    }
}

/// What directly follows the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Section {
    /// The request line stands alone.
    RequestLineOnly,
    /// Lines right under the request line, up to the next blank line.
    Headers(Range<usize>),
    /// A blank line follows the request line, so there are no headers and
    /// the next block is the body.
    Body(Range<usize>),
}

pub(crate) fn first_section(lines: &[&str]) -> Section {
    match first_non_blank(lines, 1) {
        None => Section::RequestLineOnly,
        Some(1) => Section::Headers(1..block_end(lines, 1)),
        Some(start) => Section::Body(start..block_end(lines, start)),
    }
}

/// Locate the body that follows a header block ending at `header_end`.
///
/// With `runs_to_end` the body swallows blank lines and stops only at the end
/// of the document.
pub(crate) fn body_after_headers(
    lines: &[&str],
    header_end: usize,
    runs_to_end: bool,
) -> Option<Range<usize>> {
    let start = first_non_blank(lines, header_end)?;
    let end = if runs_to_end {
        lines.len()
    } else {
        block_end(lines, start)
    };
    Some(start..end)
}

/// Split the leading `?`/`&` lines off a header block.
///
/// Returns their trimmed text concatenated, and the remaining header lines.
pub(crate) fn split_query_continuation<'a, 'b>(block: &'b [&'a str]) -> (String, &'b [&'a str]) {
    let count = block
        .iter()
        .take_while(|l| l.trim_start().starts_with(['?', '&']))
        .count();
    let query = block[..count].iter().map(|l| l.trim()).collect::<String>();
    (query, &block[count..])
}

fn first_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    lines
        .iter()
        .skip(from)
        .position(|l| !is_blank(l))
        .map(|i| i + from)
}

fn block_end(lines: &[&str], from: usize) -> usize {
    lines
        .iter()
        .skip(from)
        .position(|l| is_blank(l))
        .map_or(lines.len(), |i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_normalize_trims_blank_runs() {
        let lines = normalize_lines("\n  \nGET /x\n\nbody\n\t\n\n", "\n");
        assert_eq!(lines, vec!["GET /x", "", "body"]);
    }

    #[test]
    fn test_normalize_blank_document() {
        assert!(normalize_lines("", "\n").is_empty());
        assert!(normalize_lines(" \n\t\n   ", "\n").is_empty());
    }

    #[test]
    fn test_normalize_uses_given_line_ending() {
        let lines = normalize_lines("GET /x\r\nHost: a\r\n", "\r\n");
        assert_eq!(lines, vec!["GET /x", "Host: a"]);
    }

    #[rstest]
    #[case("/x", "GET", "/x")]
    #[case("GET /x", "GET", "/x")]
    #[case("POST /x HTTP/1.1", "POST", "/x")]
    #[case("post /x http/2", "post", "/x")]
    #[case("  PUT   https://a.com/x   HTTP/1.1  ", "PUT", "https://a.com/x")]
    #[case("GET /a b/c", "GET", "/a b/c")]
    #[case("GET /a  b HTTP/1.1", "GET", "/a  b")]
    #[case("GET /x xHTTP/1.1", "GET", "/x xHTTP/1.1")]
    fn test_parse_request_line(#[case] line: &str, #[case] method: &str, #[case] url: &str) {
        let parsed = parse_request_line(line);
        assert_eq!(parsed.method, method);
        assert_eq!(parsed.url, url);
    }

    #[test]
    fn test_first_section_headers() {
        let lines = ["GET /", "A: 1", "B: 2", "", "body"];
        assert_eq!(first_section(&lines), Section::Headers(1..3));
    }

    #[test]
    fn test_first_section_headers_to_end() {
        let lines = ["GET /", "A: 1"];
        assert_eq!(first_section(&lines), Section::Headers(1..2));
    }

    #[test]
    fn test_first_section_body_only() {
        let lines = ["POST /", "", "  ", "x=1", "y=2", "", "ignored"];
        assert_eq!(first_section(&lines), Section::Body(3..5));
    }

    #[test]
    fn test_first_section_request_line_only() {
        assert_eq!(first_section(&["GET /"]), Section::RequestLineOnly);
    }

    #[test]
    fn test_body_after_headers_stops_at_blank() {
        let lines = ["GET /", "A: 1", "", "", "one", "two", "", "three"];
        assert_eq!(body_after_headers(&lines, 2, false), Some(4..6));
    }

    #[test]
    fn test_body_after_headers_runs_to_end() {
        let lines = ["GET /", "A: 1", "", "one", "", "three"];
        assert_eq!(body_after_headers(&lines, 2, true), Some(3..6));
    }

    #[test]
    fn test_body_after_headers_missing() {
        let lines = ["GET /", "A: 1"];
        assert_eq!(body_after_headers(&lines, 2, false), None);
    }

    #[test]
    fn test_split_query_continuation() {
        let block = ["  ?a=1", "&b=2 ", "Host: x", "&not-query"];
        let (query, rest) = split_query_continuation(&block);
        assert_eq!(query, "?a=1&b=2");
        assert_eq!(rest, &["Host: x", "&not-query"]);
    }

    #[test]
    fn test_split_query_continuation_none() {
        let block = ["Host: x"];
        let (query, rest) = split_query_continuation(&block);
        assert!(query.is_empty());
        assert_eq!(rest, &["Host: x"]);
    }
}
