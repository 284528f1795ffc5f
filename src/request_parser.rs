use crate::body::form::{encode_form_body, json_to_form};
use crate::body::{BodyReader, BodySource, assemble_body};
use crate::error::ParseError;
use crate::http::parser::{
    RequestLine, Section, body_after_headers, first_section, normalize_lines, parse_request_line,
    split_query_continuation,
};
use crate::http::{DefaultHeaderParser, HeaderParser, Headers, resolve_url};
use crate::mime;
use crate::notify::{Notifier, TracingNotifier};
use crate::request::HttpRequest;
use crate::settings::ParserSettings;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Parses request-text documents into [`HttpRequest`]s.
///
/// Holds the settings and the collaborators the pipeline calls out to; a
/// single parser can be reused for any number of documents.
pub struct RequestParser {
    settings: ParserSettings,
    header_parser: Box<dyn HeaderParser>,
    notifier: Box<dyn Notifier>,
}

impl RequestParser {
    pub fn new(settings: ParserSettings) -> Self {
        Self {
            settings,
            header_parser: Box::new(DefaultHeaderParser),
            notifier: Box::new(TracingNotifier),
        }
    }

    #[must_use]
    pub fn with_header_parser(mut self, header_parser: impl HeaderParser + 'static) -> Self {
        self.header_parser = Box::new(header_parser);
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Read `request`'s body, capped at the configured `max_body_stream_size`.
    pub fn body_reader<'r>(&self, request: &'r HttpRequest) -> BodyReader<'r> {
        request.body.reader(self.settings.max_body_stream_size)
    }

    pub fn parse_file(&self, path: &Path) -> Result<Option<HttpRequest>, ParseError> {
        let text = fs::read_to_string(path)?;
        self.parse(&text, path)
    }

    /// Parse `text`, resolving relative upload paths against `document_path`.
    ///
    /// Returns `Ok(None)` when the document holds nothing but blank lines.
    pub fn parse(
        &self,
        text: &str,
        document_path: &Path,
    ) -> Result<Option<HttpRequest>, ParseError> {
        let eol = self.settings.line_ending.as_str();
        let defaults = &self.settings.default_headers;

        let lines = normalize_lines(text, eol);
        let Some(first) = lines.first() else {
            debug!("Document has no request line");
            return Ok(None);
        };
        let RequestLine { method, mut url } = parse_request_line(first);
        debug!(method = %method, url = %url, "Parsed request line");

        let section = first_section(&lines);
        let mut headers = match &section {
            Section::Headers(block) => {
                let (query, header_lines) = split_query_continuation(&lines[block.clone()]);
                if !query.is_empty() {
                    debug!(query = %query, "Appending query continuation");
                    url.push_str(&query);
                }
                self.header_parser.parse_headers(header_lines)
            }
            Section::RequestLineOnly | Section::Body(_) => Headers::new(),
        };

        let content_type = headers
            .get("content-type")
            .or_else(|| defaults.get("content-type"));
        let no_body: &[&str] = &[];
        let body_lines = match section {
            Section::RequestLineOnly => no_body,
            Section::Body(block) => &lines[block],
            Section::Headers(block) => {
                let runs_to_end = mime::is_multipart_form_data(content_type);
                body_after_headers(&lines, block.end, runs_to_end).map_or(no_body, |r| &lines[r])
            }
        };

        let url = resolve_url(&url, &headers, defaults);
        let raw_body = body_lines.join(eol);
        let mut body = assemble_body(body_lines, content_type, document_path, &self.settings);

        if let BodySource::Text(text) = &body
            && mime::is_form_url_encoded(content_type)
        {
            body = BodySource::Text(encode_form_body(
                text,
                self.settings.form_param_encoding_strategy,
            ));
        }

        let json_form = content_type == Some(mime::FORM_URL_ENCODED_JSON);
        if json_form && matches!(body, BodySource::Text(_)) {
            let form = json_to_form(&raw_body).map_err(|e| {
                warn!(url = %url, "Body is not valid JSON: {e}");
                self.notifier
                    .error(&format!("Failed to convert the JSON body to form data: {e}"));
                ParseError::MalformedJsonBody(e)
            })?;
            body = BodySource::Text(form);
            headers.set("Content-Type", mime::FORM_URL_ENCODED);
        }

        debug!(method = %method, url = %url, "Parsed request");
        Ok(Some(HttpRequest {
            method,
            url,
            headers,
            body,
            raw_body,
        }))
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new(ParserSettings::default())
    }
}

/// Parse a single document with the default collaborators.
pub fn parse_http_request(
    text: &str,
    document_path: &Path,
    settings: &ParserSettings,
) -> Result<Option<HttpRequest>, ParseError> {
    RequestParser::new(settings.clone()).parse(text, document_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LineEnding;
    use std::cell::RefCell;
    use std::io::Read;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct RecordingNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.0.borrow_mut().push(message.to_owned());
        }
    }

    struct UpperCaseNames;

    impl HeaderParser for UpperCaseNames {
        fn parse_headers(&self, lines: &[&str]) -> Headers {
            let owned: Vec<(String, String)> = lines
                .iter()
                .filter_map(|l| l.split_once(':'))
                .map(|(n, v)| (n.trim().to_uppercase(), v.trim().to_owned()))
                .collect();
            owned.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect()
        }
    }

    fn parser() -> RequestParser {
        RequestParser::new(ParserSettings {
            line_ending: LineEnding::Lf,
            ..ParserSettings::default()
        })
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let notifier = RecordingNotifier::default();
        let parser = parser().with_notifier(notifier.clone());
        let result = parser.parse(
            "POST /x\nContent-Type: application/x-www-form-urlencoded+json\n\n{broken",
            Path::new("/tmp/r.http"),
        );
        assert!(matches!(result, Err(ParseError::MalformedJsonBody(_))));
        assert_eq!(notifier.0.borrow().len(), 1);
    }

    #[test]
    fn test_body_reader_uses_configured_cap() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let parser = RequestParser::new(ParserSettings {
            max_body_stream_size: 4,
            ..parser().settings().clone()
        });
        let request = parser
            .parse("POST /u\n\n< upload.txt", &fixtures.join("r.http"))
            .unwrap()
            .unwrap();
        let mut bytes = Vec::new();
        let err = parser
            .body_reader(&request)
            .read_to_end(&mut bytes)
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

        let roomy = RequestParser::new(ParserSettings {
            max_body_stream_size: 12,
            ..parser.settings().clone()
        });
        let mut bytes = Vec::new();
        roomy.body_reader(&request).read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"hello upload");
    }

    #[test]
    fn test_custom_header_parser_is_used() {
        let parser = parser().with_header_parser(UpperCaseNames);
        let request = parser
            .parse("GET /x\nhost: example.com", Path::new("/tmp/r.http"))
            .unwrap()
            .unwrap();
        assert_eq!(request.headers.iter().next(), Some(("HOST", "example.com")));
        assert_eq!(request.url, "http://example.com/x");
    }

    #[test]
    fn test_default_content_type_drives_body() {
        let mut settings = parser().settings().clone();
        settings.default_headers.set("Content-Type", "multipart/form-data; boundary=b");
        let request = RequestParser::new(settings)
            .parse("POST /u\nX-A: 1\n\n--b\n\nvalue\n--b--", Path::new("/tmp/r.http"))
            .unwrap()
            .unwrap();
        assert_eq!(request.raw_body, "--b\n\nvalue\n--b--");
    }

    #[test]
    fn test_pseudo_type_from_defaults_is_fixed_up() {
        let mut settings = parser().settings().clone();
        settings
            .default_headers
            .set("Content-Type", mime::FORM_URL_ENCODED_JSON);
        let request = RequestParser::new(settings)
            .parse("POST /u\n\n{\"a\":1}", Path::new("/tmp/r.http"))
            .unwrap()
            .unwrap();
        assert_eq!(request.body, BodySource::Text("a=1".to_owned()));
        assert_eq!(request.headers.get("content-type"), Some(mime::FORM_URL_ENCODED));
    }
}
