use super::source::{BodySegment, BodySource};
use crate::mime;
use crate::settings::ParserSettings;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

const MULTIPART_LINE_ENDING: &str = "\r\n";

/// `<  path/to/file` on a line of its own.
fn upload_line() -> &'static Regex {
    static UPLOAD_LINE: OnceLock<Regex> = OnceLock::new();
    UPLOAD_LINE.get_or_init(|| Regex::new(r"^\s*<\s+(\S+)$").expect("upload pattern is valid"))
}

fn upload_reference(line: &str) -> Option<&str> {
    upload_line()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Build the request body from the lines of the body block.
///
/// Without upload lines the body is plain text. With at least one, it becomes
/// a stream where every resolvable upload line is replaced by its file.
pub(crate) fn assemble_body(
    lines: &[&str],
    content_type: Option<&str>,
    document_path: &Path,
    settings: &ParserSettings,
) -> BodySource {
    if lines.is_empty() {
        return BodySource::Empty;
    }
    let eol = settings.line_ending.as_str();

    if !lines.iter().any(|line| upload_line().is_match(line)) {
        let text = if mime::is_form_url_encoded(content_type) {
            join_form_lines(lines, eol)
        } else {
            lines.join(eol)
        };
        return BodySource::Text(text);
    }

    let separator = if mime::is_multipart_form_data(content_type) {
        MULTIPART_LINE_ENDING
    } else {
        eol
    };
    let workspace_root = settings.workspace_root.as_deref();
    let mut segments = Vec::with_capacity(lines.len() * 2);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            segments.push(BodySegment::LineEnding(separator));
        }
        let segment = match upload_reference(line) {
            Some(reference) => match resolve_upload_path(reference, document_path, workspace_root) {
                Some(path) => BodySegment::File(path),
                None => {
                    debug!(reference, "Upload file not found, sending the line as text");
                    BodySegment::Text((*line).to_owned())
                }
            },
            None => BodySegment::Text((*line).to_owned()),
        };
        segments.push(segment);
    }
    BodySource::Stream(segments)
}

/// Join form lines, gluing `&`-prefixed lines onto the previous one.
fn join_form_lines(lines: &[&str], eol: &str) -> String {
    let mut body = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 && !line.starts_with('&') {
            body.push_str(eol);
        }
        body.push_str(line);
    }
    body
}

/// Find the file an upload line points at.
///
/// Absolute references must exist as given. Relative ones are tried against
/// the workspace root first, then against the directory of the document.
pub(crate) fn resolve_upload_path(
    reference: &str,
    document_path: &Path,
    workspace_root: Option<&Path>,
) -> Option<PathBuf> {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        return reference.exists().then(|| reference.to_path_buf());
    }
    if let Some(root) = workspace_root {
        let candidate = root.join(reference);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    let candidate = document_path.parent()?.join(reference);
    candidate.exists().then_some(candidate)
}
