use super::stream::BodyReader;
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;

/// The body of a parsed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum BodySource {
    Empty,
    Text(String),
    /// Spliced together from literal text and file contents; nothing is read
    /// until the stream is drained through [`BodySource::reader`].
    Stream(Vec<BodySegment>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BodySegment {
    Text(String),
    File(PathBuf),
    LineEnding(&'static str),
}

impl BodySource {
    pub fn is_empty(&self) -> bool {
        matches!(self, BodySource::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BodySource::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn segments(&self) -> &[BodySegment] {
        match self {
            BodySource::Stream(segments) => segments,
            _ => &[],
        }
    }

    /// Lazily read the body, failing once more than `max_size` bytes come out.
    pub fn reader(&self, max_size: u64) -> BodyReader<'_> {
        BodyReader::new(self, max_size)
    }

    pub fn read_to_bytes(&self, max_size: u64) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader(max_size).read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
