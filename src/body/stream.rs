//! Lazy reader over a request body.
//!
//! Files referenced by a streamed body are opened one at a time, only when the
//! reader reaches them.

use super::source::{BodySegment, BodySource};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

enum Pending<'a> {
    Bytes(&'a [u8]),
    File(&'a Path),
}

pub struct BodyReader<'a> {
    pending: std::vec::IntoIter<Pending<'a>>,
    current: Option<Box<dyn Read + 'a>>,
    total: u64,
    max_size: u64,
}

impl<'a> BodyReader<'a> {
    pub(crate) fn new(body: &'a BodySource, max_size: u64) -> Self {
        let pending = match body {
            BodySource::Empty => Vec::new(),
            BodySource::Text(text) => vec![Pending::Bytes(text.as_bytes())],
            BodySource::Stream(segments) => segments
                .iter()
                .map(|segment| match segment {
                    BodySegment::Text(text) => Pending::Bytes(text.as_bytes()),
                    BodySegment::LineEnding(eol) => Pending::Bytes(eol.as_bytes()),
                    BodySegment::File(path) => Pending::File(path),
                })
                .collect(),
        };
        Self {
            pending: pending.into_iter(),
            current: None,
            total: 0,
            max_size,
        }
    }

    /// Bytes handed out so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    fn open_next(&mut self) -> io::Result<bool> {
        let Some(next) = self.pending.next() else {
            return Ok(false);
        };
        let reader: Box<dyn Read + 'a> = match next {
            Pending::Bytes(bytes) => Box::new(bytes),
            Pending::File(path) => {
                debug!(path = %path.display(), "Opening upload file");
                Box::new(File::open(path)?)
            }
        };
        self.current = Some(reader);
        Ok(true)
    }
}

impl Read for BodyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let Some(current) = self.current.as_mut() else {
                if self.open_next()? {
                    continue;
                }
                return Ok(0);
            };
            let n = current.read(buf)?;
            if n == 0 {
                self.current = None;
                continue;
            }
            self.total += n as u64;
            if self.total > self.max_size {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("request body exceeds {} bytes", self.max_size),
                ));
            }
            return Ok(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_reads_segments_in_order() {
        let body = BodySource::Stream(vec![
            BodySegment::Text("head".to_owned()),
            BodySegment::LineEnding("\r\n"),
            BodySegment::File(fixture("upload.txt")),
            BodySegment::LineEnding("\r\n"),
            BodySegment::Text("tail".to_owned()),
        ]);
        let bytes = body.read_to_bytes(1024).unwrap();
        assert_eq!(bytes, b"head\r\nhello upload\r\ntail");
    }

    #[test]
    fn test_text_and_empty() {
        assert_eq!(
            BodySource::Text("a=1".to_owned()).read_to_bytes(16).unwrap(),
            b"a=1"
        );
        assert!(BodySource::Empty.read_to_bytes(16).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_fails_on_read() {
        let body = BodySource::Stream(vec![BodySegment::File(fixture("does-not-exist.bin"))]);
        let err = body.read_to_bytes(1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_size_cap() {
        let body = BodySource::Text("0123456789".to_owned());
        let err = body.read_to_bytes(4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut reader = body.reader(10);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(reader.total(), 10);
    }
}
