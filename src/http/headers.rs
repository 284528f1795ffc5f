//! Request headers and the header-line parser.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Ordered header list with case-insensitive lookup.
///
/// The first spelling of a name is kept; later writes to the same name
/// (in any case) replace the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overwrite the value for `name`, or append a new entry.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn iter(&self) -> HeaderIter<'_> {
        self.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold a repeated header into the existing entry.
    fn append(&mut self, name: &str, value: &str) {
        let Some((existing, v)) = self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        else {
            self.entries.push((name.to_owned(), value.to_owned()));
            return;
        };
        let separator = if existing.eq_ignore_ascii_case("cookie") {
            "; "
        } else {
            ", "
        };
        v.push_str(separator);
        v.push_str(value);
    }
}

pub type HeaderIter<'a> = core::iter::Map<
    core::slice::Iter<'a, (String, String)>,
    fn(&'a (String, String)) -> (&'a str, &'a str),
>;

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = HeaderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        fn as_strs((name, value): &(String, String)) -> (&str, &str) {
            (name, value)
        }
        self.entries.iter().map(as_strs)
    }
}

/// Config documents keep their key order; a name repeated in another case
/// overwrites the first spelling.
impl TryFrom<Map<String, Value>> for Headers {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut headers = Headers::new();
        for (name, value) in &map {
            let Value::String(value) = value else {
                return Err(format!("header {name} must have a string value"));
            };
            headers.set(name, value);
        }
        Ok(headers)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Headers {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Turns the lines of a header block into [`Headers`].
pub trait HeaderParser {
    fn parse_headers(&self, lines: &[&str]) -> Headers;
}

/// `Name: value` per line, split on the first colon.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeaderParser;

impl HeaderParser for DefaultHeaderParser {
    fn parse_headers(&self, lines: &[&str]) -> Headers {
        let mut headers = Headers::new();
        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            let (name, value) = line
                .split_once(':')
                .map_or((line, ""), |(name, value)| (name.trim(), value.trim()));
            headers.append(name, value);
        }
        headers
    }
}
