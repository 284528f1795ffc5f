use core::fmt::Debug;
use core::fmt::Display;

pub enum ParseError {
    MalformedJsonBody(serde_json::Error),
    InvalidSettings(serde_json::Error),
    Io(std::io::Error),
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ParseError::MalformedJsonBody(e) | ParseError::InvalidSettings(e) => Some(e),
            ParseError::Io(e) => Some(e),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Debug for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::MalformedJsonBody(e) => write!(f, "Malformed JSON body: {e}"),
            ParseError::InvalidSettings(e) => write!(f, "Invalid settings: {e}"),
            ParseError::Io(e) => write!(f, "IO error: {e:?}"),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}
