use crate::error::ParseError;
use crate::http::Headers;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Soft cap on the total size of a streamed body.
pub const DEFAULT_MAX_BODY_STREAM_SIZE: u64 = 10 * 1024 * 1024;

/// How `application/x-www-form-urlencoded` bodies get escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormParamEncodingStrategy {
    /// Send the body as written.
    Never,
    /// Escape every name and value separately.
    Always,
    /// Escape unsafe characters across the whole body, keeping `&` and `=`.
    #[default]
    #[serde(other)]
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }
}

/// Everything the parser would otherwise read from its host's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserSettings {
    /// Consulted for `Host` and `Content-Type` when the request omits them.
    pub default_headers: Headers,
    pub form_param_encoding_strategy: FormParamEncodingStrategy,
    pub line_ending: LineEnding,
    /// Base directory for relative upload paths, tried before the document's own directory.
    pub workspace_root: Option<PathBuf>,
    pub max_body_stream_size: u64,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            default_headers: Headers::new(),
            form_param_encoding_strategy: FormParamEncodingStrategy::default(),
            line_ending: LineEnding::default(),
            workspace_root: None,
            max_body_stream_size: DEFAULT_MAX_BODY_STREAM_SIZE,
        }
    }
}

impl ParserSettings {
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(ParseError::InvalidSettings)
    }

    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
