//! Where a raw dataset lives: a local file or a remote object-store URI.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::info;

use crate::errors::{CorpusError, Result};

/// Location of a raw dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(String),
}

/// An opened source, ready to be handed to a decoder
pub enum SourceData {
    File(File),
    Memory(Bytes),
}

impl SourceLocation {
    /// Classify a raw location string; `http://` and `https://` are remote
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Remote(trimmed.to_string())
        } else {
            SourceLocation::Local(PathBuf::from(trimmed))
        }
    }

    /// Open the source, fetching it fully into memory when remote
    pub fn open(&self) -> Result<SourceData> {
        match self {
            SourceLocation::Local(path) => {
                let file = File::open(path).map_err(|source| CorpusError::SourceIo {
                    location: self.to_string(),
                    source,
                })?;
                Ok(SourceData::File(file))
            }
            SourceLocation::Remote(url) => {
                info!(url = %url, "Fetching remote source");
                let fetch_error = |source| CorpusError::Fetch {
                    location: url.clone(),
                    source,
                };
                let body = reqwest::blocking::get(url)
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.bytes())
                    .map_err(fetch_error)?;
                info!(url = %url, bytes = body.len(), "Fetched remote source");
                Ok(SourceData::Memory(body))
            }
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
            SourceLocation::Remote(url) => f.write_str(url),
        }
    }
}

impl From<&str> for SourceLocation {
    fn from(raw: &str) -> Self {
        SourceLocation::parse(raw)
    }
}

impl From<String> for SourceLocation {
    fn from(raw: String) -> Self {
        SourceLocation::parse(&raw)
    }
}

impl From<PathBuf> for SourceLocation {
    fn from(path: PathBuf) -> Self {
        SourceLocation::Local(path)
    }
}

impl From<&Path> for SourceLocation {
    fn from(path: &Path) -> Self {
        SourceLocation::Local(path.to_path_buf())
    }
}
