// ABOUTME: Error types for profile loading and document fetching.
// ABOUTME: ProfileError covers configuration problems; SourceError covers per-locator fetch failures.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading a site profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile is not valid JSON for the profile schema.
    #[error("failed to parse profile: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile parsed but cannot drive extraction.
    #[error("invalid profile: {0}")]
    Invalid(String),
}

impl ProfileError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(err: serde_json::Error) -> Self {
        ProfileError::Json(err)
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ProfileError::Invalid(msg.into())
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ProfileError::Io { .. })
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ProfileError::Json(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ProfileError::Invalid(_))
    }
}

/// Categories of document source failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    InvalidLocator,
    Fetch,
    Timeout,
    Status,
    Io,
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceErrorCode::InvalidLocator => "invalid locator",
            SourceErrorCode::Fetch => "fetch error",
            SourceErrorCode::Timeout => "timeout",
            SourceErrorCode::Status => "unexpected status",
            SourceErrorCode::Io => "i/o error",
        };
        write!(f, "{}", s)
    }
}

/// A failure to produce a document for one locator.
///
/// Never fatal to a run: the locator simply yields no record.
#[derive(Debug, Error)]
pub struct SourceError {
    pub code: SourceErrorCode,
    pub locator: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.locator, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl SourceError {
    fn new(code: SourceErrorCode, locator: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code,
            locator: locator.into(),
            source,
        }
    }

    pub fn invalid_locator(locator: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(SourceErrorCode::InvalidLocator, locator, source)
    }

    pub fn fetch(locator: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(SourceErrorCode::Fetch, locator, source)
    }

    pub fn timeout(locator: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(SourceErrorCode::Timeout, locator, source)
    }

    pub fn status(locator: impl Into<String>, status: u16) -> Self {
        Self::new(
            SourceErrorCode::Status,
            locator,
            Some(anyhow::anyhow!("HTTP {}", status)),
        )
    }

    pub fn io(locator: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(SourceErrorCode::Io, locator, Some(source.into()))
    }

    pub fn is_timeout(&self) -> bool {
        self.code == SourceErrorCode::Timeout
    }

    pub fn is_status(&self) -> bool {
        self.code == SourceErrorCode::Status
    }

    pub fn is_fetch(&self) -> bool {
        self.code == SourceErrorCode::Fetch
    }
}
