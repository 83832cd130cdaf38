//! Error types for the Canopy core library.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Canopy.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or validation error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Frontmatter or body decoding error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Which part of a document failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The metadata block at the head of the document.
    Frontmatter,
    /// The document body (structured-data formats).
    Body,
}

impl ParseErrorKind {
    /// Field name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontmatter => "frontmatter",
            Self::Body => "body",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document whose content could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed {kind}: {detail}")]
pub struct ParseError {
    /// The part that failed.
    pub kind: ParseErrorKind,
    /// Decoder message.
    pub detail: String,
}

impl ParseError {
    /// Create a malformed-frontmatter error.
    pub fn frontmatter(detail: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::Frontmatter,
            detail: detail.into(),
        }
    }

    /// Create a malformed-body error.
    pub fn body(detail: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::Body,
            detail: detail.into(),
        }
    }
}
