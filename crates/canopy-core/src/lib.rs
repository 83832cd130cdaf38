//! Canopy Core Library
//!
//! Content model, frontmatter resolution, date parsing and configuration for the
//! Canopy static site generator.

pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{ContentItem, Diagnostic, ParsedContent, SourceDocument};
pub use error::{CoreError, ParseError, ParseErrorKind, Result};
pub use frontmatter::Frontmatter;
