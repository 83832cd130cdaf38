//! Content types and structures.

use std::{
    collections::HashMap,
    fmt,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// One input file, read once per generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path as found on disk.
    pub path: PathBuf,

    /// Path relative to the content root.
    pub relative: PathBuf,

    /// Lower-cased extension without the leading dot (empty when there is none).
    pub extension: String,

    /// Raw text content.
    pub content: String,
}

impl SourceDocument {
    /// Create a source document.
    pub fn new(
        path: impl Into<PathBuf>,
        relative: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            path,
            relative: relative.into(),
            extension,
            content: content.into(),
        }
    }

    /// File name of the document.
    pub fn file_name(&self) -> String {
        file_name(&self.relative)
    }

    /// Whether this is the index document of its directory.
    pub fn is_index(&self) -> bool {
        is_index(&self.relative)
    }

    /// Directory of the document relative to the content root.
    pub fn dir(&self) -> PathBuf {
        self.relative
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Output of a content parser for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedContent {
    /// Format-native title, empty when none was found.
    pub title: String,

    /// Parsed frontmatter metadata (empty record when absent).
    pub frontmatter: Frontmatter,

    /// Body in the representation handed to the renderer.
    pub content: String,

    /// Parser-computed excerpt.
    pub excerpt: Option<String>,

    /// Open-ended per-parser metadata.
    pub metadata: HashMap<String, String>,

    /// Recoverable problems met while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Summary of a document shown inside a list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Resolved title.
    pub title: String,

    /// Site-relative URL.
    pub url: String,

    /// Raw frontmatter date.
    #[serde(default)]
    pub date: Option<String>,

    /// Resolved excerpt.
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// A recoverable problem tied to a document and field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Document the problem belongs to.
    pub path: PathBuf,

    /// Offending field (`frontmatter`, `sort_by`, ...).
    pub field: String,

    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path.display(), self.field, self.message)
    }
}

/// Stem that marks a directory's index document.
pub const INDEX_STEM: &str = "index";

/// Whether a path names an index document.
pub fn is_index(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(INDEX_STEM))
}

/// File name of a path as a string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Site-relative URL for a document path relative to the content root.
///
/// - `posts/hello.md` → `/posts/hello`
/// - `posts/index.md` → `/posts/`
/// - `index.md` → `/`
pub fn url_for(relative: &Path) -> String {
    let dir: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if is_index(relative) {
        return if dir.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", dir.join("/"))
        };
    }

    let stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut parts = dir;
    parts.push(stem);
    format!("/{}", parts.join("/"))
}
