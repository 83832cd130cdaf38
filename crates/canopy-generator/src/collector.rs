//! Content collection.
//!
//! Walks the content directory and parses every file into a [`Document`].

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use canopy_core::{
    ContentItem, Diagnostic, Frontmatter, SourceDocument,
    content::{file_name, is_index, url_for},
};
use canopy_parser::{ParserError, ParserRegistry, resolve_excerpt, resolve_title};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::cancel::CancelToken;

/// Why a single document could not be produced.
#[derive(Debug, Error)]
pub enum DocumentErrorReason {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Read(#[from] io::Error),

    /// No parser, or the parser rejected the content.
    #[error(transparent)]
    Parse(#[from] ParserError),
}

/// A document that was left out of the site.
#[derive(Debug, Error)]
#[error("{}: {reason}", path.display())]
pub struct DocumentError {
    /// Path relative to the content root.
    pub path: PathBuf,

    /// Parser that handled the file, when one was bound.
    pub parser: Option<&'static str>,

    pub reason: DocumentErrorReason,
}

/// A parsed document with its title, excerpt and URL resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path relative to the content root.
    pub path: PathBuf,

    /// Site-relative URL.
    pub url: String,

    /// Name of the parser that produced it.
    pub parser: &'static str,

    /// Resolved title, never empty.
    pub title: String,

    /// Resolved excerpt.
    pub excerpt: Option<String>,

    pub frontmatter: Frontmatter,

    /// Body handed to the renderer.
    pub content: String,

    /// Per-parser metadata.
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// File name of the document.
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    /// Directory of the document relative to the content root.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    /// Whether this is the index document of its directory.
    pub fn is_index(&self) -> bool {
        is_index(&self.path)
    }

    /// Whether this document is a list page.
    pub fn is_list(&self) -> bool {
        self.is_index() && self.frontmatter.is_list()
    }

    /// Summary used inside list pages.
    pub fn item(&self) -> ContentItem {
        ContentItem {
            title: self.title.clone(),
            url: self.url.clone(),
            date: self.frontmatter.date.clone(),
            excerpt: self.excerpt.clone(),
        }
    }
}

/// What one collection pass produced.
#[derive(Debug, Default)]
pub struct Collected {
    /// Parsed documents in directory listing order.
    pub documents: Vec<Document>,

    /// Documents that failed.
    pub errors: Vec<DocumentError>,

    /// Recoverable problems reported by parsers.
    pub warnings: Vec<Diagnostic>,
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector<'a> {
    registry: &'a ParserRegistry,
    content_dir: PathBuf,
    include_hidden: bool,
}

impl<'a> ContentCollector<'a> {
    /// Create a new content collector.
    #[must_use]
    pub fn new(registry: &'a ParserRegistry, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            content_dir: content_dir.into(),
            include_hidden: false,
        }
    }

    /// Also walk hidden files and directories.
    #[must_use]
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Collect all content from the content directory.
    ///
    /// Returns `Ok(None)` when `cancel` fired before every document was parsed.
    pub fn collect(&self, cancel: &CancelToken) -> io::Result<Option<Collected>> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let results: Vec<Option<Result<(Document, Vec<Diagnostic>), DocumentError>>> = files
            .par_iter()
            .map(|(path, relative)| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.load(path, relative))
            })
            .collect();

        if cancel.is_cancelled() {
            return Ok(None);
        }

        let mut collected = Collected::default();
        for result in results.into_iter().flatten() {
            match result {
                Ok((document, diagnostics)) => {
                    collected.warnings.extend(diagnostics);
                    collected.documents.push(document);
                }
                Err(e) => {
                    warn!(path = %e.path.display(), error = %e.reason, "skipping document");
                    collected.errors.push(e);
                }
            }
        }

        info!(
            documents = collected.documents.len(),
            errors = collected.errors.len(),
            warnings = collected.warnings.len(),
            "content collection complete"
        );

        Ok(Some(collected))
    }

    /// Find all files under the content directory, sorted by name within each directory.
    fn find_content_files(&self) -> io::Result<Vec<(PathBuf, PathBuf)>> {
        let include_hidden = self.include_hidden;
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let relative = path
                .strip_prefix(&self.content_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            files.push((path, relative));
        }

        Ok(files)
    }

    /// Parse a single file into a document.
    fn load(
        &self,
        path: &Path,
        relative: &Path,
    ) -> Result<(Document, Vec<Diagnostic>), DocumentError> {
        debug!(path = %relative.display(), "parsing file");

        let fail = |parser: Option<&'static str>, reason: DocumentErrorReason| DocumentError {
            path: relative.to_path_buf(),
            parser,
            reason,
        };

        let parser = self
            .registry
            .resolve(relative)
            .map_err(|e| fail(None, e.into()))?;
        let name = parser.name();

        let content = fs::read_to_string(path).map_err(|e| fail(Some(name), e.into()))?;
        let source = SourceDocument::new(path, relative, content);

        let parsed = parser
            .parse(&source.content, &source.relative)
            .map_err(|error| {
                fail(
                    Some(name),
                    ParserError::Malformed {
                        parser: name,
                        source: error,
                    }
                    .into(),
                )
            })?;

        let document = Document {
            url: url_for(&source.relative),
            parser: name,
            title: resolve_title(&parsed, &source.relative),
            excerpt: resolve_excerpt(&parsed),
            frontmatter: parsed.frontmatter,
            content: parsed.content,
            metadata: parsed.metadata.into_iter().collect(),
            path: source.relative,
        };

        Ok((document, parsed.diagnostics))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
