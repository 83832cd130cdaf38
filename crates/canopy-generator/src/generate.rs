//! Generation pass orchestration.
//!
//! Coordinates collection and list aggregation into one render-ready [`Site`].

use std::{
    collections::{HashMap, hash_map::Entry},
    path::{Path, PathBuf},
    time::Instant,
};

use canopy_core::{Config, Diagnostic};
use canopy_parser::{ParserError, ParserRegistry};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cancel::CancelToken,
    collector::{ContentCollector, Document, DocumentError},
    list::{ListPage, aggregate},
};

/// Errors that abort a whole generation pass.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// IO error while walking the content tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content root does not exist or is not a directory.
    #[error("content directory not found: {}", .0.display())]
    MissingContentDir(PathBuf),

    /// The pass was cancelled; nothing was produced.
    #[error("generation cancelled")]
    Cancelled,
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Render-ready content model produced by one generation pass.
#[derive(Debug, Default, Serialize)]
pub struct Site {
    /// Documents in directory listing order.
    pub documents: Vec<Document>,

    /// List pages ordered by directory.
    pub list_pages: Vec<ListPage>,

    /// Documents that were left out.
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<DocumentError>,

    /// Recoverable problems.
    pub warnings: Vec<Diagnostic>,
}

impl Site {
    /// Look up a document by URL.
    pub fn document(&self, url: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.url == url)
    }

    /// Look up a list page by directory relative to the content root.
    pub fn list_page(&self, dir: impl AsRef<Path>) -> Option<&ListPage> {
        let dir = dir.as_ref();
        self.list_pages.iter().find(|page| page.dir == dir)
    }

    /// Whether any document failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Report documents whose URL an earlier document already took.
///
/// Index documents are skipped; list aggregation already reports a second index.
fn shared_urls(documents: &[Document]) -> Vec<Diagnostic> {
    let mut owners: HashMap<&str, &Path> = HashMap::new();
    let mut diagnostics = Vec::new();

    for document in documents.iter().filter(|doc| !doc.is_index()) {
        match owners.entry(document.url.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(&document.path);
            }
            Entry::Occupied(owner) => {
                warn!(
                    path = %document.path.display(),
                    owner = %owner.get().display(),
                    url = %document.url,
                    "URL already taken"
                );
                diagnostics.push(Diagnostic::new(
                    &document.path,
                    "url",
                    format!(
                        "URL {} is already used by {}",
                        document.url,
                        owner.get().display()
                    ),
                ));
            }
        }
    }

    diagnostics
}

#[derive(Serialize)]
struct ErrorRecord<'a> {
    path: &'a Path,
    parser: Option<&'static str>,
    message: String,
}

fn serialize_errors<S: Serializer>(
    errors: &[DocumentError],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| ErrorRecord {
        path: &e.path,
        parser: e.parser,
        message: e.reason.to_string(),
    }))
}

/// Runs generation passes over a content tree.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    registry: ParserRegistry,
}

impl Generator {
    /// Create a generator with an explicit parser registry.
    #[must_use]
    pub fn new(config: Config, registry: ParserRegistry) -> Self {
        Self { config, registry }
    }

    /// Create a generator with the registry described by `config`.
    pub fn from_config(config: Config) -> std::result::Result<Self, ParserError> {
        let registry = ParserRegistry::from_config(&config)?;
        Ok(Self::new(config, registry))
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the parser registry.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Run a generation pass over `content_dir`.
    pub fn generate(&self, content_dir: &Path) -> Result<Site> {
        self.generate_with_cancel(content_dir, &CancelToken::new())
    }

    /// Run a generation pass that stops early once `cancel` fires.
    ///
    /// A cancelled pass returns [`GenerateError::Cancelled`] and no partial site.
    pub fn generate_with_cancel(&self, content_dir: &Path, cancel: &CancelToken) -> Result<Site> {
        let start = Instant::now();

        if !content_dir.is_dir() {
            return Err(GenerateError::MissingContentDir(content_dir.to_path_buf()));
        }
        if cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        info!(content = %content_dir.display(), "starting generation");

        let collected = ContentCollector::new(&self.registry, content_dir)
            .include_hidden(self.config.content.include_hidden)
            .collect(cancel)?
            .ok_or(GenerateError::Cancelled)?;

        let (list_pages, list_warnings) =
            aggregate(&collected.documents, &self.config.content.list_marker);

        if cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        let mut warnings = collected.warnings;
        warnings.extend(list_warnings);
        warnings.extend(shared_urls(&collected.documents));

        let site = Site {
            documents: collected.documents,
            list_pages,
            errors: collected.errors,
            warnings,
        };

        info!(
            documents = site.documents.len(),
            list_pages = site.list_pages.len(),
            errors = site.errors.len(),
            warnings = site.warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );

        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_missing_content_dir() {
        let generator = Generator::new(Config::default(), ParserRegistry::new());
        let err = generator
            .generate(Path::new("/nonexistent/content"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingContentDir(_)));
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(Config::default(), ParserRegistry::new());

        let cancel = CancelToken::new();
        cancel.cancel();

        let err = generator
            .generate_with_cancel(dir.path(), &cancel)
            .unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
    }

    #[test]
    fn test_site_lookups() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/index.md"),
            "+++\nlist = true\n+++\n# Posts",
        )
        .unwrap();
        fs::write(dir.path().join("posts/hello.md"), "# Hello").unwrap();

        let generator = Generator::from_config(Config::default()).unwrap();
        let site = generator.generate(dir.path()).unwrap();

        assert_eq!(site.document("/posts/hello").unwrap().title, "Hello");
        assert!(site.document("/missing").is_none());
        assert_eq!(site.list_page("posts").unwrap().items.len(), 1);
        assert!(site.list_page("other").is_none());
        assert!(!site.has_errors());
    }

    #[test]
    fn test_shared_url_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("about.md"), "# From Markdown").unwrap();
        fs::write(dir.path().join("about.txt"), "From text").unwrap();

        let generator = Generator::from_config(Config::default()).unwrap();
        let site = generator.generate(dir.path()).unwrap();

        assert_eq!(site.document("/about").unwrap().title, "From Markdown");
        assert_eq!(site.warnings.len(), 1);
        let warning = &site.warnings[0];
        assert_eq!(warning.path, PathBuf::from("about.txt"));
        assert_eq!(warning.field, "url");
        assert!(warning.message.contains("about.md"));
    }

    #[test]
    fn test_site_serializes_errors_as_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.xyz"), "?").unwrap();

        let generator = Generator::new(Config::default(), ParserRegistry::new());
        let site = generator.generate(dir.path()).unwrap();

        let json = serde_json::to_value(&site).unwrap();
        let error = &json["errors"][0];
        assert_eq!(error["path"], "data.xyz");
        assert!(error["parser"].is_null());
        assert!(
            error["message"]
                .as_str()
                .unwrap()
                .contains("unsupported format")
        );
    }
}
