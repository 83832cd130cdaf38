//! Canopy Parser Library
//!
//! Content parsers for Markdown, TOML, JSON and plain text, dispatched by file extension
//! through a [`ParserRegistry`].

pub mod data;
pub mod markdown;
pub mod resolve;
pub mod syntax;
pub mod text;

use std::{collections::HashMap, fmt, path::Path, sync::Arc};

use canopy_core::{Config, ParseError, ParsedContent, SourceDocument};
pub use data::{JsonParser, TomlParser};
pub use markdown::MarkdownParser;
pub use resolve::{resolve_excerpt, resolve_title, title_from_path};
pub use syntax::SyntaxHighlighter;
pub use text::TextParser;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// No parser is bound to the extension.
    #[error("unsupported format: no parser registered for extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// A parser could not decode the document.
    #[error("{parser} parser: {source}")]
    Malformed {
        parser: &'static str,
        #[source]
        source: ParseError,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for content parsers.
///
/// Implementations receive content that has already been read and must not touch the
/// file system. The same input always yields the same output.
pub trait ContentParser: Send + Sync {
    /// Short identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> std::result::Result<ParsedContent, ParseError>;
}

/// Registry mapping file extensions to content parsers.
///
/// Extensions are matched case-insensitively and without the leading dot. Registering an
/// extension twice replaces the earlier binding.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn ContentParser>>,
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings: Vec<(String, &'static str)> = self
            .supported_extensions()
            .into_iter()
            .filter_map(|ext| {
                let name = self.parsers.get(&ext)?.name();
                Some((ext, name))
            })
            .collect();
        f.debug_struct("ParserRegistry")
            .field("parsers", &bindings)
            .finish()
    }
}

impl ParserRegistry {
    /// Create a registry with no bindings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in parsers.
    pub fn new() -> Self {
        Self::with_markdown(MarkdownParser::new())
    }

    /// Create the built-in registry, honoring `[markdown]` and `[parsers.aliases]`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::with_markdown(MarkdownParser::from_config(&config.markdown));

        for (alias, target) in &config.parsers.aliases {
            registry.alias(alias, target)?;
        }

        Ok(registry)
    }

    fn with_markdown(markdown: MarkdownParser) -> Self {
        let markdown = Arc::new(markdown);
        let mut registry = Self::empty();

        registry.register_shared("md", markdown.clone());
        registry.register_shared("markdown", markdown.clone());
        registry.register("toml", TomlParser::new(markdown.clone()));
        registry.register("json", JsonParser::new(markdown));
        registry.register_many(&["txt", "text"], TextParser);

        registry
    }

    /// Bind one extension to a parser.
    pub fn register(&mut self, extension: &str, parser: impl ContentParser + 'static) {
        self.register_shared(extension, Arc::new(parser));
    }

    /// Bind one extension to an already shared parser.
    pub fn register_shared(&mut self, extension: &str, parser: Arc<dyn ContentParser>) {
        let extension = normalize_extension(extension);
        tracing::trace!(extension, parser = parser.name(), "registering parser");

        if let Some(previous) = self.parsers.insert(extension.clone(), parser) {
            tracing::debug!(
                extension,
                previous = previous.name(),
                "replaced parser binding"
            );
        }
    }

    /// Bind several extensions to one parser instance.
    pub fn register_many(&mut self, extensions: &[&str], parser: impl ContentParser + 'static) {
        let parser: Arc<dyn ContentParser> = Arc::new(parser);
        for extension in extensions {
            self.register_shared(extension, parser.clone());
        }
    }

    /// Bind `extension` to whatever parser currently handles `existing`.
    pub fn alias(&mut self, extension: &str, existing: &str) -> Result<()> {
        let parser = self.resolve_extension(existing)?;
        self.register_shared(extension, parser);
        Ok(())
    }

    /// Parser bound to an extension.
    pub fn resolve_extension(&self, extension: &str) -> Result<Arc<dyn ContentParser>> {
        let extension = normalize_extension(extension);
        self.parsers
            .get(&extension)
            .cloned()
            .ok_or(ParserError::UnsupportedFormat { extension })
    }

    /// Parser bound to a path's extension.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn ContentParser>> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.resolve_extension(&extension)
    }

    /// Whether a parser is bound to the extension.
    pub fn supports(&self, extension: &str) -> bool {
        self.parsers.contains_key(&normalize_extension(extension))
    }

    /// Bound extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.parsers.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// Parse a source document with the parser bound to its extension.
    ///
    /// The parser sees the path relative to the content root.
    pub fn parse(&self, doc: &SourceDocument) -> Result<ParsedContent> {
        let parser = self.resolve_extension(&doc.extension)?;
        parser
            .parse(&doc.content, &doc.relative)
            .map_err(|source| ParserError::Malformed {
                parser: parser.name(),
                source,
            })
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}
