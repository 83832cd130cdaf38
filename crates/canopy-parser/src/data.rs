//! Structured-data parsers for TOML and JSON documents.
//!
//! The whole file is one table. Frontmatter keys are read from it directly, an optional
//! `content` string carries the body, and the remaining scalars land in the metadata bag.

use std::{path::Path, sync::Arc};

use canopy_core::{
    Diagnostic, Frontmatter, ParseError, ParsedContent, frontmatter::toml_to_json,
};
use serde_json::Value;

use crate::{
    ContentParser,
    markdown::MarkdownParser,
    resolve::{html_excerpt, insert_word_stats, strip_tags},
};

/// Key holding the document body.
pub const CONTENT_KEY: &str = "content";

/// Keys that belong to the frontmatter record rather than the metadata bag.
const FRONTMATTER_KEYS: &[&str] = &[
    "title",
    "date",
    "list",
    "page_template",
    "sort_by",
    "sort_order",
    "excerpt",
    "theme",
    "theme_variant",
    "tags",
];

/// Parser for `.toml` documents.
#[derive(Debug, Clone)]
pub struct TomlParser {
    markdown: Arc<MarkdownParser>,
}

impl TomlParser {
    /// Create a TOML parser that renders `content` with the given markdown parser.
    pub fn new(markdown: Arc<MarkdownParser>) -> Self {
        Self { markdown }
    }
}

impl Default for TomlParser {
    fn default() -> Self {
        Self::new(Arc::new(MarkdownParser::new()))
    }
}

impl ContentParser for TomlParser {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent, ParseError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ParseError::body(e.message().to_string()))?;
        parse_table(
            toml_to_json(toml::Value::Table(table)),
            path,
            &self.markdown,
        )
    }
}

/// Parser for `.json` documents.
#[derive(Debug, Clone)]
pub struct JsonParser {
    markdown: Arc<MarkdownParser>,
}

impl JsonParser {
    /// Create a JSON parser that renders `content` with the given markdown parser.
    pub fn new(markdown: Arc<MarkdownParser>) -> Self {
        Self { markdown }
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new(Arc::new(MarkdownParser::new()))
    }
}

impl ContentParser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent, ParseError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ParseError::body(e.to_string()))?;
        parse_table(value, path, &self.markdown)
    }
}

fn parse_table(
    value: Value,
    path: &Path,
    markdown: &MarkdownParser,
) -> Result<ParsedContent, ParseError> {
    let Value::Object(mut table) = value else {
        return Err(ParseError::body("top level must be a table"));
    };

    let body = match table.remove(CONTENT_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(body)) => Some(body),
        Some(_) => {
            return Err(ParseError::body(format!(
                "`{CONTENT_KEY}` must be a string"
            )));
        }
    };

    let mut parsed = ParsedContent::default();

    for (key, value) in &table {
        if FRONTMATTER_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(text) = scalar_text(value) {
            parsed.metadata.insert(key.clone(), text);
        }
    }

    parsed.frontmatter = match Frontmatter::from_value(Value::Object(table)) {
        Ok(frontmatter) => frontmatter,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed frontmatter");
            parsed.diagnostics.push(Diagnostic::new(
                path,
                e.kind.as_str(),
                format!("{}; using empty frontmatter", e.detail),
            ));
            Frontmatter::default()
        }
    };

    let Some(body) = body else {
        return Ok(parsed);
    };

    if looks_like_html(&body) {
        insert_word_stats(&mut parsed.metadata, &strip_tags(&body));
        parsed.excerpt = html_excerpt(&body);
        parsed.content = body;
    } else {
        let rendered = markdown.render(&body);
        insert_word_stats(&mut parsed.metadata, &body);
        parsed.title = rendered.title.unwrap_or_default();
        parsed.excerpt = rendered.excerpt;
        parsed.content = rendered.html;
    }

    Ok(parsed)
}

fn looks_like_html(body: &str) -> bool {
    body.trim_start().starts_with('<') && (body.contains("</") || body.contains("/>"))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
