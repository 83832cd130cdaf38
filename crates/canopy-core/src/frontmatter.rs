//! Frontmatter model and resolution.
//!
//! A document may open with a metadata block in one of two syntaxes:
//!
//! ```text
//! +++                      ---
//! title = "Hello"          title: Hello
//! list = true              list: true
//! +++                      ---
//! ```
//!
//! Both are lowered to a neutral [`serde_json::Value`] tree and decoded by a single
//! function, so the syntax never leaks past this module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Frontmatter metadata for a document.
///
/// Every field is optional. A document without a metadata block gets the empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication date, free-form text (see [`crate::date::parse_date`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Marks a directory index as a list page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,

    /// Template override, opaque to the content core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_template: Option<String>,

    /// Sort key for list pages (`date`, `title`, `filename`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Sort direction for list pages (`asc`, `desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    /// Author-supplied excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Theme name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Theme variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_variant: Option<String>,

    /// Tags for the page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Unrecognized keys, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Frontmatter {
    /// Decode a frontmatter record from a neutral value tree.
    ///
    /// `null` yields the empty record; anything other than an object is malformed.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ParseError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            value @ serde_json::Value::Object(_) => {
                serde_json::from_value(value).map_err(|e| ParseError::frontmatter(e.to_string()))
            }
            other => Err(ParseError::frontmatter(format!(
                "expected a key/value table, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Whether this document is a list page.
    pub fn is_list(&self) -> bool {
        self.list == Some(true)
    }

    /// The title, if present and not blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// The excerpt, if present and not blank.
    pub fn excerpt(&self) -> Option<&str> {
        non_blank(self.excerpt.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a table",
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// TOML frontmatter delimited by `+++`.
    Toml,
    /// YAML frontmatter delimited by `---`.
    Yaml,
}

impl FrontmatterFormat {
    /// Formats in detection order.
    pub const ALL: [Self; 2] = [Self::Toml, Self::Yaml];

    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Toml => "+++",
            Self::Yaml => "---",
        }
    }
}

/// A delimited metadata block found at the head of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// Syntax of the block.
    pub format: FrontmatterFormat,
    /// Text between the delimiters.
    pub raw: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

impl FrontmatterBlock<'_> {
    /// Decode the block into a frontmatter record.
    pub fn decode(&self) -> Result<Frontmatter, ParseError> {
        match self.format {
            FrontmatterFormat::Toml => decode_toml(self.raw),
            FrontmatterFormat::Yaml => decode_yaml(self.raw),
        }
    }
}

/// UTF-8 byte order mark some editors write at the start of a file.
const BOM: char = '\u{FEFF}';

/// Split a document into its metadata block and body.
///
/// Returns `Ok(None)` when the document (ignoring a byte order mark and leading
/// whitespace) does not open with a delimiter line, and an error when an opening
/// delimiter is never closed.
pub fn split_frontmatter(content: &str) -> Result<Option<FrontmatterBlock<'_>>, ParseError> {
    let (first, after_open) = split_line(strip_bom(content).trim_start());

    let Some(format) = FrontmatterFormat::ALL
        .into_iter()
        .find(|f| first.trim_end() == f.delimiter())
    else {
        return Ok(None);
    };
    let delimiter = format.delimiter();

    let mut remaining = after_open;
    while !remaining.is_empty() {
        let (line, next) = split_line(remaining);
        if line.trim_end() == delimiter {
            let raw_len = after_open.len() - remaining.len();
            return Ok(Some(FrontmatterBlock {
                format,
                raw: &after_open[..raw_len],
                body: next.trim_start_matches(['\r', '\n']),
            }));
        }
        remaining = next;
    }

    Err(ParseError::frontmatter(format!(
        "opening `{delimiter}` has no matching closing delimiter"
    )))
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix(BOM).unwrap_or(content)
}

fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

/// Resolve the frontmatter of a document.
///
/// A document without a metadata block yields the empty record and its full content,
/// minus any byte order mark, as body.
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, &str), ParseError> {
    match split_frontmatter(content)? {
        Some(block) => Ok((block.decode()?, block.body)),
        None => Ok((Frontmatter::default(), strip_bom(content))),
    }
}

/// Decode a TOML metadata block.
pub fn decode_toml(raw: &str) -> Result<Frontmatter, ParseError> {
    let table: toml::Table =
        toml::from_str(raw).map_err(|e| ParseError::frontmatter(e.message().to_string()))?;
    Frontmatter::from_value(toml_to_json(toml::Value::Table(table)))
}

/// Decode a YAML metadata block.
pub fn decode_yaml(raw: &str) -> Result<Frontmatter, ParseError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| ParseError::frontmatter(e.to_string()))?;
    let value = serde_json::to_value(value).map_err(|e| ParseError::frontmatter(e.to_string()))?;
    Frontmatter::from_value(value)
}

/// Lower a TOML value into the neutral value tree.
///
/// Datetime literals become their textual form.
pub fn toml_to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        toml::Value::String(s) => Json::String(s),
        toml::Value::Integer(i) => Json::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        toml::Value::Boolean(b) => Json::Bool(b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Json::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_split_toml_frontmatter() {
        let content = "+++\ntitle = \"Hello World\"\n+++\n\nThis is the body content.";

        let block = split_frontmatter(content).unwrap().expect("block");
        assert_eq!(block.format, FrontmatterFormat::Toml);
        assert!(block.raw.contains("title ="));
        assert_eq!(block.body, "This is the body content.");
    }

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = "---\ntitle: \"Hello World\"\n---\nThis is the body content.";

        let block = split_frontmatter(content).unwrap().expect("block");
        assert_eq!(block.format, FrontmatterFormat::Yaml);
        assert_eq!(block.raw, "title: \"Hello World\"\n");
        assert_eq!(block.body, "This is the body content.");
    }

    #[test]
    fn test_no_frontmatter_is_unchanged() {
        let content = "# Heading\n\nJust some content without frontmatter.";
        assert!(split_frontmatter(content).unwrap().is_none());

        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_leading_whitespace_is_ignored() {
        let content = "\n\n  +++\ntitle = \"Indented\"\n+++\nBody";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Indented"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_delimiter_is_malformed() {
        let err = parse_frontmatter("+++\ntitle = \"Oops\"\n\nBody text").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Frontmatter);
        assert!(err.detail.contains("+++"));

        let err = parse_frontmatter("---").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Frontmatter);
    }

    #[test]
    fn test_longer_rule_is_not_a_delimiter() {
        let content = "----\nnot frontmatter\n----";
        assert!(split_frontmatter(content).unwrap().is_none());
    }

    #[test]
    fn test_invalid_toml_is_malformed() {
        let err = parse_frontmatter("+++\ntitle = \n+++\nBody").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Frontmatter);
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let err = parse_frontmatter("---\nlist: [1, 2]\n---\nBody").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Frontmatter);
    }

    #[test]
    fn test_empty_blocks_yield_empty_record() {
        let (fm, body) = parse_frontmatter("+++\n+++\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");

        let (fm, body) = parse_frontmatter("---\n---\nBody").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_syntaxes_decode_identically() {
        let toml = r#"+++
title = "Test Post"
date = "2024-01-15"
list = true
page_template = "blog.stpl"
sort_by = "title"
sort_order = "asc"
excerpt = "Short summary"
theme = "forest"
theme_variant = "dark"
tags = ["rust", "ssg"]
series = "intro"
+++
Body"#;

        let yaml = r#"---
title: "Test Post"
date: "2024-01-15"
list: true
page_template: blog.stpl
sort_by: title
sort_order: asc
excerpt: Short summary
theme: forest
theme_variant: dark
tags:
  - rust
  - ssg
series: intro
---
Body"#;

        let (from_toml, toml_body) = parse_frontmatter(toml).unwrap();
        let (from_yaml, yaml_body) = parse_frontmatter(yaml).unwrap();

        assert_eq!(from_toml, from_yaml);
        assert_eq!(toml_body, yaml_body);
        assert!(from_toml.is_list());
        assert_eq!(from_toml.tags, vec!["rust", "ssg"]);
        assert_eq!(
            from_toml.extra.get("series"),
            Some(&serde_json::Value::String("intro".to_string()))
        );
    }

    #[test]
    fn test_toml_date_literal_becomes_text() {
        let (fm, _) = parse_frontmatter("+++\ndate = 2024-01-15\n+++\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_unquoted_yaml_date_is_text() {
        let (fm, _) = parse_frontmatter("---\ndate: 2024-01-15\n---\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_toml_local_datetime_is_a_usable_date() {
        let (fm, _) = parse_frontmatter("+++\ndate = 2024-01-15T10:30:00\n+++\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-01-15T10:30:00"));
        assert_eq!(
            fm.date.as_deref().and_then(crate::date::parse_date),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_yaml_timestamp_is_a_usable_date() {
        let (fm, _) = parse_frontmatter("---\ndate: 2024-01-15 10:30:00\n---\n").unwrap();
        assert_eq!(
            fm.date.as_deref().and_then(crate::date::parse_date),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let (fm, body) = parse_frontmatter("\u{FEFF}+++\ntitle = \"Hi\"\n+++\nBody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(body, "Body");

        let (fm, body) = parse_frontmatter("\u{FEFF}# Plain").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "# Plain");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "+++\r\ntitle = \"Windows\"\r\n+++\r\n\r\nBody";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_blank_title_and_excerpt_are_absent() {
        let fm = Frontmatter {
            title: Some("   ".to_string()),
            excerpt: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(fm.title(), None);
        assert_eq!(fm.excerpt(), None);
        assert!(!fm.is_list());
    }

    #[test]
    fn test_from_value_rejects_scalars() {
        let err = Frontmatter::from_value(serde_json::json!("just a string")).unwrap_err();
        assert!(err.detail.contains("a string"));
    }
}
