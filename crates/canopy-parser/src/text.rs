//! Plain text parser.

use std::path::Path;

use canopy_core::{ParseError, ParsedContent};

use crate::{
    ContentParser,
    resolve::{first_line_excerpt, insert_word_stats},
};

/// Parser for plain text files.
///
/// Text has no frontmatter and no format-native title; the content is handed on as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl ContentParser for TextParser {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, content: &str, _path: &Path) -> Result<ParsedContent, ParseError> {
        let mut parsed = ParsedContent {
            content: content.to_string(),
            excerpt: first_line_excerpt(content),
            ..Default::default()
        };
        insert_word_stats(&mut parsed.metadata, content);

        Ok(parsed)
    }
}
