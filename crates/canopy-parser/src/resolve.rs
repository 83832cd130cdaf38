//! Title and excerpt resolution.

use std::{collections::HashMap, path::Path};

use canopy_core::{ParsedContent, content::INDEX_STEM};

/// Reading speed used for `reading_time`.
const WORDS_PER_MINUTE: usize = 200;

/// Title used when a path yields no words at all.
pub const UNTITLED: &str = "Untitled";

/// Resolve the display title of a parsed document.
///
/// Frontmatter title first, then the format-native title, then one derived from the path.
/// The result is never empty.
pub fn resolve_title(parsed: &ParsedContent, path: &Path) -> String {
    if let Some(title) = parsed.frontmatter.title() {
        return title.to_string();
    }

    let native = parsed.title.trim();
    if !native.is_empty() {
        return native.to_string();
    }

    title_from_path(path)
}

/// Resolve the excerpt of a parsed document.
pub fn resolve_excerpt(parsed: &ParsedContent) -> Option<String> {
    parsed
        .frontmatter
        .excerpt()
        .map(str::to_string)
        .or_else(|| {
            parsed
                .excerpt
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
}

/// Derive a human title from a file path.
///
/// `my-post.md` becomes `My Post`. An `index` file takes its directory's name.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let source = if stem.eq_ignore_ascii_case(INDEX_STEM) {
        path.parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(stem)
    } else {
        stem
    };

    let title = source
        .split(['/', '\\', '_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First non-blank line of a text, trimmed.
pub fn first_line_excerpt(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// First line of an HTML fragment that still has text once tags are removed.
pub fn html_excerpt(html: &str) -> Option<String> {
    html.lines()
        .map(strip_tags)
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|line| !line.is_empty())
}

/// Remove HTML tags, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

/// Record `word_count` and `reading_time` for a body of text.
pub fn insert_word_stats(metadata: &mut HashMap<String, String>, text: &str) {
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);

    metadata.insert("word_count".to_string(), words.to_string());
    metadata.insert("reading_time".to_string(), minutes.to_string());
}
