//! Markdown parser using pulldown-cmark.

use std::path::Path;

use canopy_core::{
    Diagnostic, Frontmatter, ParseError, ParsedContent, config::MarkdownConfig,
    frontmatter::split_frontmatter,
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::{ContentParser, resolve::insert_word_stats, syntax::SyntaxHighlighter};

/// Markdown rendered to HTML along with what the document outline revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkdown {
    /// HTML fragment.
    pub html: String,
    /// Plain text of the first top-level `#` heading.
    pub title: Option<String>,
    /// Plain text of the first top-level paragraph.
    pub excerpt: Option<String>,
}

/// Markdown parser with optional syntax highlighting.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: Option<SyntaxHighlighter>,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level block whose text is being collected.
#[derive(Clone, Copy)]
enum Capture {
    Title,
    Excerpt,
}

impl MarkdownParser {
    /// Create a new markdown parser with default options and highlighting.
    pub fn new() -> Self {
        Self::build(Some(SyntaxHighlighter::default()))
    }

    /// Create a parser with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        Self::build(Some(SyntaxHighlighter::new(theme)))
    }

    /// Create a parser that leaves code blocks unhighlighted.
    pub fn without_highlighting() -> Self {
        Self::build(None)
    }

    /// Create a parser from the `[markdown]` configuration section.
    pub fn from_config(config: &MarkdownConfig) -> Self {
        if config.highlight {
            Self::with_theme(&config.syntax_theme)
        } else {
            Self::without_highlighting()
        }
    }

    fn build(highlighter: Option<SyntaxHighlighter>) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter,
            options,
        }
    }

    /// Render a markdown body (no frontmatter) to HTML.
    ///
    /// Title and excerpt are read off the event stream at nesting depth zero, so a heading
    /// inside a blockquote or a paragraph inside a list item never counts.
    pub fn render(&self, body: &str) -> RenderedMarkdown {
        let mut events = Vec::new();
        let mut title = None;
        let mut excerpt = None;

        let mut depth = 0usize;
        let mut capture: Option<(Capture, String)> = None;
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(body, self.options) {
            if let Some((_, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        depth -= 1;
                        if let Some((lang, code)) = code_block.take() {
                            let html = self.highlight(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(html)));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match &event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                    depth += 1;
                    continue;
                }
                Event::Start(tag) => {
                    if depth == 0 && capture.is_none() {
                        capture = match tag {
                            Tag::Heading {
                                level: HeadingLevel::H1,
                                ..
                            } if title.is_none() => Some((Capture::Title, String::new())),
                            Tag::Paragraph if excerpt.is_none() => {
                                Some((Capture::Excerpt, String::new()))
                            }
                            _ => None,
                        };
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0
                        && let Some((target, text)) = capture.take()
                    {
                        let text = collapse_whitespace(&text);
                        if !text.is_empty() {
                            match target {
                                Capture::Title => title = Some(text),
                                Capture::Excerpt => excerpt = Some(text),
                            }
                        }
                    }
                }
                Event::Text(text) | Event::Code(text) | Event::InlineMath(text) => {
                    if let Some((_, buffer)) = capture.as_mut() {
                        buffer.push_str(text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, buffer)) = capture.as_mut() {
                        buffer.push(' ');
                    }
                }
                _ => {}
            }

            events.push(event);
        }

        let mut html = String::with_capacity(body.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        RenderedMarkdown {
            html,
            title,
            excerpt,
        }
    }

    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        match &self.highlighter {
            Some(highlighter) => highlighter.highlight(code, lang),
            None => crate::syntax::plain_code_block(code, lang),
        }
    }
}

impl ContentParser for MarkdownParser {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent, ParseError> {
        let mut diagnostics = Vec::new();

        let (frontmatter, body) = match split_frontmatter(content) {
            Ok(None) => (Frontmatter::default(), content),
            Ok(Some(block)) => match block.decode() {
                Ok(frontmatter) => (frontmatter, block.body),
                Err(e) => {
                    diagnostics.push(degraded(path, &e));
                    (Frontmatter::default(), block.body)
                }
            },
            Err(e) => {
                diagnostics.push(degraded(path, &e));
                (Frontmatter::default(), content)
            }
        };

        let rendered = self.render(body);

        let mut parsed = ParsedContent {
            title: rendered.title.unwrap_or_default(),
            frontmatter,
            content: rendered.html,
            excerpt: rendered.excerpt,
            diagnostics,
            ..Default::default()
        };
        insert_word_stats(&mut parsed.metadata, body);

        Ok(parsed)
    }
}

fn degraded(path: &Path, error: &ParseError) -> Diagnostic {
    tracing::warn!(
        path = %path.display(),
        error = %error,
        "ignoring malformed frontmatter"
    );
    Diagnostic::new(
        path,
        error.kind.as_str(),
        format!("{}; using empty frontmatter", error.detail),
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
