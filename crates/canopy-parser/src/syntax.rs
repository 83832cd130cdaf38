//! Syntax highlighting for fenced code blocks.

use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::SyntaxSet,
};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
    theme_name: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter for the named theme.
    ///
    /// An unknown theme name falls back to [`DEFAULT_THEME`].
    pub fn new(theme: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;

        let (theme_name, theme) = match themes.remove(theme) {
            Some(found) => (theme.to_string(), Some(found)),
            None => {
                tracing::warn!(theme, fallback = DEFAULT_THEME, "unknown syntax theme");
                (DEFAULT_THEME.to_string(), themes.remove(DEFAULT_THEME))
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name,
        }
    }

    /// Name of the active theme.
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Highlight code with the given language token.
    ///
    /// Unknown languages and highlighting failures produce an escaped
    /// `<pre><code>` block instead.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|token| self.syntax_set.find_syntax_by_token(token));

        match (syntax, self.theme.as_ref()) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
                    .unwrap_or_else(|_| plain_code_block(code, lang))
            }
            _ => plain_code_block(code, lang),
        }
    }
}

/// Escaped code block without highlighting.
pub fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", html_escape(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{}</code></pre>\n", html_escape(code))
}

/// Escape HTML special characters.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
