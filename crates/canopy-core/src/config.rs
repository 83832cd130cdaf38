//! Site configuration management.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Marker a list page body may contain to place the rendered listing.
pub const DEFAULT_LIST_MARKER: &str = "<!-- BLOG_POSTS_LIST -->";

/// Main configuration structure for Canopy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Content discovery settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Parser registry settings.
    #[serde(default)]
    pub parsers: ParsersConfig,

    /// Markdown rendering settings.
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    #[serde(default = "default_title")]
    pub title: String,
}

/// Content discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root directory.
    #[serde(default = "default_content_dir")]
    pub dir: String,

    /// Placeholder token for the rendered list inside a list page.
    #[serde(default = "default_list_marker")]
    pub list_marker: String,

    /// Whether to walk hidden files and directories.
    #[serde(default)]
    pub include_hidden: bool,
}

/// Parser registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsersConfig {
    /// Extra extension → existing extension bindings (e.g. `conf = "toml"`).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Markdown rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Whether fenced code blocks are syntax highlighted.
    #[serde(default = "default_true")]
    pub highlight: bool,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
}

// Default value functions
fn default_title() -> String {
    "Canopy Site".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_list_marker() -> String {
    DEFAULT_LIST_MARKER.to_string()
}

fn default_true() -> bool {
    true
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            list_marker: default_list_marker(),
            include_hidden: false,
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            syntax_theme: default_syntax_theme(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `CANOPY__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("CANOPY").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.content.dir.trim().is_empty() {
            return Err(CoreError::config("content.dir cannot be empty"));
        }

        if self.content.list_marker.trim().is_empty() {
            return Err(CoreError::config("content.list_marker cannot be empty"));
        }

        for (alias, target) in &self.parsers.aliases {
            if alias.trim_start_matches('.').is_empty() || target.trim_start_matches('.').is_empty()
            {
                return Err(CoreError::config(format!(
                    "parsers.aliases entry '{alias}' = '{target}' must name two extensions"
                )));
            }
        }

        if self.site.title.is_empty() {
            tracing::warn!("site.title is empty");
        }

        Ok(())
    }

    /// Content root resolved against a base directory.
    pub fn content_dir(&self, base: &Path) -> std::path::PathBuf {
        base.join(&self.content.dir)
    }
}
