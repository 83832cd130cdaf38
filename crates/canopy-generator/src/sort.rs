//! List page ordering.

use std::{cmp::Ordering, fmt, path::Path};

use canopy_core::{ContentItem, Diagnostic, Frontmatter, date::parse_date};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field a list page is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Filename,
}

impl SortKey {
    /// Parse a `sort_by` value, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "filename" => Some(Self::Filename),
            _ => None,
        }
    }

    /// Direction used when `sort_order` is not given.
    pub fn default_order(self) -> SortOrder {
        match self {
            Self::Date => SortOrder::Desc,
            Self::Title | Self::Filename => SortOrder::Asc,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a `sort_order` value, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Filename => "filename",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Effective ordering of a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            order: SortOrder::Desc,
        }
    }
}

impl SortConfig {
    /// Read `sort_by` / `sort_order` from a list page's frontmatter.
    ///
    /// Unknown values fall back (`date` for the key, `asc` for the direction) and are
    /// reported as diagnostics against `path`. The default direction follows the key as
    /// written, so an unknown `sort_by` without `sort_order` orders by date ascending.
    pub fn from_frontmatter(frontmatter: &Frontmatter, path: &Path) -> (Self, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();

        let (key, default_order) = match frontmatter.sort_by.as_deref() {
            None => (SortKey::Date, SortKey::Date.default_order()),
            Some(raw) => match SortKey::parse(raw) {
                Some(key) => (key, key.default_order()),
                None => {
                    warn!(path = %path.display(), sort_by = raw, "unknown sort_by, using date");
                    diagnostics.push(Diagnostic::new(
                        path,
                        "sort_by",
                        format!(
                            "unknown value '{raw}'; expected date, title or filename; using date"
                        ),
                    ));
                    (SortKey::Date, SortOrder::Asc)
                }
            },
        };

        let order = match frontmatter.sort_order.as_deref() {
            None => default_order,
            Some(raw) => SortOrder::parse(raw).unwrap_or_else(|| {
                warn!(path = %path.display(), sort_order = raw, "unknown sort_order, using asc");
                diagnostics.push(Diagnostic::new(
                    path,
                    "sort_order",
                    format!("unknown value '{raw}'; expected asc or desc; using asc"),
                ));
                SortOrder::Asc
            }),
        };

        (Self { key, order }, diagnostics)
    }
}

/// A list member together with the file name it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEntry {
    pub file_name: String,
    pub item: ContentItem,
}

/// Order list members.
///
/// All sorts are stable. Date ordering puts every item with a parseable date before
/// (`desc`) or after (`asc`) the undated ones, which are always by file name ascending.
pub fn sort_entries(entries: Vec<SortEntry>, sort: SortConfig) -> Vec<SortEntry> {
    match sort.key {
        SortKey::Date => sort_by_date(entries, sort.order),
        SortKey::Title => {
            let mut keyed: Vec<(String, SortEntry)> = entries
                .into_iter()
                .map(|entry| (entry.item.title.to_lowercase(), entry))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| sort.order.apply(a.cmp(b)));
            keyed.into_iter().map(|(_, entry)| entry).collect()
        }
        SortKey::Filename => {
            let mut entries = entries;
            entries.sort_by(|a, b| sort.order.apply(a.file_name.cmp(&b.file_name)));
            entries
        }
    }
}

fn sort_by_date(entries: Vec<SortEntry>, order: SortOrder) -> Vec<SortEntry> {
    let (mut dated, mut undated): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .map(|entry| {
            let date = entry.item.date.as_deref().and_then(parse_date);
            (date, entry)
        })
        .partition(|(date, _)| date.is_some());

    dated.sort_by(|(a, _), (b, _)| order.apply(a.cmp(b)));
    undated.sort_by(|(_, a), (_, b)| a.file_name.cmp(&b.file_name));

    let (first, second) = match order {
        SortOrder::Desc => (dated, undated),
        SortOrder::Asc => (undated, dated),
    };

    first
        .into_iter()
        .chain(second)
        .map(|(_, entry)| entry)
        .collect()
}
