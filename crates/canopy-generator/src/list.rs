//! List page aggregation.
//!
//! A directory whose index document sets `list = true` becomes a list page holding a
//! sorted summary of the other documents directly inside that directory.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use canopy_core::{ContentItem, Diagnostic, date::parse_date};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    collector::Document,
    sort::{SortConfig, SortEntry, SortKey, sort_entries},
};

/// An aggregating index page and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPage {
    /// Directory relative to the content root.
    pub dir: PathBuf,

    /// URL of the index document.
    pub index_url: String,

    /// Effective ordering.
    pub sort: SortConfig,

    /// Sibling documents in display order.
    pub items: Vec<ContentItem>,

    /// Whether the index body contains the list marker.
    pub has_marker: bool,
}

/// Build every list page found among `documents`.
///
/// `documents` must be in directory listing order; it decides which index wins when a
/// directory has more than one and the order of equal sort keys.
pub fn aggregate(documents: &[Document], marker: &str) -> (Vec<ListPage>, Vec<Diagnostic>) {
    let mut by_dir: BTreeMap<&Path, Vec<&Document>> = BTreeMap::new();
    for document in documents {
        by_dir.entry(document.dir()).or_default().push(document);
    }

    let mut pages = Vec::new();
    let mut diagnostics = Vec::new();

    for (dir, siblings) in by_dir {
        let mut indexes = siblings.iter().filter(|doc| doc.is_index());
        let Some(index) = indexes.next() else {
            continue;
        };

        for duplicate in indexes {
            warn!(
                path = %duplicate.path.display(),
                index = %index.path.display(),
                "directory has more than one index document"
            );
            diagnostics.push(Diagnostic::new(
                &duplicate.path,
                "index",
                format!(
                    "directory already has index document {}; ignoring this one",
                    index.path.display()
                ),
            ));
        }

        if !index.frontmatter.is_list() {
            continue;
        }

        let (sort, sort_diagnostics) = SortConfig::from_frontmatter(&index.frontmatter, &index.path);
        diagnostics.extend(sort_diagnostics);

        let members: Vec<&Document> = siblings
            .iter()
            .copied()
            .filter(|doc| !doc.is_index())
            .collect();

        if sort.key == SortKey::Date {
            diagnostics.extend(members.iter().copied().filter_map(unusable_date));
        }

        let entries = members
            .into_iter()
            .map(|doc| SortEntry {
                file_name: doc.file_name(),
                item: doc.item(),
            })
            .collect();

        let items: Vec<ContentItem> = sort_entries(entries, sort)
            .into_iter()
            .map(|entry| entry.item)
            .collect();

        debug!(
            dir = %dir.display(),
            items = items.len(),
            sort_by = %sort.key,
            sort_order = %sort.order,
            "aggregated list page"
        );

        pages.push(ListPage {
            dir: dir.to_path_buf(),
            index_url: index.url.clone(),
            sort,
            items,
            has_marker: index.content.contains(marker),
        });
    }

    (pages, diagnostics)
}

/// Report a list member whose `date` is set but cannot be read.
fn unusable_date(document: &Document) -> Option<Diagnostic> {
    let raw = document.frontmatter.date.as_deref()?;
    if parse_date(raw).is_some() {
        return None;
    }

    warn!(path = %document.path.display(), date = raw, "unrecognized date, listing as undated");
    Some(Diagnostic::new(
        &document.path,
        "date",
        format!("unrecognized date '{raw}'; listing as undated"),
    ))
}

#[cfg(test)]
mod tests {
    use canopy_core::{Frontmatter, config::DEFAULT_LIST_MARKER, content::url_for};

    use super::*;
    use crate::sort::SortOrder;

    fn doc(path: &str, frontmatter: Frontmatter, content: &str) -> Document {
        let path = PathBuf::from(path);
        Document {
            url: url_for(&path),
            parser: "markdown",
            title: path.file_stem().unwrap().to_string_lossy().into_owned(),
            excerpt: None,
            frontmatter,
            content: content.to_string(),
            metadata: BTreeMap::new(),
            path,
        }
    }

    fn dated(path: &str, date: Option<&str>) -> Document {
        doc(
            path,
            Frontmatter {
                date: date.map(str::to_string),
                ..Default::default()
            },
            "",
        )
    }

    fn list_index(path: &str, content: &str) -> Document {
        doc(
            path,
            Frontmatter {
                list: Some(true),
                ..Default::default()
            },
            content,
        )
    }

    fn urls(page: &ListPage) -> Vec<&str> {
        page.items.iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn test_default_date_ordering() {
        let documents = vec![
            dated("posts/first.md", Some("2024-01-01")),
            list_index("posts/index.md", ""),
            dated("posts/no-date.md", None),
            dated("posts/second.md", Some("2024-03-01")),
        ];

        let (pages, diagnostics) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert!(diagnostics.is_empty());
        assert_eq!(pages.len(), 1);

        let page = &pages[0];
        assert_eq!(page.dir, PathBuf::from("posts"));
        assert_eq!(page.index_url, "/posts/");
        assert_eq!(
            urls(page),
            ["/posts/second", "/posts/first", "/posts/no-date"]
        );
        assert!(!page.has_marker);
    }

    #[test]
    fn test_aggregation_is_one_level_deep() {
        let documents = vec![
            list_index("blog/index.md", ""),
            dated("blog/post.md", Some("2024-01-01")),
            list_index("blog/archive/index.md", ""),
            dated("blog/archive/old.md", Some("2020-01-01")),
            dated("other.md", Some("2024-01-01")),
        ];

        let (pages, _) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert_eq!(pages.len(), 2);

        let blog = pages.iter().find(|p| p.dir == Path::new("blog")).unwrap();
        assert_eq!(urls(blog), ["/blog/post"]);

        let archive = pages
            .iter()
            .find(|p| p.dir == Path::new("blog/archive"))
            .unwrap();
        assert_eq!(urls(archive), ["/blog/archive/old"]);
    }

    #[test]
    fn test_index_without_list_flag_is_not_a_list_page() {
        let documents = vec![
            doc("docs/index.md", Frontmatter::default(), ""),
            dated("docs/intro.md", None),
        ];

        let (pages, _) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert!(pages.is_empty());
    }

    #[test]
    fn test_marker_detection() {
        let documents = vec![list_index(
            "index.md",
            "<p>Intro</p>\n<!-- BLOG_POSTS_LIST -->\n",
        )];

        let (pages, _) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert!(pages[0].has_marker);
        assert_eq!(pages[0].index_url, "/");
        assert!(pages[0].items.is_empty());
    }

    #[test]
    fn test_duplicate_index_first_wins() {
        let documents = vec![
            list_index("posts/index.md", ""),
            doc("posts/index.toml", Frontmatter::default(), ""),
            dated("posts/a.md", None),
        ];

        let (pages, diagnostics) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert_eq!(pages.len(), 1);
        assert_eq!(urls(&pages[0]), ["/posts/a"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, PathBuf::from("posts/index.toml"));
        assert_eq!(diagnostics[0].field, "index");
    }

    #[test]
    fn test_sort_diagnostics_are_reported() {
        let index = doc(
            "posts/index.md",
            Frontmatter {
                list: Some(true),
                sort_by: Some("weight".to_string()),
                ..Default::default()
            },
            "",
        );
        let documents = vec![
            dated("posts/a.md", Some("2024-01-01")),
            index,
            dated("posts/b.md", Some("2024-02-01")),
        ];

        let (pages, diagnostics) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "sort_by");
        assert_eq!(pages[0].sort.order, SortOrder::Asc);
        assert_eq!(urls(&pages[0]), ["/posts/a", "/posts/b"]);
    }

    #[test]
    fn test_unrecognized_date_is_reported() {
        let documents = vec![
            list_index("posts/index.md", ""),
            dated("posts/a.md", Some("2024-01-01")),
            dated("posts/b.md", Some("someday")),
            dated("posts/c.md", Some("2024-01-15T10:30:00")),
            dated("posts/d.md", None),
        ];

        let (pages, diagnostics) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert_eq!(urls(&pages[0]), ["/posts/c", "/posts/a", "/posts/b", "/posts/d"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, PathBuf::from("posts/b.md"));
        assert_eq!(diagnostics[0].field, "date");
        assert!(diagnostics[0].message.contains("someday"));
    }

    #[test]
    fn test_dates_are_not_checked_for_title_lists() {
        let index = doc(
            "posts/index.md",
            Frontmatter {
                list: Some(true),
                sort_by: Some("title".to_string()),
                ..Default::default()
            },
            "",
        );
        let documents = vec![index, dated("posts/b.md", Some("someday"))];

        let (_, diagnostics) = aggregate(&documents, DEFAULT_LIST_MARKER);
        assert!(diagnostics.is_empty());
    }
}
