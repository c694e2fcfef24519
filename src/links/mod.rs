//! Bookmark categories and links.
//!
//! Categories are collapsible panels on the start page; each link
//! belongs to exactly one category by NAME (not id), matching the
//! store's data model. This module owns the record types, the link
//! fetcher with its favicon derivation, the per-category memoization
//! cache, and the drag-reorder index math.

mod cache;
mod fetcher;
mod order;

use std::sync::Arc;

use crate::store::Document;

pub use cache::LinkCache;
pub use fetcher::{fetch_links, icon_url, LinkError};
pub use order::{reordered, target_index, ROW_HEIGHT};

// ============================================================================
// Records
// ============================================================================

/// A named grouping of links, shown as a collapsible panel.
///
/// Identity is the document id; display order is the position in the
/// category sequence. `name` uses `Arc<str>` because it is cloned into
/// fetch tickets, cache keys, and events.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: Arc<str>,
}

impl Category {
    /// Decode a category document, filtering unusable records.
    ///
    /// Returns `None` when the name field is missing, empty, or
    /// whitespace-only — such records are never rendered, never
    /// toggled, never reordered.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let name = doc.field_str("name")?;
        if name.trim().is_empty() {
            tracing::debug!(id = %doc.id, "Skipping blank-named category");
            return None;
        }
        Some(Self {
            id: doc.id.clone(),
            name: Arc::from(name),
        })
    }
}

/// Decode a category collection, dropping blank-named records.
pub fn decode_categories(docs: &[Document]) -> Vec<Category> {
    docs.iter().filter_map(Category::from_document).collect()
}

/// A bookmarked URL belonging to one category.
///
/// `icon_url` is derived from the link's hostname on every fetch and is
/// never stored; links whose URL does not parse simply have no icon.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub name: Arc<str>,
    pub url: Arc<str>,
    pub category: Arc<str>,
    pub icon_url: Option<Arc<str>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_category() {
        let doc = Document::new("c1", json!({ "name": "Travel" }));
        let cat = Category::from_document(&doc).unwrap();
        assert_eq!(cat.id, "c1");
        assert_eq!(&*cat.name, "Travel");
    }

    #[test]
    fn test_blank_names_filtered() {
        for data in [json!({ "name": "" }), json!({ "name": "   " }), json!({})] {
            let doc = Document::new("c1", data);
            assert!(Category::from_document(&doc).is_none());
        }
    }

    #[test]
    fn test_decode_categories_keeps_order_and_drops_blanks() {
        let docs = vec![
            Document::new("a", json!({ "name": "Work" })),
            Document::new("b", json!({ "name": "  " })),
            Document::new("c", json!({ "name": "Travel" })),
        ];
        let cats = decode_categories(&docs);
        assert_eq!(cats.len(), 2);
        assert_eq!(&*cats[0].name, "Work");
        assert_eq!(&*cats[1].name, "Travel");
    }
}
