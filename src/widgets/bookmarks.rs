use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::Document;

/// The fixed shelves of the quick-bookmark strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Popular,
    Travel,
    Shopping,
}

impl Shelf {
    pub const ALL: [Shelf; 3] = [Shelf::Popular, Shelf::Travel, Shelf::Shopping];

    pub fn name(self) -> &'static str {
        match self {
            Shelf::Popular => "Popular",
            Shelf::Travel => "Travel",
            Shelf::Shopping => "Shopping",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    fn index(self) -> usize {
        match self {
            Shelf::Popular => 0,
            Shelf::Travel => 1,
            Shelf::Shopping => 2,
        }
    }
}

/// One entry on a shelf. Built-in entries have no id and cannot be
/// deleted; user entries carry their document id.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub id: Option<String>,
    pub name: Arc<str>,
    pub url: Arc<str>,
}

impl Bookmark {
    fn from_document(doc: &Document) -> Option<(Shelf, Self)> {
        let shelf = Shelf::from_name(doc.field_str("category")?)?;
        Some((
            shelf,
            Self {
                id: Some(doc.id.clone()),
                name: Arc::from(doc.field_str("name")?),
                url: Arc::from(doc.field_str("link")?),
            },
        ))
    }

    /// Store payload for a new user bookmark, or `None` when a required
    /// field is blank.
    pub fn payload(name: &str, url: &str, shelf: Shelf) -> Option<Value> {
        if name.trim().is_empty() || url.trim().is_empty() {
            return None;
        }
        Some(json!({ "name": name, "link": url, "category": shelf.name() }))
    }
}

/// Built-in defaults, always shown ahead of the user's own entries.
fn defaults(shelf: Shelf) -> &'static [(&'static str, &'static str)] {
    match shelf {
        Shelf::Popular => &[
            ("Google", "https://www.google.com"),
            ("Facebook", "https://www.facebook.com"),
            ("YouTube", "https://www.youtube.com"),
            ("LinkedIn", "https://www.linkedin.com"),
        ],
        Shelf::Travel => &[
            ("Booking.com", "https://www.booking.com"),
            ("Emirates", "https://www.emirates.com"),
            ("Hotels.com", "https://www.hotels.com"),
            ("Trip Advisor", "https://www.tripadvisor.com"),
        ],
        Shelf::Shopping => &[
            ("Amazon", "https://www.amazon.com"),
            ("Flipkart", "https://www.flipkart.com"),
            ("Rediff", "https://www.rediff.com"),
            ("Myntra", "https://www.myntra.com"),
        ],
    }
}

/// Per-user bookmarks collection path.
pub fn bookmarks_collection(user_id: &str) -> String {
    format!("users/{user_id}/bookmarks")
}

/// Quick-bookmark strip state: the user's stored entries per shelf,
/// merged with the built-ins for display. Deletion is optimistic after
/// the store confirms: the entry is filtered out locally, no refetch.
#[derive(Debug, Default)]
pub struct BookmarkBoard {
    user: [Vec<Bookmark>; 3],
    pub selected_shelf: usize,
    pub selected: usize,
}

impl BookmarkBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the user's entries from a collection read. Documents
    /// with an unknown shelf name or missing fields are skipped.
    pub fn set_user_bookmarks(&mut self, docs: &[Document]) {
        self.user = Default::default();
        for doc in docs {
            if let Some((shelf, bookmark)) = Bookmark::from_document(doc) {
                self.user[shelf.index()].push(bookmark);
            }
        }
    }

    /// Built-ins followed by the user's entries for one shelf.
    pub fn combined(&self, shelf: Shelf) -> Vec<Bookmark> {
        defaults(shelf)
            .iter()
            .map(|(name, url)| Bookmark {
                id: None,
                name: Arc::from(*name),
                url: Arc::from(*url),
            })
            .chain(self.user[shelf.index()].iter().cloned())
            .collect()
    }

    pub fn shelf(&self) -> Shelf {
        Shelf::ALL[self.selected_shelf.min(Shelf::ALL.len() - 1)]
    }

    pub fn cycle_shelf(&mut self) {
        self.selected_shelf = (self.selected_shelf + 1) % Shelf::ALL.len();
        self.selected = 0;
    }

    pub fn apply_added(&mut self, shelf: Shelf, bookmark: Bookmark) {
        self.user[shelf.index()].push(bookmark);
    }

    pub fn apply_removed(&mut self, shelf: Shelf, id: &str) {
        self.user[shelf.index()].retain(|b| b.id.as_deref() != Some(id));
        let len = self.combined(shelf).len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn selected_bookmark(&self) -> Option<Bookmark> {
        self.combined(self.shelf()).into_iter().nth(self.selected)
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.combined(self.shelf()).len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, name: &str, url: &str, shelf: &str) -> Document {
        Document::new(id, json!({ "name": name, "link": url, "category": shelf }))
    }

    #[test]
    fn test_defaults_always_present() {
        let board = BookmarkBoard::new();
        let popular = board.combined(Shelf::Popular);
        assert_eq!(popular.len(), 4);
        assert_eq!(&*popular[0].name, "Google");
        assert!(popular.iter().all(|b| b.id.is_none()));
    }

    #[test]
    fn test_user_entries_merge_after_defaults() {
        let mut board = BookmarkBoard::new();
        board.set_user_bookmarks(&[doc("b1", "Kayak", "https://kayak.com", "Travel")]);

        let travel = board.combined(Shelf::Travel);
        assert_eq!(travel.len(), 5);
        assert_eq!(&*travel[4].name, "Kayak");
        assert_eq!(travel[4].id.as_deref(), Some("b1"));

        // Other shelves are untouched
        assert_eq!(board.combined(Shelf::Shopping).len(), 4);
    }

    #[test]
    fn test_unknown_shelf_skipped() {
        let mut board = BookmarkBoard::new();
        board.set_user_bookmarks(&[doc("b1", "X", "https://x.com", "Gaming")]);
        for shelf in Shelf::ALL {
            assert_eq!(board.combined(shelf).len(), 4);
        }
    }

    #[test]
    fn test_payload_requires_fields() {
        assert!(Bookmark::payload("", "https://x.com", Shelf::Popular).is_none());
        assert!(Bookmark::payload("X", "  ", Shelf::Popular).is_none());

        let payload = Bookmark::payload("X", "https://x.com", Shelf::Shopping).unwrap();
        assert_eq!(payload["category"], "Shopping");
    }

    #[test]
    fn test_optimistic_removal() {
        let mut board = BookmarkBoard::new();
        board.set_user_bookmarks(&[doc("b1", "Kayak", "https://kayak.com", "Travel")]);

        board.apply_removed(Shelf::Travel, "b1");
        assert_eq!(board.combined(Shelf::Travel).len(), 4);

        // Removing a built-in is impossible: they have no id
        board.apply_removed(Shelf::Travel, "anything");
        assert_eq!(board.combined(Shelf::Travel).len(), 4);
    }

    #[test]
    fn test_shelf_cycling_resets_selection() {
        let mut board = BookmarkBoard::new();
        board.selected = 3;
        board.cycle_shelf();
        assert_eq!(board.shelf(), Shelf::Travel);
        assert_eq!(board.selected, 0);
        board.cycle_shelf();
        board.cycle_shelf();
        assert_eq!(board.shelf(), Shelf::Popular);
    }

    #[test]
    fn test_selected_bookmark() {
        let board = BookmarkBoard::new();
        assert_eq!(&*board.selected_bookmark().unwrap().name, "Google");
    }
}
