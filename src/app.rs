use std::borrow::Cow;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::links::{self, Category, Link, LinkCache};
use crate::theme::{Palette, ThemeVariant};
use crate::widgets::{Bookmark, BookmarkBoard, Calculator, MonthView, Note, Notepad, Shelf, WeatherCard};

/// Inline message shown when a category's links fail to load.
pub const LINKS_ERROR_MESSAGE: &str = "Failed to load links.";
/// Status message shown when persisting a reorder fails.
pub const ORDER_ERROR_MESSAGE: &str = "Failed to save category order.";

// ============================================================================
// Expansion State
// ============================================================================

/// Which category panel is open. At most one category is ever expanded;
/// opening another implicitly closes the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Closed,
    Open(usize),
}

/// A fetch the UI layer must run for the controller.
///
/// Tagged with the category it was issued for and the generation at
/// issue time so a result that arrives after the controller has moved
/// on is discarded instead of being applied to the wrong panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub category: Arc<str>,
    pub generation: u64,
}

/// Result of a toggle transition.
#[derive(Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The panel closed (or the toggle hit the already-open category).
    Closed,
    /// The panel opened and was served from the cache.
    Opened,
    /// The panel opened; the caller must run this fetch and feed the
    /// result back through [`AppEvent::LinksLoaded`].
    Fetch(FetchTicket),
}

// ============================================================================
// Reorder
// ============================================================================

/// An optimistic reorder awaiting persistence.
///
/// `order` is the new authoritative in-memory order that must be
/// written to the order document; `previous` is the snapshot to restore
/// if the write fails.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWrite {
    pub order: Vec<Category>,
    pub previous: Vec<Category>,
}

impl OrderWrite {
    /// Payload for the wholesale order-document overwrite.
    pub fn payload(&self) -> Value {
        json!({
            "categories": self
                .order
                .iter()
                .map(|c| json!({ "id": c.id, "name": &*c.name }))
                .collect::<Vec<_>>()
        })
    }
}

// ============================================================================
// Focus and Events
// ============================================================================

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Bookmarks,
    Notepad,
    Calculator,
    Calendar,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Categories => Focus::Bookmarks,
            Focus::Bookmarks => Focus::Notepad,
            Focus::Notepad => Focus::Calculator,
            Focus::Calculator => Focus::Calendar,
            Focus::Calendar => Focus::Categories,
        }
    }
}

/// Events from background store tasks.
pub enum AppEvent {
    /// Category list (re)loaded.
    CategoriesLoaded(Result<Vec<Category>, String>),
    /// Links fetched for a category panel.
    ///
    /// `generation` is the counter value when the fetch was spawned;
    /// stale generations are discarded on arrival.
    LinksLoaded {
        category: Arc<str>,
        generation: u64,
        result: Result<Vec<Link>, String>,
    },
    /// The order document write succeeded.
    OrderSaved,
    /// The order document write failed; `previous` is the order to
    /// restore.
    OrderSaveFailed {
        previous: Vec<Category>,
        error: String,
    },
    NoteSaved(Result<Note, String>),
    NoteDeleted {
        id: String,
        result: Result<(), String>,
    },
    BookmarkAdded {
        shelf: Shelf,
        result: Result<Bookmark, String>,
    },
    BookmarkRemoved {
        shelf: Shelf,
        id: String,
        result: Result<(), String>,
    },
}

// ============================================================================
// Dashboard State
// ============================================================================

/// Central start-page state.
///
/// Purely synchronous: every transition runs to completion on the event
/// loop. Store IO lives in tasks the UI layer spawns from the tickets
/// and write requests these methods return; results come back through
/// [`apply_event`](Self::apply_event).
pub struct Dashboard {
    // Categories and the link panel
    pub categories: Vec<Category>,
    pub selected_category: usize,
    pub expansion: Expansion,
    pub cache: LinkCache,
    /// Links shown in the open panel (cache entry or fresh fetch).
    pub visible_links: Arc<Vec<Link>>,
    pub selected_link: usize,
    pub links_loading: bool,
    pub links_error: Option<&'static str>,
    /// Generation counter for in-flight link fetches. Bumped on every
    /// issued fetch; results carrying an older generation are dropped.
    links_generation: u64,

    /// Gates drag-reordering. When locked, drags are ignored.
    pub locked: bool,

    pub categories_error: Option<String>,

    // Widgets
    pub focus: Focus,
    pub calculator: Calculator,
    pub notepad: Notepad,
    pub bookmarks: BookmarkBoard,
    pub calendar: MonthView,
    pub weather: WeatherCard,
    pub today: NaiveDate,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: Palette,

    // Chrome
    /// Status message with its creation time; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl Dashboard {
    pub fn new(categories: Vec<Category>, theme: ThemeVariant, today: NaiveDate) -> Self {
        Self {
            categories,
            selected_category: 0,
            expansion: Expansion::Closed,
            cache: LinkCache::new(),
            visible_links: Arc::new(Vec::new()),
            selected_link: 0,
            links_loading: false,
            links_error: None,
            links_generation: 0,
            locked: false,
            categories_error: None,
            focus: Focus::Categories,
            calculator: Calculator::new(),
            notepad: Notepad::new(),
            bookmarks: BookmarkBoard::new(),
            calendar: MonthView::containing(today),
            weather: WeatherCard::default(),
            today,
            theme_variant: theme,
            theme: theme.palette(),
            status_message: None,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------
    // Expansion controller
    // ------------------------------------------------------------------

    /// Toggle the panel for the category at `index`.
    ///
    /// `Open(i)` toggled again closes; any other state opens `index`,
    /// implicitly closing whatever was open. Returns `None` for an
    /// out-of-bounds index (state unchanged).
    pub fn toggle_category(&mut self, index: usize) -> Option<ToggleOutcome> {
        if index >= self.categories.len() {
            return None;
        }

        if self.expansion == Expansion::Open(index) {
            self.close_panel();
            return Some(ToggleOutcome::Closed);
        }

        let name = Arc::clone(&self.categories[index].name);
        self.expansion = Expansion::Open(index);
        self.selected_category = index;
        self.selected_link = 0;
        self.links_error = None;

        if let Some(cached) = self.cache.get(&name) {
            self.visible_links = cached;
            self.links_loading = false;
            tracing::debug!(category = %name, "Link panel served from cache");
            return Some(ToggleOutcome::Opened);
        }

        self.visible_links = Arc::new(Vec::new());
        self.links_loading = true;
        self.links_generation = self.links_generation.wrapping_add(1);
        tracing::debug!(
            category = %name,
            generation = self.links_generation,
            "Link panel needs fetch"
        );
        Some(ToggleOutcome::Fetch(FetchTicket {
            category: name,
            generation: self.links_generation,
        }))
    }

    /// Close the open panel. Used by toggle, Esc, and the hosting
    /// environment's outside-pointer notification. Never touches the
    /// cache.
    pub fn close_panel(&mut self) {
        self.expansion = Expansion::Closed;
        self.visible_links = Arc::new(Vec::new());
        self.links_loading = false;
        self.links_error = None;
        self.selected_link = 0;
    }

    /// The open category, if any.
    pub fn open_category(&self) -> Option<&Category> {
        match self.expansion {
            Expansion::Closed => None,
            Expansion::Open(i) => self.categories.get(i),
        }
    }

    fn apply_links(
        &mut self,
        category: &Arc<str>,
        generation: u64,
        result: Result<Vec<Link>, String>,
    ) {
        if generation != self.links_generation {
            tracing::debug!(
                category = %category,
                generation,
                current = self.links_generation,
                "Discarding stale link fetch result"
            );
            return;
        }
        let still_open = self
            .open_category()
            .is_some_and(|c| c.name == *category);
        if !still_open {
            tracing::debug!(category = %category, "Discarding link fetch for closed panel");
            return;
        }

        self.links_loading = false;
        match result {
            Ok(links) => {
                // Panel and cache share one allocation
                self.cache.put(category.to_string(), links);
                if let Some(entry) = self.cache.get(category) {
                    self.visible_links = entry;
                }
                self.links_error = None;
            }
            Err(error) => {
                tracing::warn!(category = %category, error = %error, "Link fetch failed");
                self.links_error = Some(LINKS_ERROR_MESSAGE);
            }
        }
    }

    // ------------------------------------------------------------------
    // Category order
    // ------------------------------------------------------------------

    /// Apply a drag of the category at `dragged` by `displacement`.
    ///
    /// Returns the pending order write when the drag produced a new
    /// order: the new order is already applied in memory, and the
    /// caller must persist `payload()` to the order document, feeding
    /// failure back through [`AppEvent::OrderSaveFailed`] so the
    /// snapshot can be restored. Locked dashboards and no-op drags
    /// return `None`.
    pub fn drag_category(&mut self, dragged: usize, displacement: f32) -> Option<OrderWrite> {
        if self.locked {
            tracing::debug!("Ignoring drag while reordering is locked");
            return None;
        }

        let next = links::reordered(&self.categories, dragged, displacement)?;
        let previous = std::mem::replace(&mut self.categories, next.clone());

        // Keep expansion and selection pointing at the same categories
        // they pointed at before the move.
        if let Expansion::Open(i) = self.expansion {
            if let Some(id) = previous.get(i).map(|c| c.id.as_str()) {
                if let Some(pos) = self.categories.iter().position(|c| c.id == id) {
                    self.expansion = Expansion::Open(pos);
                }
            }
        }
        if let Some(id) = previous.get(dragged).map(|c| c.id.as_str()) {
            if let Some(pos) = self.categories.iter().position(|c| c.id == id) {
                self.selected_category = pos;
            }
        }

        Some(OrderWrite {
            order: next,
            previous,
        })
    }

    /// Drag the currently selected category.
    pub fn drag_selected(&mut self, displacement: f32) -> Option<OrderWrite> {
        self.drag_category(self.selected_category, displacement)
    }

    /// Restore the pre-drag order after a failed persistence attempt.
    fn rollback_order(&mut self, previous: Vec<Category>) {
        let open_id = self.open_category().map(|c| c.id.clone());
        let selected_id = self
            .categories
            .get(self.selected_category)
            .map(|c| c.id.clone());

        self.categories = previous;

        if let Some(id) = open_id {
            self.expansion = match self.categories.iter().position(|c| c.id == id) {
                Some(pos) => Expansion::Open(pos),
                None => Expansion::Closed,
            };
        }
        if let Some(id) = selected_id {
            if let Some(pos) = self.categories.iter().position(|c| c.id == id) {
                self.selected_category = pos;
            }
        }
        self.clamp_selections();
    }

    pub fn toggle_locked(&mut self) {
        self.locked = !self.locked;
        self.set_status(if self.locked {
            "Reordering locked"
        } else {
            "Reordering unlocked"
        });
    }

    // ------------------------------------------------------------------
    // Category list
    // ------------------------------------------------------------------

    fn apply_categories(&mut self, result: Result<Vec<Category>, String>) {
        match result {
            Ok(categories) => {
                // Indices may have shifted arbitrarily; close any open
                // panel rather than risk pointing it at a different
                // category. The link cache is untouched by contract.
                self.close_panel();
                self.categories = categories;
                self.categories_error = None;
                self.clamp_selections();
            }
            Err(error) => {
                tracing::warn!(error = %error, "Category reload failed");
                self.categories_error = Some(error);
                self.set_status("Failed to load categories.");
            }
        }
    }

    /// Clamp selection indices after any list mutation.
    pub fn clamp_selections(&mut self) {
        self.selected_category = if self.categories.is_empty() {
            0
        } else {
            self.selected_category.min(self.categories.len() - 1)
        };
        self.selected_link = if self.visible_links.is_empty() {
            0
        } else {
            self.selected_link.min(self.visible_links.len() - 1)
        };
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.selected_category)
    }

    pub fn selected_link(&self) -> Option<&Link> {
        self.visible_links.get(self.selected_link)
    }

    pub fn nav_up(&mut self) {
        match (self.focus, self.expansion) {
            (Focus::Categories, Expansion::Open(_)) => {
                self.selected_link = self.selected_link.saturating_sub(1);
            }
            (Focus::Categories, Expansion::Closed) => {
                self.selected_category = self.selected_category.saturating_sub(1);
            }
            (Focus::Bookmarks, _) => self.bookmarks.nav_up(),
            (Focus::Notepad, _) => self.notepad.nav_up(),
            _ => {}
        }
    }

    pub fn nav_down(&mut self) {
        match (self.focus, self.expansion) {
            (Focus::Categories, Expansion::Open(_)) => {
                if !self.visible_links.is_empty() {
                    self.selected_link =
                        (self.selected_link + 1).min(self.visible_links.len() - 1);
                }
            }
            (Focus::Categories, Expansion::Closed) => {
                if !self.categories.is_empty() {
                    self.selected_category =
                        (self.selected_category + 1).min(self.categories.len() - 1);
                }
            }
            (Focus::Bookmarks, _) => self.bookmarks.nav_down(),
            (Focus::Notepad, _) => self.notepad.nav_down(),
            _ => {}
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    // ------------------------------------------------------------------
    // Theme and status
    // ------------------------------------------------------------------

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = variant.palette();
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant, returning its name for status
    /// display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set a status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Event application
    // ------------------------------------------------------------------

    /// Apply a background task result to the dashboard.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CategoriesLoaded(result) => self.apply_categories(result),
            AppEvent::LinksLoaded {
                category,
                generation,
                result,
            } => self.apply_links(&category, generation, result),
            AppEvent::OrderSaved => {
                tracing::debug!("Category order persisted");
            }
            AppEvent::OrderSaveFailed { previous, error } => {
                tracing::warn!(error = %error, "Order persistence failed, rolling back");
                self.rollback_order(previous);
                self.set_status(ORDER_ERROR_MESSAGE);
            }
            AppEvent::NoteSaved(result) => match result {
                Ok(note) => self.notepad.apply_saved(note),
                Err(error) => {
                    self.notepad.error = Some(error);
                    self.set_status("Failed to save note.");
                }
            },
            AppEvent::NoteDeleted { id, result } => match result {
                Ok(()) => self.notepad.apply_deleted(&id),
                Err(_) => self.set_status("Failed to delete note."),
            },
            AppEvent::BookmarkAdded { shelf, result } => match result {
                Ok(bookmark) => self.bookmarks.apply_added(shelf, bookmark),
                Err(_) => self.set_status("Failed to add bookmark."),
            },
            AppEvent::BookmarkRemoved { shelf, id, result } => match result {
                Ok(()) => self.bookmarks.apply_removed(shelf, &id),
                Err(_) => self.set_status("Failed to delete bookmark."),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    fn cats(names: &[&str]) -> Vec<Category> {
        names
            .iter()
            .map(|n| Category {
                id: n.to_lowercase(),
                name: Arc::from(*n),
            })
            .collect()
    }

    fn link(name: &str, category: &str) -> Link {
        Link {
            id: name.to_lowercase(),
            name: Arc::from(name),
            url: Arc::from("https://example.com"),
            category: Arc::from(category),
            icon_url: None,
        }
    }

    fn dashboard(names: &[&str]) -> Dashboard {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        Dashboard::new(cats(names), ThemeVariant::Dark, today)
    }

    // ------------------------------------------------------------------
    // Expansion controller
    // ------------------------------------------------------------------

    #[test]
    fn test_toggle_opens_and_issues_fetch() {
        let mut app = dashboard(&["Travel", "Shopping"]);

        let outcome = app.toggle_category(0).unwrap();
        let ToggleOutcome::Fetch(ticket) = outcome else {
            panic!("expected fetch ticket");
        };
        assert_eq!(&*ticket.category, "Travel");
        assert_eq!(app.expansion, Expansion::Open(0));
        assert!(app.links_loading);
    }

    #[test]
    fn test_toggle_same_category_closes() {
        let mut app = dashboard(&["Travel"]);
        app.toggle_category(0);
        let outcome = app.toggle_category(0).unwrap();
        assert_eq!(outcome, ToggleOutcome::Closed);
        assert_eq!(app.expansion, Expansion::Closed);
        assert!(!app.links_loading);
    }

    #[test]
    fn test_single_expansion_invariant() {
        let mut app = dashboard(&["A", "B", "C"]);
        for &i in &[0usize, 1, 1, 2, 0, 2, 2, 1] {
            app.toggle_category(i);
            // After every toggle, at most one panel is open
            match app.expansion {
                Expansion::Closed => {}
                Expansion::Open(open) => assert!(open < 3),
            }
        }
    }

    #[test]
    fn test_toggle_out_of_bounds_is_none() {
        let mut app = dashboard(&["A"]);
        assert!(app.toggle_category(5).is_none());
        assert_eq!(app.expansion, Expansion::Closed);
    }

    #[test]
    fn test_cache_hit_avoids_refetch() {
        let mut app = dashboard(&["Travel"]);

        let ToggleOutcome::Fetch(ticket) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };
        app.apply_event(AppEvent::LinksLoaded {
            category: Arc::clone(&ticket.category),
            generation: ticket.generation,
            result: Ok(vec![link("Booking.com", "Travel")]),
        });
        assert_eq!(app.visible_links.len(), 1);

        // Close and reopen: served from cache, no new ticket
        app.toggle_category(0);
        let outcome = app.toggle_category(0).unwrap();
        assert_eq!(outcome, ToggleOutcome::Opened);
        assert_eq!(app.visible_links.len(), 1);
        assert!(!app.links_loading);
    }

    #[test]
    fn test_stale_fetch_discarded_after_switching_category() {
        let mut app = dashboard(&["Travel", "Shopping"]);

        // Open Travel: fetch goes in flight
        let ToggleOutcome::Fetch(travel) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };
        // Close Travel, open Shopping before Travel resolves
        app.toggle_category(0);
        let ToggleOutcome::Fetch(shopping) = app.toggle_category(1).unwrap() else {
            panic!("expected fetch");
        };

        // Travel's late result must not be applied to Shopping's panel
        app.apply_event(AppEvent::LinksLoaded {
            category: travel.category,
            generation: travel.generation,
            result: Ok(vec![link("Booking.com", "Travel")]),
        });
        assert!(app.visible_links.is_empty());
        assert!(app.links_loading, "Shopping fetch is still outstanding");
        assert!(!app.cache.contains("Travel"), "stale result is dropped, not cached");

        // Shopping's own result applies normally
        app.apply_event(AppEvent::LinksLoaded {
            category: shopping.category,
            generation: shopping.generation,
            result: Ok(vec![link("Amazon", "Shopping")]),
        });
        assert_eq!(app.visible_links.len(), 1);
        assert_eq!(&*app.visible_links[0].name, "Amazon");
    }

    #[test]
    fn test_result_after_close_discarded() {
        let mut app = dashboard(&["Travel"]);
        let ToggleOutcome::Fetch(ticket) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };
        app.close_panel();

        app.apply_event(AppEvent::LinksLoaded {
            category: ticket.category,
            generation: ticket.generation,
            result: Ok(vec![link("Booking.com", "Travel")]),
        });
        assert!(app.visible_links.is_empty());
        assert_eq!(app.expansion, Expansion::Closed);
    }

    #[test]
    fn test_fetch_error_shows_inline_message_and_retries_on_reopen() {
        let mut app = dashboard(&["Travel"]);
        let ToggleOutcome::Fetch(ticket) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };
        app.apply_event(AppEvent::LinksLoaded {
            category: ticket.category,
            generation: ticket.generation,
            result: Err("store unreachable".to_string()),
        });
        assert_eq!(app.links_error, Some(LINKS_ERROR_MESSAGE));
        assert!(!app.links_loading);
        assert!(!app.cache.contains("Travel"));

        // Re-toggling closed/open issues a fresh fetch (retry path)
        app.toggle_category(0);
        let outcome = app.toggle_category(0).unwrap();
        assert!(matches!(outcome, ToggleOutcome::Fetch(_)));
        assert!(app.links_error.is_none());
    }

    // ------------------------------------------------------------------
    // Reorder
    // ------------------------------------------------------------------

    #[test]
    fn test_drag_applies_optimistically_and_returns_write() {
        let mut app = dashboard(&["A", "B", "C", "D"]);
        app.selected_category = 0;

        let write = app.drag_selected(2.0 * links::ROW_HEIGHT).unwrap();
        let order: Vec<&str> = app.categories.iter().map(|c| &*c.name).collect();
        assert_eq!(order, ["B", "C", "A", "D"]);
        assert_eq!(write.previous.len(), 4);
        assert_eq!(&*write.previous[0].name, "A");
        // Selection follows the dragged category
        assert_eq!(app.selected_category, 2);
    }

    #[test]
    fn test_drag_noop_returns_none() {
        let mut app = dashboard(&["A", "B"]);
        app.selected_category = 1;
        // Target equals dragged index
        assert!(app.drag_selected(links::ROW_HEIGHT).is_none());
        // Out of bounds
        assert!(app.drag_selected(-links::ROW_HEIGHT).is_none());
        let order: Vec<&str> = app.categories.iter().map(|c| &*c.name).collect();
        assert_eq!(order, ["A", "B"]);
    }

    #[tokio::test]
    async fn test_drag_ignored_while_locked() {
        let mut app = dashboard(&["A", "B"]);
        app.toggle_locked();
        assert!(app.locked);
        assert!(app.drag_selected(links::ROW_HEIGHT).is_none());
    }

    #[tokio::test]
    async fn test_order_rollback_on_save_failure() {
        let mut app = dashboard(&["A", "B", "C"]);
        app.selected_category = 0;

        let write = app.drag_selected(links::ROW_HEIGHT).unwrap();
        app.apply_event(AppEvent::OrderSaveFailed {
            previous: write.previous,
            error: "write failed".to_string(),
        });

        let order: Vec<&str> = app.categories.iter().map(|c| &*c.name).collect();
        assert_eq!(order, ["A", "B", "C"], "failed write rolls the order back");
        assert!(app
            .status_message
            .as_ref()
            .is_some_and(|(m, _)| m == ORDER_ERROR_MESSAGE));
    }

    #[test]
    fn test_open_panel_follows_dragged_category() {
        let mut app = dashboard(&["A", "B", "C"]);
        let ToggleOutcome::Fetch(_) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };

        app.drag_category(0, 2.0 * links::ROW_HEIGHT);
        // "A" moved to index 2; the open panel must still be A's
        assert_eq!(app.expansion, Expansion::Open(2));
        assert_eq!(&*app.open_category().unwrap().name, "A");
    }

    #[test]
    fn test_order_write_payload_shape() {
        let mut app = dashboard(&["A", "B"]);
        let write = app.drag_category(0, links::ROW_HEIGHT).unwrap();
        let payload = write.payload();
        assert_eq!(payload["categories"][0]["name"], "B");
        assert_eq!(payload["categories"][1]["name"], "A");
    }

    // ------------------------------------------------------------------
    // Category reload and selection
    // ------------------------------------------------------------------

    #[test]
    fn test_category_reload_closes_panel_keeps_cache() {
        let mut app = dashboard(&["Travel"]);
        let ToggleOutcome::Fetch(ticket) = app.toggle_category(0).unwrap() else {
            panic!("expected fetch");
        };
        app.apply_event(AppEvent::LinksLoaded {
            category: ticket.category,
            generation: ticket.generation,
            result: Ok(vec![link("Booking.com", "Travel")]),
        });

        app.apply_event(AppEvent::CategoriesLoaded(Ok(cats(&["Travel", "Shopping"]))));
        assert_eq!(app.expansion, Expansion::Closed);
        assert_eq!(app.categories.len(), 2);
        assert!(app.cache.contains("Travel"), "cache survives reloads by contract");
    }

    #[tokio::test]
    async fn test_category_reload_failure_keeps_old_list() {
        let mut app = dashboard(&["Travel"]);
        app.apply_event(AppEvent::CategoriesLoaded(Err("offline".to_string())));
        assert_eq!(app.categories.len(), 1);
        assert!(app.categories_error.is_some());
    }

    #[test]
    fn test_clamp_selections() {
        let mut app = dashboard(&["A", "B"]);
        app.selected_category = 10;
        app.clamp_selections();
        assert_eq!(app.selected_category, 1);

        app.categories.clear();
        app.clamp_selections();
        assert_eq!(app.selected_category, 0);
    }

    // ------------------------------------------------------------------
    // Status and theme
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = dashboard(&[]);
        time::pause();
        app.set_status("Test message");
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = dashboard(&[]);
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[test]
    fn test_focus_cycles_through_all_panels() {
        let mut app = dashboard(&[]);
        let start = app.focus;
        for _ in 0..5 {
            app.cycle_focus();
        }
        assert_eq!(app.focus, start);
    }
}
