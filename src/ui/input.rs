//! Keyboard and mouse input reduction.
//!
//! Translates terminal events into dashboard transitions. Pointer
//! geometry lives here: which category row a click landed on, how many
//! rows a drag travelled, and whether a click fell outside the open
//! panel (which reduces to the panel's `Closed` transition).

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::app::{AppEvent, Dashboard, Expansion, Focus, ToggleOutcome};
use crate::links::ROW_HEIGHT;
use crate::store::DocumentStore;
use crate::util::validate_link_url;
use crate::widgets::Bookmark;

use super::loop_runner::{
    spawn_bookmark_add, spawn_bookmark_remove, spawn_categories_reload, spawn_links_fetch,
    spawn_note_delete, spawn_note_save, spawn_order_write, Action,
};

/// Characters routed to the calculator when it has focus.
const CALC_KEYS: &str = "0123456789.+-*/=cC";

/// Text-entry modes that capture keystrokes before normal dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a note (new or edit) into the notepad draft.
    NoteDraft,
    /// Typing the name of a new quick bookmark.
    BookmarkName,
    /// Typing the URL of a new quick bookmark.
    BookmarkUrl,
}

/// UI-layer state: input mode, in-progress drag, and the layout rects
/// the renderer produced last frame (used to resolve pointer events).
pub struct UiState {
    pub input_mode: InputMode,
    /// Category index and terminal row where a left-button press
    /// started, for click/drag resolution on release.
    pub drag_origin: Option<(usize, u16)>,
    pub category_area: Rect,
    /// Set while the link panel overlay is visible.
    pub panel_area: Option<Rect>,
    pub bookmark_name: String,
    pub bookmark_url: String,
}

pub fn handle_key<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    key: KeyEvent,
    store: &S,
    user_id: &str,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match ui.input_mode {
        InputMode::Normal => handle_normal_key(app, ui, key, store, user_id, event_tx),
        InputMode::NoteDraft => {
            handle_note_draft_key(app, ui, key, store, user_id, event_tx);
            Ok(Action::Continue)
        }
        InputMode::BookmarkName | InputMode::BookmarkUrl => {
            handle_bookmark_form_key(app, ui, key, store, user_id, event_tx);
            Ok(Action::Continue)
        }
    }
}

fn handle_normal_key<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    key: KeyEvent,
    store: &S,
    user_id: &str,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Calculator keys win while the calculator has focus, so digits and
    // operators are never swallowed by global bindings.
    if app.focus == Focus::Calculator {
        if let KeyCode::Char(c) = key.code {
            if CALC_KEYS.contains(c) {
                app.calculator.press(c);
                return Ok(Action::Continue);
            }
        }
        if key.code == KeyCode::Backspace {
            app.calculator.backspace();
            return Ok(Action::Continue);
        }
        if key.code == KeyCode::Enter {
            app.calculator.press('=');
            return Ok(Action::Continue);
        }
    }

    match key.code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Esc => app.close_panel(),

        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KeyCode::Char('r') => {
            spawn_categories_reload(store, event_tx);
            app.set_status("Reloading categories...");
        }
        KeyCode::Char('L') => app.toggle_locked(),

        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
            move_selected_category(app, store, event_tx, -1);
        }
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
            move_selected_category(app, store, event_tx, 1);
        }

        KeyCode::Up | KeyCode::Char('k') => app.nav_up(),
        KeyCode::Down | KeyCode::Char('j') => app.nav_down(),

        KeyCode::Left | KeyCode::Char('h') if app.focus == Focus::Calendar => {
            app.calendar.prev_month();
        }
        KeyCode::Right | KeyCode::Char('l') if app.focus == Focus::Calendar => {
            app.calendar.next_month();
        }

        KeyCode::Enter | KeyCode::Char(' ') if app.focus == Focus::Categories => {
            match app.expansion {
                Expansion::Open(_) => open_selected_link(app),
                Expansion::Closed => {
                    toggle_and_fetch(app, ui, app.selected_category, store, event_tx);
                }
            }
        }
        KeyCode::Char('o') if app.focus == Focus::Categories => open_selected_link(app),

        KeyCode::Enter | KeyCode::Char('o') if app.focus == Focus::Bookmarks => {
            if let Some(bookmark) = app.bookmarks.selected_bookmark() {
                open_in_browser(app, &bookmark.url);
            }
        }
        KeyCode::Char('s') if app.focus == Focus::Bookmarks => app.bookmarks.cycle_shelf(),
        KeyCode::Char('a') if app.focus == Focus::Bookmarks => {
            ui.bookmark_name.clear();
            ui.bookmark_url.clear();
            ui.input_mode = InputMode::BookmarkName;
        }
        KeyCode::Char('d') if app.focus == Focus::Bookmarks => {
            match app.bookmarks.selected_bookmark().and_then(|b| b.id) {
                Some(id) => {
                    spawn_bookmark_remove(store, user_id, app.bookmarks.shelf(), id, event_tx);
                }
                None => app.set_status("Built-in bookmarks cannot be deleted."),
            }
        }

        KeyCode::Char('n') if app.focus == Focus::Notepad => {
            app.notepad.cancel_edit();
            ui.input_mode = InputMode::NoteDraft;
        }
        KeyCode::Enter | KeyCode::Char('e') if app.focus == Focus::Notepad => {
            app.notepad.begin_edit();
            if app.notepad.editing.is_some() {
                ui.input_mode = InputMode::NoteDraft;
            }
        }
        KeyCode::Char('d') if app.focus == Focus::Notepad => {
            if let Some(note) = app.notepad.selected_note() {
                spawn_note_delete(store, user_id, note.id.clone(), event_tx);
            }
        }
        KeyCode::Char('u') if app.focus == Focus::Notepad => {
            match app.notepad.undo_candidate() {
                Some(text) => {
                    spawn_note_save(store, user_id, text.to_string(), None, event_tx);
                    app.set_status("Restoring deleted note...");
                }
                None => app.set_status("Nothing to undo."),
            }
        }

        _ => {}
    }

    Ok(Action::Continue)
}

fn handle_note_draft_key<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    key: KeyEvent,
    store: &S,
    user_id: &str,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match key.code {
        KeyCode::Esc => {
            app.notepad.cancel_edit();
            ui.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let text = app.notepad.draft.clone();
            if text.trim().is_empty() {
                app.set_status("Note is empty.");
            } else {
                let editing = app.notepad.editing_id().map(str::to_owned);
                spawn_note_save(store, user_id, text, editing, event_tx);
            }
            ui.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.notepad.draft.pop();
        }
        KeyCode::Char(c) => app.notepad.draft.push(c),
        _ => {}
    }
}

fn handle_bookmark_form_key<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    key: KeyEvent,
    store: &S,
    user_id: &str,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let field = match ui.input_mode {
        InputMode::BookmarkName => &mut ui.bookmark_name,
        _ => &mut ui.bookmark_url,
    };

    match key.code {
        KeyCode::Esc => {
            ui.bookmark_name.clear();
            ui.bookmark_url.clear();
            ui.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char(c) => field.push(c),
        KeyCode::Enter => match ui.input_mode {
            InputMode::BookmarkName => ui.input_mode = InputMode::BookmarkUrl,
            _ => {
                let shelf = app.bookmarks.shelf();
                match Bookmark::payload(&ui.bookmark_name, &ui.bookmark_url, shelf) {
                    Some(payload) => {
                        spawn_bookmark_add(
                            store,
                            user_id,
                            shelf,
                            ui.bookmark_name.clone(),
                            ui.bookmark_url.clone(),
                            payload,
                            event_tx,
                        );
                        ui.bookmark_name.clear();
                        ui.bookmark_url.clear();
                        ui.input_mode = InputMode::Normal;
                    }
                    None => app.set_status("Name and URL are required."),
                }
            }
        },
        _ => {}
    }
}

pub fn handle_mouse<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    mouse: MouseEvent,
    store: &S,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // A press outside the open panel dismisses it; the press is
            // consumed by the dismissal.
            if let Some(panel) = ui.panel_area {
                if !contains(panel, mouse.column, mouse.row) {
                    app.close_panel();
                }
                return;
            }

            if let Some(index) = category_row_at(ui, app, mouse.column, mouse.row) {
                ui.drag_origin = Some((index, mouse.row));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some((index, start_row)) = ui.drag_origin.take() else {
                return;
            };
            if mouse.row == start_row {
                // No vertical movement: a plain click toggles the panel
                toggle_and_fetch(app, ui, index, store, event_tx);
            } else if !app.locked {
                let displacement = (mouse.row as f32 - start_row as f32) * ROW_HEIGHT;
                if let Some(write) = app.drag_category(index, displacement) {
                    spawn_order_write(store, write, event_tx);
                }
            }
        }
        _ => {}
    }
}

/// Map a pointer position to a category row, if it lands inside the
/// category list's interior.
fn category_row_at(ui: &UiState, app: &Dashboard, column: u16, row: u16) -> Option<usize> {
    let area = ui.category_area;
    let interior_top = area.y.checked_add(1)?;
    if !contains(area, column, row) || row < interior_top {
        return None;
    }
    let index = (row - interior_top) as usize;
    (index < app.categories.len()).then_some(index)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Toggle a category and run the fetch if the panel needs one.
fn toggle_and_fetch<S: DocumentStore>(
    app: &mut Dashboard,
    ui: &mut UiState,
    index: usize,
    store: &S,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match app.toggle_category(index) {
        Some(ToggleOutcome::Fetch(ticket)) => spawn_links_fetch(store, ticket, event_tx),
        Some(_) => {}
        None => {}
    }
    if app.expansion == Expansion::Closed {
        ui.panel_area = None;
    }
}

fn open_selected_link(app: &mut Dashboard) {
    let url = app.selected_link().map(|link| link.url.to_string());
    if let Some(url) = url {
        open_in_browser(app, &url);
    }
}

/// Hand a URL to the system browser, after a structural check so a
/// malformed stored link cannot be passed to the OS opener.
fn open_in_browser(app: &mut Dashboard, url: &str) {
    match validate_link_url(url) {
        Ok(_) => {
            if let Err(e) = open::that(url) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status("Failed to open browser.");
            }
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Refusing to open malformed URL");
            app.set_status("Bookmark URL is malformed.");
        }
    }
}

/// Keyboard reorder: move the selected category one row up or down
/// through the same displacement path the mouse uses.
fn move_selected_category<S: DocumentStore>(
    app: &mut Dashboard,
    store: &S,
    event_tx: &mpsc::Sender<AppEvent>,
    delta: i64,
) {
    if app.focus != Focus::Categories || app.expansion != Expansion::Closed {
        return;
    }
    let target = app.selected_category as i64 + delta;
    if target < 0 || target as usize >= app.categories.len() {
        return;
    }
    let displacement = target as f32 * ROW_HEIGHT;
    if let Some(write) = app.drag_selected(displacement) {
        spawn_order_write(store, write, event_tx);
    }
}
