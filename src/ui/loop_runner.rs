//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background store-task events, and a
//! periodic tick, and owns the spawn helpers that move store IO off the
//! event loop.

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::layout::Rect;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::app::{AppEvent, Dashboard, FetchTicket, OrderWrite};
use crate::links::{decode_categories, fetch_links};
use crate::store::{DocumentStore, CATEGORIES_COLLECTION, ORDER_DOC_PATH};
use crate::widgets::notepad::notes_collection;
use crate::widgets::{Note, Shelf};

use super::input::{handle_key, handle_mouse, InputMode, UiState};
use super::render::render;

/// Result of handling an input event.
pub enum Action {
    /// Continue the event loop.
    Continue,
    /// Exit and restore the terminal.
    Quit,
}

/// Runs the TUI event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Terminal input**: keys and mouse from crossterm's event stream
/// - **Background tasks**: store results via the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for status message expiry
///
/// Installs a panic hook that restores the terminal before unwinding,
/// so a panic never leaves the terminal in raw mode.
pub async fn run<S: DocumentStore>(
    app: &mut Dashboard,
    store: S,
    user_id: String,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut ui = UiState {
        input_mode: InputMode::Normal,
        drag_origin: None,
        category_area: Rect::default(),
        panel_area: None,
        bookmark_name: String::new(),
        bookmark_url: String::new(),
    };

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app, &mut ui))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending store events before blocking on input so fetch
        // results are never starved by rapid keypresses.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            app.apply_event(event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        match handle_key(app, &mut ui, key, &store, &user_id, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        app.needs_redraw = true;
                        handle_mouse(app, &mut ui, mouse, &store, &event_tx);
                    }
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                app.apply_event(event);
            }

            _ = tick_interval.tick() => {}
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

// ============================================================================
// Background task spawning
// ============================================================================

/// Run a link fetch for a ticket the dashboard issued. The result comes
/// back tagged with the ticket's category and generation so stale
/// arrivals are discarded on application.
pub(super) fn spawn_links_fetch<S: DocumentStore>(
    store: &S,
    ticket: FetchTicket,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = fetch_links(&store, &ticket.category)
            .await
            .map_err(|e| e.to_string());
        let event = AppEvent::LinksLoaded {
            category: ticket.category,
            generation: ticket.generation,
            result,
        };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send link fetch result (receiver dropped)");
        }
    });
}

/// Persist an optimistic reorder. On failure the event carries the
/// pre-drag snapshot so the dashboard can roll back.
pub(super) fn spawn_order_write<S: DocumentStore>(
    store: &S,
    write: OrderWrite,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    let payload = write.payload();
    tokio::spawn(async move {
        let event = match store.set_document(ORDER_DOC_PATH, payload, false).await {
            Ok(()) => AppEvent::OrderSaved,
            Err(e) => AppEvent::OrderSaveFailed {
                previous: write.previous,
                error: e.to_string(),
            },
        };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send order write result (receiver dropped)");
        }
    });
}

/// Reload the category list.
pub(super) fn spawn_categories_reload<S: DocumentStore>(
    store: &S,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = store
            .get_all(CATEGORIES_COLLECTION)
            .await
            .map(|docs| decode_categories(&docs))
            .map_err(|e| e.to_string());
        if tx.send(AppEvent::CategoriesLoaded(result)).await.is_err() {
            tracing::warn!("Failed to send categories (receiver dropped)");
        }
    });
}

/// Save a note: update in place when `editing_id` is set, otherwise add.
pub(super) fn spawn_note_save<S: DocumentStore>(
    store: &S,
    user_id: &str,
    text: String,
    editing_id: Option<String>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    let collection = notes_collection(user_id);
    tokio::spawn(async move {
        let payload = Note::payload(&text);
        let result = match editing_id {
            Some(id) => store
                .update_document(&collection, &id, payload)
                .await
                .map(|()| Note {
                    id,
                    text: text.into(),
                }),
            None => store.add_document(&collection, payload).await.map(|id| Note {
                id,
                text: text.into(),
            }),
        };
        let event = AppEvent::NoteSaved(result.map_err(|e| e.to_string()));
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send note save result (receiver dropped)");
        }
    });
}

pub(super) fn spawn_note_delete<S: DocumentStore>(
    store: &S,
    user_id: &str,
    id: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    let collection = notes_collection(user_id);
    tokio::spawn(async move {
        let result = store
            .delete_document(&collection, &id)
            .await
            .map_err(|e| e.to_string());
        if tx.send(AppEvent::NoteDeleted { id, result }).await.is_err() {
            tracing::warn!("Failed to send note delete result (receiver dropped)");
        }
    });
}

/// Add a user bookmark to the given shelf.
pub(super) fn spawn_bookmark_add<S: DocumentStore>(
    store: &S,
    user_id: &str,
    shelf: Shelf,
    name: String,
    url: String,
    payload: serde_json::Value,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    let collection = crate::widgets::bookmarks::bookmarks_collection(user_id);
    tokio::spawn(async move {
        let result = store
            .add_document(&collection, payload)
            .await
            .map(|id| crate::widgets::Bookmark {
                id: Some(id),
                name: name.into(),
                url: url.into(),
            })
            .map_err(|e| e.to_string());
        if tx
            .send(AppEvent::BookmarkAdded { shelf, result })
            .await
            .is_err()
        {
            tracing::warn!("Failed to send bookmark add result (receiver dropped)");
        }
    });
}

pub(super) fn spawn_bookmark_remove<S: DocumentStore>(
    store: &S,
    user_id: &str,
    shelf: Shelf,
    id: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    let tx = event_tx.clone();
    let collection = crate::widgets::bookmarks::bookmarks_collection(user_id);
    tokio::spawn(async move {
        let result = store
            .delete_document(&collection, &id)
            .await
            .map_err(|e| e.to_string());
        if tx
            .send(AppEvent::BookmarkRemoved { shelf, id, result })
            .await
            .is_err()
        {
            tracing::warn!("Failed to send bookmark remove result (receiver dropped)");
        }
    });
}
