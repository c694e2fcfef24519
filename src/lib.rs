//! homedeck — a personal start page for the terminal.
//!
//! Bookmark categories live in a hosted document store and open as
//! collapsible panels; small widgets (calculator, notepad, calendar,
//! weather card, quick-bookmark strip) fill out the rest of the screen.
//! Link and category management is exposed as CLI subcommands.
//!
//! All persistence is delegated to the document store through the
//! [`store::DocumentStore`] trait; the store handle is injected at
//! construction so tests run against [`store::MemoryStore`].

pub mod admin;
pub mod app;
pub mod config;
pub mod links;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
pub mod widgets;
