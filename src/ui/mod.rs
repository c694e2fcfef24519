//! Terminal user interface.
//!
//! The start page renders as a category strip plus a widget grid; an
//! expanded category shows its links in a centered overlay panel.
//!
//! # Module Structure
//!
//! - `loop_runner` — main event loop, background task spawning
//! - `input` — keyboard and mouse reduction to dashboard transitions
//! - `render` — frame rendering
//!
//! All store IO is spawned here from the tickets and write requests the
//! dashboard returns; the dashboard itself stays synchronous. Pointer
//! geometry (which row was clicked, whether a click landed outside the
//! open panel) is resolved here too — the dashboard only ever sees the
//! resulting transition.

mod input;
mod loop_runner;
mod render;

pub use loop_runner::{run, Action};
