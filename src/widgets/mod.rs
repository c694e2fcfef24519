//! Start-page widgets.
//!
//! Each widget owns its own state and exposes synchronous transitions;
//! store IO happens in tasks spawned by the UI layer, which report back
//! through the app event channel.
//!
//! - `calculator` — arithmetic input and evaluation
//! - `notepad` — per-user notes with deletion history and undo
//! - `bookmarks` — the quick-bookmark strip (built-ins + user entries)
//! - `calendar` — month grid navigation
//! - `weather` — the static weather card

pub mod bookmarks;
pub mod calculator;
pub mod calendar;
pub mod notepad;
pub mod weather;

pub use bookmarks::{Bookmark, BookmarkBoard, Shelf};
pub use calculator::Calculator;
pub use calendar::MonthView;
pub use notepad::{Note, Notepad};
pub use weather::WeatherCard;
