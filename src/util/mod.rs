//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: checking bookmark URLs before they are stored or
//!   handed to the system browser
//! - **Text processing**: Unicode-aware string width calculation and
//!   truncation, plus control-character stripping for store-sourced text

mod text;
mod url;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url::{validate_link_url, LinkUrlError};
