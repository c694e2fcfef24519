//! Theme system for the TUI.
//!
//! Semantic style roles mapped to ratatui `Style` values, with a Dark
//! and a Light palette. The active palette is switchable at runtime
//! (the `t` key cycles variants).

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from config (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::dark(),
            Self::Light => Palette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Palette — semantic roles to Style
// ============================================================================

/// Styles for every semantic UI role on the start page.
#[derive(Debug, Clone)]
pub struct Palette {
    // -- Category strip --
    pub category_normal: Style,
    pub category_selected: Style,
    pub category_locked_hint: Style,

    // -- Link panel --
    pub link_name: Style,
    pub link_url: Style,
    pub link_selected: Style,
    pub panel_loading: Style,
    pub panel_error: Style,
    pub panel_empty: Style,

    // -- Widgets --
    pub widget_title: Style,
    pub widget_value: Style,
    pub calendar_today: Style,
    pub calendar_sunday: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            category_normal: Style::default(),
            category_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            category_locked_hint: Style::default().fg(Color::Yellow),

            link_name: Style::default().add_modifier(Modifier::BOLD),
            link_url: Style::default().fg(Color::DarkGray),
            link_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_loading: Style::default().fg(Color::Cyan),
            panel_error: Style::default().fg(Color::Red),
            panel_empty: Style::default().fg(Color::Gray),

            widget_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            widget_value: Style::default().add_modifier(Modifier::BOLD),
            calendar_today: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            calendar_sunday: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            category_normal: Style::default().fg(Color::Black),
            category_selected: Style::default().bg(Color::Gray).fg(Color::Black),
            category_locked_hint: Style::default().fg(Color::Magenta),

            link_name: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            link_url: Style::default().fg(Color::Gray),
            link_selected: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_loading: Style::default().fg(Color::Blue),
            panel_error: Style::default().fg(Color::Red),
            panel_empty: Style::default().fg(Color::DarkGray),

            widget_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            widget_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            calendar_today: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            calendar_sunday: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(Color::Black),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("LIGHT"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn test_cycle_covers_all_variants() {
        let start = ThemeVariant::Dark;
        assert_eq!(start.next(), ThemeVariant::Light);
        assert_eq!(start.next().next(), ThemeVariant::Dark);
    }

    #[test]
    fn test_palettes_differ() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.category_normal, light.category_normal);
    }
}
