//! Frame rendering.
//!
//! Layout: a category strip down the left, widgets on the right, a
//! one-line status bar at the bottom. An expanded category draws its
//! links in a centered overlay panel; the rects the renderer computes
//! are stored on [`UiState`] so the input layer can resolve pointer
//! events against them.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{Dashboard, Expansion, Focus};
use crate::util::truncate_to_width;
use crate::widgets::calendar::DAY_NAMES;

use super::input::{InputMode, UiState};

pub fn render(f: &mut Frame, app: &Dashboard, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(chunks[0]);

    render_categories(f, app, ui, columns[0]);
    render_widgets(f, app, ui, columns[1]);
    render_status_bar(f, app, ui, chunks[1]);

    if app.expansion != Expansion::Closed {
        render_link_panel(f, app, ui, f.area());
    } else {
        ui.panel_area = None;
    }
}

fn border_style(app: &Dashboard, focus: Focus) -> Style {
    if app.focus == focus {
        app.theme.panel_border_focused
    } else {
        app.theme.panel_border
    }
}

fn render_categories(f: &mut Frame, app: &Dashboard, ui: &mut UiState, area: Rect) {
    ui.category_area = area;

    let title = if app.locked {
        "Categories [locked]"
    } else {
        "Categories"
    };
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == app.selected_category && app.focus == Focus::Categories {
                app.theme.category_selected
            } else {
                app.theme.category_normal
            };
            ListItem::new(Line::styled(
                truncate_to_width(&category.name, width).into_owned(),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if app.locked {
            app.theme.category_locked_hint
        } else {
            border_style(app, Focus::Categories)
        });

    if let Some(error) = &app.categories_error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(app.theme.panel_error)
                .block(block),
            area,
        );
        return;
    }
    f.render_widget(List::new(items).block(block), area);
}

fn render_link_panel(f: &mut Frame, app: &Dashboard, ui: &mut UiState, screen: Rect) {
    let Some(category) = app.open_category() else {
        ui.panel_area = None;
        return;
    };

    let panel = centered_rect(screen, 60, 60);
    ui.panel_area = Some(panel);

    f.render_widget(Clear, panel);
    let block = Block::default()
        .title(format!(" {} ", category.name))
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_focused);

    if app.links_loading {
        f.render_widget(
            Paragraph::new("Loading links...")
                .style(app.theme.panel_loading)
                .block(block),
            panel,
        );
        return;
    }
    if let Some(error) = app.links_error {
        f.render_widget(
            Paragraph::new(error).style(app.theme.panel_error).block(block),
            panel,
        );
        return;
    }
    if app.visible_links.is_empty() {
        f.render_widget(
            Paragraph::new("No bookmarks available.")
                .style(app.theme.panel_empty)
                .block(block),
            panel,
        );
        return;
    }

    let width = panel.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .visible_links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let marker = if link.icon_url.is_some() { "◆ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(
                    format!("{marker}{}", link.name),
                    if i == app.selected_link {
                        app.theme.link_selected
                    } else {
                        app.theme.link_name
                    },
                ),
                Span::styled(
                    format!(
                        "  {}",
                        truncate_to_width(&link.url, width.saturating_sub(link.name.len() + 4))
                    ),
                    app.theme.link_url,
                ),
            ]);
            ListItem::new(line)
        })
        .collect();
    f.render_widget(List::new(items).block(block), panel);
}

fn render_widgets(f: &mut Frame, app: &Dashboard, ui: &UiState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    render_bookmarks(f, app, ui, top[0]);
    render_weather(f, app, top[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    render_notepad(f, app, ui, middle[0]);
    render_calculator(f, app, middle[1]);

    render_calendar(f, app, rows[2]);
}

fn render_bookmarks(f: &mut Frame, app: &Dashboard, ui: &UiState, area: Rect) {
    let board = &app.bookmarks;
    let shelf = board.shelf();

    let mut lines: Vec<Line> = board
        .combined(shelf)
        .iter()
        .enumerate()
        .map(|(i, bookmark)| {
            let style = if i == board.selected && app.focus == Focus::Bookmarks {
                app.theme.link_selected
            } else {
                app.theme.link_name
            };
            Line::styled(format!("{}", bookmark.name), style)
        })
        .collect();

    if ui.input_mode == InputMode::BookmarkName {
        lines.push(Line::styled(
            format!("name: {}_", ui.bookmark_name),
            app.theme.widget_value,
        ));
    } else if ui.input_mode == InputMode::BookmarkUrl {
        lines.push(Line::styled(
            format!("url: {}_", ui.bookmark_url),
            app.theme.widget_value,
        ));
    }

    let block = Block::default()
        .title(format!("Bookmarks · {}", shelf.name()))
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Bookmarks));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_weather(f: &mut Frame, app: &Dashboard, area: Rect) {
    let weather = &app.weather;
    let lines = vec![
        Line::styled(
            format!("{}, {}", weather.city, weather.country),
            app.theme.widget_title,
        ),
        Line::styled(weather.headline(), app.theme.widget_value),
        Line::raw(format!("Feels like: {}°C", weather.feels_like_c)),
        Line::raw(format!("Humidity: {}%", weather.humidity)),
    ];
    let block = Block::default()
        .title("Weather")
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_notepad(f: &mut Frame, app: &Dashboard, ui: &UiState, area: Rect) {
    let pad = &app.notepad;
    let width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    if ui.input_mode == InputMode::NoteDraft {
        lines.push(Line::styled(
            format!("> {}_", pad.draft),
            app.theme.widget_value,
        ));
    }
    for (i, note) in pad.notes.iter().enumerate() {
        let style = if i == pad.selected && app.focus == Focus::Notepad {
            app.theme.link_selected
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            truncate_to_width(&note.text, width).into_owned(),
            style,
        ));
    }
    if !pad.history.is_empty() {
        lines.push(Line::styled(
            format!("({} deleted, u to undo)", pad.history.len()),
            app.theme.panel_empty,
        ));
    }
    if let Some(error) = &pad.error {
        lines.push(Line::styled(error.clone(), app.theme.panel_error));
    }

    let block = Block::default()
        .title("Notepad")
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Notepad));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_calculator(f: &mut Frame, app: &Dashboard, area: Rect) {
    let calc = &app.calculator;
    let lines = vec![
        Line::raw(if calc.input.is_empty() {
            "0".to_string()
        } else {
            calc.input.clone()
        }),
        Line::styled(
            if calc.result.is_empty() {
                "0".to_string()
            } else {
                calc.result.clone()
            },
            app.theme.widget_value,
        ),
    ];
    let block = Block::default()
        .title("Calculator")
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Calculator));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_calendar(f: &mut Frame, app: &Dashboard, area: Rect) {
    let view = &app.calendar;
    let mut lines = vec![Line::styled(view.label(), app.theme.widget_title)];
    lines.push(Line::raw(
        DAY_NAMES.map(|d| format!("{d:>4}")).concat(),
    ));

    let mut week: Vec<Span> = Vec::new();
    for (i, cell) in view.grid().iter().enumerate() {
        let span = match cell {
            None => Span::raw("    "),
            Some(day) => {
                let style = if view.is_today(*day, app.today) {
                    app.theme.calendar_today
                } else if view.is_sunday(*day) {
                    app.theme.calendar_sunday
                } else {
                    Style::default()
                };
                Span::styled(format!("{day:>4}"), style)
            }
        };
        week.push(span);
        if (i + 1) % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
    }
    if !week.is_empty() {
        lines.push(Line::from(week));
    }

    let block = Block::default()
        .title("Calendar")
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Calendar));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(f: &mut Frame, app: &Dashboard, ui: &UiState, area: Rect) {
    let text = match (&app.status_message, ui.input_mode) {
        (Some((msg, _)), _) => msg.to_string(),
        (None, InputMode::NoteDraft) => "Enter: save note · Esc: cancel".to_string(),
        (None, InputMode::BookmarkName | InputMode::BookmarkUrl) => {
            "Enter: next/save · Esc: cancel".to_string()
        }
        (None, InputMode::Normal) => {
            "q quit · Tab focus · Enter open · Shift+↑↓ move · L lock · t theme · r reload"
                .to_string()
        }
    };
    f.render_widget(Paragraph::new(text).style(app.theme.status_bar), area);
}

/// Centered sub-rectangle taking the given percentages of the screen.
fn centered_rect(screen: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(screen);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
