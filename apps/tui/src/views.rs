//! The three navigable views: welcome, loading transition, and the list.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};

use pokedex_shared::Pokemon;

use crate::app::App;
use crate::widgets::centered_rect;

/// View identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Welcome,
    Loading,
    List,
}

/// List view tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    All,
    Favorites,
}

// ---------------------------------------------------------------------------
// Welcome view
// ---------------------------------------------------------------------------

pub(crate) fn draw_welcome(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from("Pokédex").style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("Browse, search, and favorite entries"),
        Line::from("from the public creature catalog."),
        Line::from(""),
        Line::from("Press Enter to begin").style(Style::default().fg(Color::Cyan)),
    ];

    let welcome = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Welcome "));
    f.render_widget(welcome, area);
}

// ---------------------------------------------------------------------------
// Loading view
// ---------------------------------------------------------------------------

pub(crate) fn draw_loading(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from("Catching them all…").style(Style::default().fg(Color::Yellow)),
        Line::from(""),
        Line::from("Fetching the first batch from the catalog."),
    ];

    let loading = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Loading "));
    f.render_widget(loading, area);
}

// ---------------------------------------------------------------------------
// List view
// ---------------------------------------------------------------------------

pub(crate) fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(3), // Tabs
            Constraint::Min(1),    // List
        ])
        .split(area);

    draw_search_bar(f, app, chunks[0]);
    draw_tabs(f, app, chunks[1]);
    draw_entries(f, app, chunks[2]);
}

fn draw_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.editing_search {
        (format!("{}▏", app.search), Style::default().fg(Color::Cyan))
    } else if app.search.is_empty() {
        (
            "press / to search".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.search.clone(), Style::default())
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(if app.editing_search {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(search, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = vec![
        Line::from(format!("All ({})", app.catalog.len())),
        Line::from(format!("Favorites ({})", app.favorites.count())),
    ];

    let selected = match app.tab {
        Tab::All => 0,
        Tab::Favorites => 1,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Pokédex "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");
    f.render_widget(tabs, area);
}

fn draw_entries(f: &mut Frame, app: &App, area: Rect) {
    let entries = app.filtered();

    if entries.is_empty() {
        let message = match app.tab {
            Tab::Favorites if !app.favorites.has_favorites() => {
                "No favorites yet.\n\nSelect an entry and press 'f' to star it."
            }
            _ if !app.search.is_empty() => "No entry matches the search.",
            _ => "Nothing loaded yet.",
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Entries "));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if i == app.selected { "▸ " } else { "  " };
            let star = if app.favorites.is_favorite(entry.id) {
                "★ "
            } else {
                "  "
            };
            ListItem::new(format!(
                "{prefix}{star}#{:<4} {:<14} [{}]",
                entry.id,
                entry.name,
                entry.type_names().join(", "),
            ))
            .style(style)
        })
        .collect();

    let title = format!(
        " Entries ({} of {}) ",
        app.catalog.len(),
        app.catalog.total_count(),
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Detail modal
// ---------------------------------------------------------------------------

pub(crate) fn draw_detail_modal(f: &mut Frame, entry: &Pokemon, is_favorite: bool) {
    let area = centered_rect(60, 50, f.area());

    let star = if is_favorite { " ★" } else { "" };
    let mut lines = vec![
        Line::from(format!("{}{star}", entry.name)).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("ID:      #{}", entry.id)),
        Line::from(format!("Height:  {} dm", entry.height)),
        Line::from(format!("Weight:  {} hg", entry.weight)),
        Line::from(format!("Types:   {}", entry.type_names().join(", "))),
    ];
    if let Some(url) = entry.artwork_url() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Artwork: {url}")).style(Style::default().fg(Color::DarkGray)));
    }

    let modal = Paragraph::new(lines)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Entry — y artwork, Esc to close "),
        );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(modal, area);
}
