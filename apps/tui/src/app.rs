//! Core TUI application state and event loop.

use std::io;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::runtime::Runtime;

use pokedex_api::ApiClient;
use pokedex_shared::{Pokemon, data_dir, load_config};
use pokedex_storage::Storage;
use pokedex_store::{CatalogStore, FavoritesStore, filter_by_name, filter_favorites};

use crate::views::{self, Tab, View};
use crate::widgets::status_bar;

/// How long the loading view stays visible even when the initial batch
/// returns faster.
const MIN_LOADING_VISIBLE: Duration = Duration::from_millis(600);

/// Selection distance from the end of the list that triggers a further page
/// load (infinite scroll).
const LOAD_MORE_MARGIN: usize = 3;

/// Application state.
pub(crate) struct App {
    /// Currently active view.
    pub view: View,
    /// Catalog store (cache, cursor, loading flags).
    pub catalog: CatalogStore,
    /// Favorites store (persisted id set).
    pub favorites: FavoritesStore,
    /// Active list tab.
    pub tab: Tab,
    /// Current search query.
    pub search: String,
    /// Whether the search bar has focus.
    pub editing_search: bool,
    /// Selected row within the filtered list.
    pub selected: usize,
    /// Open detail modal, if any.
    pub detail: Option<Pokemon>,
    /// Status message shown in the bottom bar.
    pub status: String,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the initial batch still has to be fetched.
    pub initial_load_pending: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    pub(crate) fn new(catalog: CatalogStore, favorites: FavoritesStore) -> Self {
        Self {
            view: View::Welcome,
            catalog,
            favorites,
            tab: Tab::All,
            search: String::new(),
            editing_search: false,
            selected: 0,
            detail: None,
            status: "Welcome — press Enter to open the Pokédex, ? for help".to_string(),
            show_help: false,
            initial_load_pending: true,
            should_quit: false,
        }
    }

    /// The displayed list: the cache filtered by tab and search query.
    pub(crate) fn filtered(&self) -> Vec<&Pokemon> {
        let by_name = filter_by_name(self.catalog.entries(), &self.search);
        match self.tab {
            Tab::All => by_name,
            Tab::Favorites => filter_favorites(by_name, |id| self.favorites.is_favorite(id)),
        }
    }

    fn selected_id(&self) -> Option<u32> {
        self.filtered().get(self.selected).map(|p| p.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Entry point — builds the stores, sets up the terminal, runs the event
/// loop, restores the terminal.
pub(crate) fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pokedex=warn")),
        )
        .with_writer(std::io::sink)
        .init();

    let runtime = Runtime::new()?;

    let config = load_config()?;
    let api = ApiClient::new(&config.api.base_url, config.api.timeout_secs)?;
    let storage = Storage::open(&data_dir(&config)?)?;
    let catalog = CatalogStore::new(api, storage.clone(), config.catalog.page_size);
    let favorites = FavoritesStore::new(storage);
    tracing::info!(
        cached = catalog.len(),
        favorites = favorites.count(),
        "stores restored"
    );

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &runtime, App::new(catalog, favorites));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &Runtime,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, &app))?;

        // The loading view has been drawn at least once; now perform the
        // initial fetch, honoring the minimum visible duration.
        if app.view == View::Loading && app.initial_load_pending {
            app.initial_load_pending = false;
            let started = Instant::now();
            let result = runtime.block_on(app.catalog.load_initial_batch());

            let elapsed = started.elapsed();
            if elapsed < MIN_LOADING_VISIBLE {
                std::thread::sleep(MIN_LOADING_VISIBLE - elapsed);
            }

            app.view = View::List;
            app.status = match result {
                Ok(()) => format!(
                    "Loaded {} of {} entries — / to search, f to favorite",
                    app.catalog.len(),
                    app.catalog.total_count(),
                ),
                Err(e) => format!("Load failed: {e}"),
            };
            continue;
        }

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, runtime, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, runtime: &Runtime, code: KeyCode, modifiers: KeyModifiers) {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if !app.editing_search => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !app.editing_search => {
            app.show_help = !app.show_help;
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.view {
        View::Welcome => {
            if code == KeyCode::Enter {
                // Already-restored sessions skip straight to the list.
                if app.catalog.initial_load_complete() && !app.catalog.is_empty() {
                    app.initial_load_pending = false;
                    app.view = View::List;
                    app.status = format!(
                        "Restored {} cached entries — / to search",
                        app.catalog.len()
                    );
                } else {
                    app.view = View::Loading;
                }
            }
        }
        View::Loading => {}
        View::List => handle_list_key(app, runtime, code),
    }
}

fn handle_list_key(app: &mut App, runtime: &Runtime, code: KeyCode) {
    // Modal swallows everything except close and yank keys.
    if let Some(entry) = &app.detail {
        match code {
            KeyCode::Esc | KeyCode::Enter => app.detail = None,
            KeyCode::Char('y') => {
                app.status = match entry.artwork_url() {
                    Some(url) => format!("Artwork URL: {url}"),
                    None => format!("No artwork for {}", entry.name),
                };
            }
            _ => {}
        }
        return;
    }

    if app.editing_search {
        match code {
            KeyCode::Esc => app.editing_search = false,
            KeyCode::Enter => {
                app.editing_search = false;
                resolve_search_miss(app, runtime);
            }
            KeyCode::Backspace => {
                app.search.pop();
                app.selected = 0;
            }
            KeyCode::Char(c) => {
                app.search.push(c);
                app.selected = 0;
            }
            _ => {}
        }
        app.clamp_selection();
        return;
    }

    match code {
        KeyCode::Char('/') => {
            app.editing_search = true;
            app.status = "Search — type to filter, Enter to look up a miss, Esc to leave".into();
        }
        KeyCode::Esc if !app.search.is_empty() => {
            app.search.clear();
            app.selected = 0;
        }
        KeyCode::Tab => {
            app.tab = match app.tab {
                Tab::All => Tab::Favorites,
                Tab::Favorites => Tab::All,
            };
            app.selected = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selected > 0 {
                app.selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.filtered().len();
            if app.selected + 1 < len {
                app.selected += 1;
            }
            maybe_load_more(app, runtime);
        }
        KeyCode::Char('f') => {
            if let Some(id) = app.selected_id() {
                let now_favorite = app.favorites.toggle(id);
                app.status = if now_favorite {
                    format!("★ favorited #{id}")
                } else {
                    format!("removed #{id} from favorites")
                };
                app.clamp_selection();
            }
        }
        KeyCode::Enter => {
            let selected = app.filtered().get(app.selected).map(|p| (*p).clone());
            app.detail = selected;
        }
        _ => {}
    }
}

/// Scroll-proximity trigger for incremental loading. The store's in-flight
/// guard makes repeated triggers no-ops.
fn maybe_load_more(app: &mut App, runtime: &Runtime) {
    if app.tab != Tab::All || !app.search.trim().is_empty() {
        return;
    }
    if app.selected + LOAD_MORE_MARGIN < app.catalog.len() || !app.catalog.has_more() {
        return;
    }

    match runtime.block_on(app.catalog.load_more()) {
        Ok(()) => {
            app.status = format!(
                "Loaded {} of {} entries",
                app.catalog.len(),
                app.catalog.total_count(),
            );
        }
        Err(e) => app.status = format!("Load failed: {e}"),
    }
}

/// On search submit, a query that matches nothing locally is resolved
/// against the remote catalog (absence is a valid outcome).
fn resolve_search_miss(app: &mut App, runtime: &Runtime) {
    let query = app.search.trim().to_string();
    if query.is_empty() || !app.filtered().is_empty() {
        return;
    }

    match runtime.block_on(app.catalog.search_by_name(&query)) {
        Some(entry) => {
            app.status = format!("Found #{} {}", entry.id, entry.name);
            app.selected = 0;
        }
        None => app.status = format!("No entry named '{query}'"),
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    match app.view {
        View::Welcome => views::draw_welcome(f, chunks[0]),
        View::Loading => views::draw_loading(f, chunks[0]),
        View::List => views::draw_list(f, app, chunks[0]),
    }

    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[1]);

    if let Some(entry) = &app.detail {
        views::draw_detail_modal(f, entry, app.favorites.is_favorite(entry.id));
    }

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = crate::widgets::centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  Enter        Open the Pokédex / entry details"),
        Line::from("  /            Edit the search query"),
        Line::from("  Tab          Switch between All and Favorites"),
        Line::from("  ↑/↓ or k/j   Navigate the list"),
        Line::from("  f            Toggle favorite on the selected entry"),
        Line::from("  y            Yank the artwork URL to the status bar"),
        Line::from("  Esc          Close modal / clear search"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}
