//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::components::{DetailPanel, DocumentTable, SearchBar, StatusDisplay};
use super::events::AppEvent;
use super::traits::{Navigable, Scrollable};
use super::ui::centered_rect;
use crate::config::Config;
use crate::library::{load, DocumentSource, ExploreState, LoadStatus, LoadTicket};
use crate::models::SortKey;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);
const PAGE_SIZE: isize = 10;

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Table,
    Search,
}

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    /// Collection, query, sort and selection
    pub state: ExploreState,

    // Components
    pub table: DocumentTable,
    pub detail: DetailPanel,
    pub search: SearchBar,
    pub status: StatusDisplay,

    // Global application state
    pub focus: Focus,
    pub should_quit: bool,
    pub show_help_popup: bool,

    source: Arc<dyn DocumentSource>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application reading documents from `source`
    pub fn new(config: Config, source: Arc<dyn DocumentSource>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = ExploreState::new().with_summary_search(config.search_summary);

        Self {
            config,
            state,
            table: DocumentTable::default(),
            detail: DetailPanel::new(),
            search: SearchBar::new(),
            status: StatusDisplay::new().with_auto_clear(STATUS_TIMEOUT),
            focus: Focus::Table,
            should_quit: false,
            show_help_popup: false,
            source,
            events_tx,
            events_rx,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // Initial load at mount
        self.request_load();
        let mut last_refresh = Instant::now();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_event(AppEvent::Key(key))?;
                    }
                }
            }

            if let Some(interval) = self.config.refresh_interval() {
                if last_refresh.elapsed() >= interval {
                    last_refresh = Instant::now();
                    self.handle_event(AppEvent::RefreshDue)?;
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event)?;
            }

            self.status.tick();

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Start a background load; its result comes back as
    /// [`AppEvent::LoadFinished`].
    pub fn request_load(&mut self) -> LoadTicket {
        let ticket = self.state.begin_load();
        self.status
            .set_loading(format!("Loading documents from {}...", self.source.describe()));

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = load(source.as_ref()).await;
            if tx.send(AppEvent::LoadFinished { ticket, result }).is_err() {
                debug!("Explorer closed before load {} finished", ticket.sequence());
            }
        });

        ticket
    }

    /// Process one application event
    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key_event(key)?,
            AppEvent::LoadFinished { ticket, result } => {
                if self.state.apply_load(ticket, result) {
                    match self.state.status() {
                        LoadStatus::Loaded { count } => {
                            let message = format!("Loaded {} documents", count);
                            self.status.set_success(message);
                        }
                        LoadStatus::Failed { message } => {
                            let message = format!("Failed to load documents: {}", message);
                            self.status.set_error(message);
                        }
                        LoadStatus::Idle => {}
                    }
                }
            }
            AppEvent::RefreshDue => {
                if self.state.is_loading() {
                    debug!("Skipping periodic refresh, a load is still pending");
                } else {
                    info!("Periodic refresh");
                    self.request_load();
                }
            }
        }

        self.sync_view();
        Ok(())
    }

    /// Keep the table cursor inside the current derived view
    pub fn sync_view(&mut self) {
        let count = self.state.view().len();
        self.table.sync(count);
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Global shortcuts
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            return Ok(());
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Table => self.handle_table_key(key),
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let before = self.search.value.clone();

        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.set_focus(Focus::Table);
            }
            KeyCode::Char(c) => self.search.insert_char(c),
            KeyCode::Backspace => self.search.delete_char(),
            KeyCode::Delete => self.search.delete_char_forward(),
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Home => self.search.move_cursor_to_start(),
            KeyCode::End => self.search.move_cursor_to_end(),
            _ => {}
        }

        if self.search.value != before {
            self.apply_query();
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help_popup = true,
            KeyCode::Char('/') => self.set_focus(Focus::Search),
            KeyCode::Esc => {
                if !self.search.value.is_empty() {
                    self.search.clear();
                    self.apply_query();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.table.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.table.navigate_down(),
            KeyCode::PageUp => self.table.navigate_by(-PAGE_SIZE),
            KeyCode::PageDown => self.table.navigate_by(PAGE_SIZE),
            KeyCode::Home | KeyCode::Char('g') => self.table.navigate_to_first(),
            KeyCode::End | KeyCode::Char('G') => self.table.navigate_to_last(),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor_row(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.click_header(SortKey::ALL[index]);
            }
            KeyCode::Char('a') => self.state.toggle_analysis(),
            KeyCode::Char('J') => self.detail.scroll_down(1),
            KeyCode::Char('K') => self.detail.scroll_up(1),
            KeyCode::Char('r') => {
                self.request_load();
            }
            KeyCode::Char('o') => self.open_external_link(),
            _ => {}
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.search.set_focus(focus == Focus::Search);
    }

    fn apply_query(&mut self) {
        self.state.set_query(self.search.value.clone());
        self.sync_view();
        self.table.reset_cursor();
    }

    fn click_header(&mut self, key: SortKey) {
        self.state.click_header(key);
        let sort = self.state.sort_spec();
        self.status.set_info(format!(
            "Sorted by {} {}",
            sort.key.header().to_lowercase(),
            sort.direction.arrow()
        ));
        self.table.reset_cursor();
    }

    /// Select the record under the table cursor
    pub fn select_cursor_row(&mut self) {
        let id = {
            let view = self.state.view();
            self.table
                .cursor()
                .and_then(|idx| view.get(idx))
                .map(|record| record.id.clone())
        };

        if let Some(id) = id {
            if self.state.select(&id) {
                self.detail.scroll_to_top();
            }
        }
    }

    fn open_external_link(&mut self) {
        let link = self
            .state
            .current_detail()
            .and_then(|record| record.external_link())
            .map(str::to_string);

        let Some(link) = link else {
            self.status
                .set_warning("Selected document has no external link".to_string());
            return;
        };

        match open_in_browser(&link) {
            Ok(()) => {
                info!("Opened external link {}", link);
                self.status.set_info(format!("Opened {}", link));
            }
            Err(e) => {
                error!("Failed to open {}: {}", link, e);
                self.status.set_error(format!("Failed to open link: {}", e));
            }
        }
    }

    /// Message for the table when the derived view is empty
    pub fn empty_message(&self) -> String {
        if !self.state.records().is_empty() {
            "No matching files found".to_string()
        } else if self.state.is_loading() {
            "Loading documents...".to_string()
        } else if let Some(err) = self.state.last_error() {
            format!("No documents available.\n{}", err)
        } else {
            "No documents loaded".to_string()
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Table and detail
                Constraint::Length(3), // Status bar
            ])
            .split(size);

        self.search.render(f, chunks[0]);
        self.draw_body(f, chunks[1]);

        let idle = self.idle_status_text();
        self.status.render(f, chunks[2], &idle);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_body(&mut self, f: &mut Frame, area: Rect) {
        let detail = self.state.detail();
        let empty_message = self.empty_message();
        let view = self.state.view();
        let focused = self.focus == Focus::Table;

        let table_area = if detail.is_some() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);
            self.detail.render(f, columns[1], detail.as_ref());
            columns[0]
        } else {
            area
        };

        self.table.render(
            f,
            table_area,
            &view,
            self.state.sort_spec(),
            self.state.selected_id(),
            &empty_message,
            focused,
        );
    }

    fn idle_status_text(&self) -> String {
        let loading = if self.state.is_loading() { " | Loading..." } else { "" };
        format!(
            "CORTEX Explorer - {} documents{} | /: Search | 1-4: Sort | Enter: Select | q: Quit | ?: Help",
            self.state.records().len(),
            loading
        )
    }

    /// Draw help popup with shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(help_text())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }
}

fn help_text() -> String {
    "Global:\n\
    F1 / ? - Toggle this help\n\
    ESC - Close help / clear search\n\
    q - Quit\n\n\
    Documents:\n\
    ↑/↓ or j/k - Move cursor\n\
    Page Up/Down - Move by page\n\
    Home/End - First/last row\n\
    Enter/Space - Show details for row\n\
    1 - Sort by title\n\
    2 - Sort by first author\n\
    3 - Sort by created date\n\
    4 - Sort by added date\n\
    (same key again flips direction)\n\
    r - Reload documents\n\n\
    Detail:\n\
    a - Show more / less analysis\n\
    J/K - Scroll detail\n\
    o - Open original in browser\n\n\
    Search:\n\
    / - Focus search\n\
    Enter/Esc/Tab - Back to table"
        .to_string()
}

/// Open a URL with the platform opener in its own process
fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
