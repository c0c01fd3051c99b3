use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::io::http::HttpClient;
use crate::io::session::Session;
use crate::model::page::Page;
use crate::model::target::TargetId;
use crate::ops::classify::Reply;
use crate::ops::filter_controller::FilterController;
use crate::ops::toggle::{Pending, ToggleController, ToggleError, Transport, TransportError};

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop sleeps waiting for a key.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// The search input has focus
    Search,
}

/// One selectable row of the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// A visible post card (index into `page.items`)
    Post(usize),
    /// A like control with no post card around it, as on a detail page
    Like(TargetId),
}

/// A finished network round trip, handed back to the event loop.
pub type Settled = (Pending, Result<Reply, TransportError>);

/// Main application state
pub struct App {
    pub page: Page,
    pub filter: FilterController,
    pub toggle: ToggleController<HttpClient>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into `rows()`
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Help overlay visible
    pub show_help: bool,
    /// Show key hints in the status row when there is no notice
    pub show_key_hints: bool,
    /// Like attempts that passed `begin` and still have to be sent
    pub outbox: Vec<Pending>,
}

impl App {
    pub fn new(mut page: Page, client: HttpClient, theme: Theme) -> Self {
        let filter = FilterController::new(&mut page);
        App {
            page,
            filter,
            toggle: ToggleController::new(client),
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            show_help: false,
            show_key_hints: false,
            outbox: Vec::new(),
        }
    }

    /// Rows in display order. A post list shows its visible cards; a page
    /// without cards shows its like controls.
    pub fn rows(&self) -> Vec<Row> {
        if self.page.items.is_empty() {
            (0..self.page.targets.len()).map(Row::Like).collect()
        } else {
            self.page.visible_items().map(|(i, _)| Row::Post(i)).collect()
        }
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    pub fn selected_target(&self) -> Option<TargetId> {
        match self.selected_row()? {
            Row::Post(i) => self.page.items.get(i)?.like,
            Row::Like(id) => Some(id),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Keep the cursor on an existing row after the visible set changed.
    pub fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.cursor);
    }

    /// Start a like attempt on the selected post. The request is queued in
    /// the outbox; the event loop sends it.
    pub fn like_selected(&mut self) {
        let Some(id) = self.selected_target() else {
            return;
        };
        match self.toggle.begin(&mut self.page, id) {
            Ok(pending) => self.outbox.push(pending),
            Err(ToggleError::InFlight) => debug!(target_id = id, "ignoring repeated like"),
            // Already rolled back with a notice on the page
            Err(_) => {}
        }
    }

    pub fn settle(&mut self, settled: Settled) {
        let (pending, reply) = settled;
        let _ = self.toggle.settle(&mut self.page, pending, reply);
    }

    /// Fire the debounced filter if it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.filter.tick(&mut self.page, now).is_some() {
            self.clamp_cursor();
        }
    }

    /// How long the event loop may block before the next due work.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.filter.deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }
}

/// Run the TUI application
pub fn run(session: Session, runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let page = runtime.block_on(session.load_page())?;
    let mut app = App::new(page, session.client, Theme::from_config(&session.config.ui));
    app.show_key_hints = session.config.ui.show_key_hints;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(address = %app.page.address.current(), "leaving");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Settled>();
    loop {
        app.tick(Instant::now());
        while let Ok(settled) = rx.try_recv() {
            app.settle(settled);
        }
        for pending in app.outbox.drain(..) {
            let client = app.toggle.transport().clone();
            let tx = tx.clone();
            runtime.spawn(async move {
                let reply = client.send(pending.request.clone()).await;
                let _ = tx.send((pending, reply));
            });
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
