//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info};

use crate::logtail::LogTail;
use crate::store::SnapshotSource;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::ViewMode;
use super::view::{DetailView, Redraw};

/// Main TUI application.
pub struct App {
    source: Box<dyn SnapshotSource>,
    log: Box<dyn LogTail>,
    view: DetailView,
    should_quit: bool,
}

impl App {
    /// Creates a new App reading from `source`. `selected` may name a
    /// resource the store does not know yet.
    pub fn new(
        source: Box<dyn SnapshotSource>,
        log: Box<dyn LogTail>,
        mode: ViewMode,
        selected: Option<String>,
    ) -> Self {
        Self {
            source,
            log,
            view: DetailView::new(mode, selected),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);
        let result = self.event_loop(&mut terminal, &events);

        // Restore terminal even if the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &EventHandler,
    ) -> io::Result<()> {
        let height = terminal.size()?.height;
        let redraw = self
            .view
            .refresh_and_relayout(self.source.as_ref(), self.log.as_ref(), height);
        self.draw(terminal, redraw)?;

        while !self.should_quit {
            let redraw = match events.next() {
                Ok(Event::Tick) => {
                    let height = terminal.size()?.height;
                    self.view
                        .refresh(self.source.as_ref(), self.log.as_ref(), height)
                }
                Ok(Event::Key(key)) => self.on_key(handle_key(key)),
                Ok(Event::Resize(height)) => {
                    terminal.autoresize()?;
                    self.view
                        .refresh_and_relayout(self.source.as_ref(), self.log.as_ref(), height)
                }
                Err(_) => {
                    self.should_quit = true;
                    Redraw::None
                }
            };
            self.draw(terminal, redraw)?;
        }
        info!("leaving detail view");
        Ok(())
    }

    fn on_key(&mut self, action: KeyAction) -> Redraw {
        let source = self.source.as_ref();
        let log = self.log.as_ref();
        match action {
            KeyAction::Quit => {
                self.should_quit = true;
                Redraw::None
            }
            KeyAction::SwitchMode(mode) => self.view.set_mode(mode, source, log),
            KeyAction::NextResource => self.view.next_resource(source, log),
            KeyAction::PrevResource => self.view.prev_resource(source, log),
            KeyAction::None => Redraw::None,
        }
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>, redraw: Redraw) -> io::Result<()> {
        if redraw == Redraw::None {
            return Ok(());
        }
        debug!(?redraw, "draw");
        terminal.draw(|frame| render(frame, &self.view))?;
        Ok(())
    }
}
