//! Event handling for the TUI.
//!
//! A separate thread polls for terminal events and produces timer ticks.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tracing::warn;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer tick for data refresh.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize to the given height.
    Resize(u16),
}

/// Event handler that polls for terminal events in a separate thread.
///
/// The channel closes when the poller stops, so [`EventHandler::next`]
/// returns an error instead of blocking forever.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler with the specified tick rate.
    ///
    /// Ticks keep their cadence while keys are pressed.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || pump(tick_rate, &tx, event::poll, event::read));
        Self { rx }
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Forwards terminal events and ticks until the receiver is gone or polling
/// fails.
fn pump<P, R>(tick_rate: Duration, tx: &Sender<Event>, mut poll: P, mut read: R)
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<CrosstermEvent>,
{
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        match poll(timeout) {
            Ok(true) => {
                let Ok(evt) = read() else { continue };
                let event = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    CrosstermEvent::Resize(_, height) => Event::Resize(height),
                    _ => continue,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            Ok(false) => {
                last_tick = Instant::now();
                if tx.send(Event::Tick).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "terminal event poll failed");
                break;
            }
        }
    }
}
