//! Writers that keep a [`ResourceStore`] populated.
//!
//! The detail view only reads. In a full deployment the store is filled by
//! an event parser; the feeders here cover the standalone binary: a JSON
//! state file that is re-read periodically, and the built-in demo.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::ResourceStore;
use super::model::ResourceSnapshot;
use super::scenario;

/// Error raised while loading resource state.
#[derive(Debug)]
pub enum FeedError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            FeedError::Parse { path, source } => {
                write!(f, "cannot parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Io { source, .. } => Some(source),
            FeedError::Parse { source, .. } => Some(source),
        }
    }
}

/// Running feeder thread. Stops when [`FeederHandle::shutdown`] is called.
pub struct FeederHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FeederHandle {
    fn spawn<F>(name: &str, interval: Duration, mut step: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while !flag.load(Ordering::Relaxed) {
                    step();
                    sleep_unless_stopped(&flag, interval);
                }
            })?;
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Signals the thread to stop and waits for it.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take()
            && t.join().is_err()
        {
            warn!("feeder thread panicked");
        }
    }
}

/// Sleeps in short slices so shutdown is not delayed by a long interval.
fn sleep_unless_stopped(flag: &AtomicBool, interval: Duration) {
    let slice = Duration::from_millis(50);
    let mut left = interval;
    while !left.is_zero() && !flag.load(Ordering::Relaxed) {
        let d = left.min(slice);
        thread::sleep(d);
        left -= d;
    }
}

/// Loads a JSON array of resources from `path` into `store`.
pub struct StateFileFeeder {
    path: PathBuf,
}

impl StateFileFeeder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and parses the state file.
    pub fn load(&self) -> Result<Vec<ResourceSnapshot>, FeedError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FeedError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads once into `store`. On error the store is left untouched.
    pub fn load_into(&self, store: &ResourceStore) -> Result<usize, FeedError> {
        let resources = self.load()?;
        let n = resources.len();
        store.replace_all(resources);
        debug!(path = %self.path.display(), resources = n, "state file loaded");
        Ok(n)
    }

    /// Re-reads the file every `interval` on a background thread.
    pub fn spawn(self, store: ResourceStore, interval: Duration) -> io::Result<FeederHandle> {
        info!(path = %self.path.display(), "watching state file");
        FeederHandle::spawn("state-file-feeder", interval, move || {
            if let Err(e) = self.load_into(&store) {
                warn!(error = %e, "state file reload failed, keeping previous state");
            }
        })
    }
}

/// Animates [`scenario::demo_resources`] once per interval.
pub struct DemoFeeder {
    resources: Vec<ResourceSnapshot>,
    tick: u64,
}

impl DemoFeeder {
    pub fn new() -> Self {
        Self {
            resources: scenario::demo_resources(),
            tick: 0,
        }
    }

    /// Advances the scenario by one tick and publishes it to `store`.
    pub fn step(&mut self, store: &ResourceStore) {
        if self.tick > 0 {
            scenario::advance(&mut self.resources, self.tick);
        }
        self.tick += 1;
        store.replace_all(self.resources.clone());
    }

    pub fn spawn(mut self, store: ResourceStore, interval: Duration) -> io::Result<FeederHandle> {
        info!("starting demo feeder");
        FeederHandle::spawn("demo-feeder", interval, move || self.step(&store))
    }
}

impl Default for DemoFeeder {
    fn default() -> Self {
        Self::new()
    }
}
