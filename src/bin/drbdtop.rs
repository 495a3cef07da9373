//! drbdtop - per-resource detail dashboard for DRBD.
//!
//! Usage:
//!   drbdtop --demo                       # built-in scenario, 1 second interval
//!   drbdtop --state-file state.json 2    # re-read a JSON state file every 2 seconds
//!   drbdtop --demo --mode insync -r r0   # start on the gauges of r0
//!   drbdtop --demo --kernel-log /var/log/kern.log

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use drbdtop::logtail::{DmesgTail, FileTail, LogTail};
use drbdtop::store::{DemoFeeder, FeederHandle, ResourceStore, StateFileFeeder};
use drbdtop::tui::{App, ViewMode};

/// Detail dashboard for DRBD resources.
#[derive(Parser)]
#[command(name = "drbdtop", version, about = "DRBD resource detail dashboard")]
struct Args {
    /// Refresh interval in seconds.
    #[arg(
        value_name = "INTERVAL",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Resource to show first (default: the first one known).
    #[arg(short, long, value_name = "NAME")]
    resource: Option<String>,

    /// Initial view mode.
    #[arg(short, long, value_enum, default_value_t = ViewMode::Status)]
    mode: ViewMode,

    /// JSON file holding an array of resources; re-read every interval.
    #[arg(long, value_name = "PATH", conflicts_with = "demo")]
    state_file: Option<PathBuf>,

    /// Run the built-in demo scenario.
    #[arg(long)]
    demo: bool,

    /// Write logs to this file (the terminal belongs to the UI).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Tail this file instead of running dmesg.
    #[arg(long, value_name = "PATH")]
    kernel_log: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes logging into `path`. Without a path nothing is logged.
fn init_logging(path: Option<&PathBuf>, verbose: u8, quiet: bool) -> std::io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;

    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("drbdtop={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Starts the writer side of the store. A state file must load once before
/// the UI starts.
fn start_feeder(
    args: &Args,
    store: &ResourceStore,
    interval: Duration,
) -> Result<FeederHandle, Box<dyn Error>> {
    let handle = match &args.state_file {
        Some(path) => {
            let feeder = StateFileFeeder::new(path);
            let n = feeder.load_into(store)?;
            info!(resources = n, "initial state loaded");
            feeder.spawn(store.clone(), interval)?
        }
        None => DemoFeeder::new().spawn(store.clone(), interval)?,
    };
    Ok(handle)
}

fn main() {
    let args = Args::parse();

    if args.state_file.is_none() && !args.demo {
        eprintln!("Error: no data source");
        eprintln!("Usage: drbdtop --state-file PATH [INTERVAL]   # JSON resource state");
        eprintln!("       drbdtop --demo [INTERVAL]              # built-in scenario");
        std::process::exit(1);
    }

    if let Err(e) = init_logging(args.log_file.as_ref(), args.verbose, args.quiet) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let interval = Duration::from_secs(args.interval);
    let store = ResourceStore::new();
    let feeder = match start_feeder(&args, &store, interval) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let log: Box<dyn LogTail> = match &args.kernel_log {
        Some(path) => Box::new(FileTail::new(path)),
        None => Box::new(DmesgTail::new()),
    };

    info!(interval = args.interval, mode = args.mode.name(), "drbdtop starting");
    let app = App::new(Box::new(store), log, args.mode, args.resource.clone());
    let result = app.run(interval);
    feeder.shutdown();

    if let Err(e) = result {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
