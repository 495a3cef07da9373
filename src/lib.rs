//! drbdtop - detail dashboard for DRBD resources.
//!
//! This library provides:
//! - `store` - the shared resource database and its feeders
//! - `stats`, `fmt` - derived metrics and their text form
//! - `logtail` - kernel log lines per resource
//! - `tui` - the interactive detail view

pub mod fmt;
pub mod logtail;
pub mod stats;
pub mod store;
pub mod tui;
