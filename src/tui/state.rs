//! View modes of the detail dashboard.

use clap::ValueEnum;

/// What the body of the detail view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ViewMode {
    /// One in-sync gauge per volume.
    #[value(name = "insync")]
    InSyncGauges,
    #[default]
    #[value(name = "status")]
    Status,
    #[value(name = "detailed")]
    DetailedStatus,
    /// Kernel log lines mentioning the resource.
    #[value(name = "dmesg")]
    LogTail,
}

impl ViewMode {
    pub fn all() -> &'static [ViewMode] {
        &[
            ViewMode::InSyncGauges,
            ViewMode::Status,
            ViewMode::DetailedStatus,
            ViewMode::LogTail,
        ]
    }

    /// Returns the display name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::InSyncGauges => "inSync",
            ViewMode::Status => "status",
            ViewMode::DetailedStatus => "detailed status",
            ViewMode::LogTail => "dmesg",
        }
    }

    /// Key that selects this mode.
    pub fn key(&self) -> char {
        match self {
            ViewMode::InSyncGauges => 'i',
            ViewMode::Status => 's',
            ViewMode::DetailedStatus => 'd',
            ViewMode::LogTail => 'm',
        }
    }

    pub fn from_key(c: char) -> Option<ViewMode> {
        Self::all().iter().copied().find(|m| m.key() == c)
    }

    /// Text modes share one scrolling paragraph body.
    pub fn is_text(&self) -> bool {
        !matches!(self, ViewMode::InSyncGauges)
    }
}
