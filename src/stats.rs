//! Derived metrics for the detail view.
//!
//! Turns raw per-volume counters into in-sync percentages, resync hints and
//! health classes. Aggregates that arrive from upstream (avg/min/max) are
//! never recomputed here.

use crate::store::{PeerVolumeState, ResourceSnapshot, VolumeState};

// ---------------------------------------------------------------------------
// Canonical state labels
// ---------------------------------------------------------------------------

pub const DISK_UP_TO_DATE: &str = "UpToDate";
pub const CONN_CONNECTED: &str = "Connected";
pub const REPL_ESTABLISHED: &str = "Established";

/// Replication states that carry a running resync start with this prefix.
const SYNC_PREFIX: &str = "Sync";

// ---------------------------------------------------------------------------
// Health classification
// ---------------------------------------------------------------------------

/// Semantic color class, independent of the rendering backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Health {
    /// TUI: green.
    Healthy,
    /// TUI: red + bold.
    Unhealthy,
    /// TUI: default color. Placeholders and unknown values.
    #[default]
    Neutral,
}

fn classify(label: &str, canonical: &str) -> Health {
    if label == canonical {
        Health::Healthy
    } else {
        Health::Unhealthy
    }
}

pub fn disk_health(disk_state: &str) -> Health {
    classify(disk_state, DISK_UP_TO_DATE)
}

pub fn connection_health(status: &str) -> Health {
    classify(status, CONN_CONNECTED)
}

pub fn replication_health(replication: &str) -> Health {
    classify(replication, REPL_ESTABLISHED)
}

// ---------------------------------------------------------------------------
// In-sync percentage
// ---------------------------------------------------------------------------

/// In-sync percentage of one volume over all of its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSync {
    Percent(u8),
    /// No peer reports the volume (or it has no size): nothing to divide by.
    Unknown,
}

impl InSync {
    pub fn percent(self) -> Option<u8> {
        match self {
            InSync::Percent(p) => Some(p),
            InSync::Unknown => None,
        }
    }
}

/// Computes the in-sync percentage from summed out-of-sync KiB.
///
/// `oos` is the sum over `peers` peer volumes, each roughly `size_kib` large,
/// so the denominator is `size_kib * peers`. The result never reads 100 while
/// any KiB is still out of sync.
pub fn in_sync_percent(oos: u64, size_kib: u64, peers: u64) -> InSync {
    let total = u128::from(size_kib) * u128::from(peers);
    if total == 0 {
        return InSync::Unknown;
    }
    // Upstream counters can run ahead of the size for a tick; saturate.
    let oos_percent = (u128::from(oos) * 100 / total).min(100);
    let mut in_sync = 100 - oos_percent as u8;
    if in_sync == 100 && oos > 0 {
        in_sync = 99;
    }
    InSync::Percent(in_sync)
}

/// In-sync percentage of volume `id` of `res`, summed over every peer
/// connection that reports the volume.
pub fn volume_in_sync(res: &ResourceSnapshot, id: &str) -> InSync {
    let Some(local) = res.device.volumes.get(id) else {
        return InSync::Unknown;
    };
    let (oos, peers) = res
        .peer_volumes(id)
        .fold((0u64, 0u64), |(oos, n), pv| {
            (oos.saturating_add(pv.out_of_sync_kib.current), n + 1)
        });
    in_sync_percent(oos, local.size_kib, peers)
}

// ---------------------------------------------------------------------------
// Resync hint
// ---------------------------------------------------------------------------

/// Percentage of the local volume still to be resynced through this peer.
///
/// Only defined while the peer volume's replication state is a `Sync*` state
/// and the local size is known. Informational only.
pub fn resync_remaining(peer: &PeerVolumeState, local: Option<&VolumeState>) -> Option<f64> {
    if !peer.replication.starts_with(SYNC_PREFIX) {
        return None;
    }
    let size = local.map(|v| v.size_kib).filter(|&s| s > 0)?;
    Some(peer.out_of_sync_kib.current as f64 / size as f64 * 100.0)
}
