//! Resource state as produced by the ingestion side.
//!
//! Everything here is a plain value type: the store hands out clones and the
//! TUI never mutates them. Maps are `BTreeMap` so iteration is always in
//! lexicographic key order, which keeps consecutive frames comparable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cumulative KiB counter plus the most recent per-second rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub total: u64,
    pub per_second: f64,
}

/// Running statistic computed upstream: current/avg/min/max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStat {
    pub current: u64,
    pub avg: f64,
    pub min: u64,
    pub max: u64,
}

/// Local volume of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeState {
    pub minor: u32,
    pub disk_state: String,
    pub disk_hint: String,
    /// Size in KiB.
    pub size_kib: u64,
    /// Blocking side (`upper`, `lower`, ...). `None` when not blocked.
    pub blocked: Option<String>,
    pub al_suspended: bool,
    pub read_kib: Throughput,
    pub written_kib: Throughput,
}

/// Local device: volumes keyed by volume id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    pub volumes: BTreeMap<String, VolumeState>,
}

/// Link to one peer node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionState {
    pub peer: String,
    pub role: String,
    pub status: String,
    pub hint: String,
    pub congested: bool,
}

/// Volume as seen through one peer connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerVolumeState {
    /// Suspension reason (`user`, `peer`, ...). `None` when resync runs.
    pub resync_suspended: Option<String>,
    pub replication: String,
    pub replication_hint: String,
    pub disk_state: String,
    pub disk_hint: String,
    pub sent_kib: Throughput,
    pub received_kib: Throughput,
    pub out_of_sync_kib: RunningStat,
    pub pending_writes: RunningStat,
    pub unacked_writes: RunningStat,
}

/// All volumes reachable through one peer connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerDeviceState {
    pub volumes: BTreeMap<String, PeerVolumeState>,
}

/// Full state tree of one resource, copied out of the store in one piece.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSnapshot {
    pub name: String,
    pub role: String,
    pub suspended: bool,
    /// Device and connection data is meaningless when set.
    pub unconfigured: bool,
    pub danger: u64,
    pub device: DeviceState,
    pub connections: BTreeMap<String, ConnectionState>,
    pub peer_devices: BTreeMap<String, PeerDeviceState>,
}

impl ResourceSnapshot {
    /// Peer views of volume `id`, one per connection that reports it.
    pub fn peer_volumes<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PeerVolumeState> {
        self.peer_devices.values().filter_map(move |p| p.volumes.get(id))
    }
}
