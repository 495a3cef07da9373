//! Built-in resource scenarios for `--demo` and tests.
//!
//! Each scenario is a ready-to-use list of resources. [`advance`] moves the
//! demo forward by one tick the way an ingestion process would: counters
//! grow, a resync makes progress and eventually restarts.

use super::model::{
    ConnectionState, PeerDeviceState, PeerVolumeState, ResourceSnapshot, RunningStat, Throughput,
    VolumeState,
};
use crate::stats::{Health, connection_health, disk_health, replication_health};

const GIB: u64 = 1024 * 1024;

/// KiB resynced per demo tick.
const RESYNC_STEP_KIB: u64 = 48 * 1024;

/// Every this many ticks an established volume pretends its peer lost the disk.
const RESYNC_RESTART_TICKS: u64 = 100;

fn local_volume(minor: u32, size_kib: u64) -> VolumeState {
    VolumeState {
        minor,
        disk_state: "UpToDate".to_string(),
        disk_hint: "normal".to_string(),
        size_kib,
        ..VolumeState::default()
    }
}

fn connection(peer: &str, role: &str) -> ConnectionState {
    ConnectionState {
        peer: peer.to_string(),
        role: role.to_string(),
        status: "Connected".to_string(),
        hint: "normal".to_string(),
        congested: false,
    }
}

fn peer_volume(oos_kib: u64) -> PeerVolumeState {
    let syncing = oos_kib > 0;
    PeerVolumeState {
        resync_suspended: None,
        replication: if syncing { "SyncSource" } else { "Established" }.to_string(),
        replication_hint: "normal".to_string(),
        disk_state: if syncing { "Inconsistent" } else { "UpToDate" }.to_string(),
        disk_hint: "normal".to_string(),
        out_of_sync_kib: RunningStat {
            current: oos_kib,
            avg: oos_kib as f64,
            min: oos_kib,
            max: oos_kib,
        },
        ..PeerVolumeState::default()
    }
}

/// Danger score: one point per unhealthy disk, connection or replication label.
pub fn danger_score(res: &ResourceSnapshot) -> u64 {
    if res.unconfigured {
        return 0;
    }
    let local = res
        .device
        .volumes
        .values()
        .map(|v| disk_health(&v.disk_state));
    let conns = res.connections.values().map(|c| connection_health(&c.status));
    let peers = res.peer_devices.values().flat_map(|pd| {
        pd.volumes.values().flat_map(|pv| {
            [
                disk_health(&pv.disk_state),
                replication_health(&pv.replication),
            ]
        })
    });
    local
        .chain(conns)
        .chain(peers)
        .filter(|h| *h == Health::Unhealthy)
        .count() as u64
}

/// Two configured resources and one unconfigured one.
///
/// `r0` has two volumes replicated to `alpha` and `bravo`; volume `1` is
/// resyncing towards `bravo`. `r1` has a single peer that is connecting.
pub fn demo_resources() -> Vec<ResourceSnapshot> {
    let mut r0 = ResourceSnapshot {
        name: "r0".to_string(),
        role: "Primary".to_string(),
        ..ResourceSnapshot::default()
    };
    r0.device
        .volumes
        .insert("0".to_string(), local_volume(100, 10 * GIB));
    r0.device
        .volumes
        .insert("1".to_string(), local_volume(101, 4 * GIB));
    for (peer, oos1) in [("alpha", 0), ("bravo", 3 * GIB)] {
        r0.connections
            .insert(peer.to_string(), connection(peer, "Secondary"));
        let mut pd = PeerDeviceState::default();
        pd.volumes.insert("0".to_string(), peer_volume(0));
        pd.volumes.insert("1".to_string(), peer_volume(oos1));
        r0.peer_devices.insert(peer.to_string(), pd);
    }

    let mut r1 = ResourceSnapshot {
        name: "r1".to_string(),
        role: "Secondary".to_string(),
        ..ResourceSnapshot::default()
    };
    r1.device
        .volumes
        .insert("0".to_string(), local_volume(110, 2 * GIB));
    r1.connections.insert(
        "charlie".to_string(),
        ConnectionState {
            status: "Connecting".to_string(),
            ..connection("charlie", "Unknown")
        },
    );

    let r2 = ResourceSnapshot {
        name: "r2".to_string(),
        role: "Unknown".to_string(),
        unconfigured: true,
        ..ResourceSnapshot::default()
    };

    let mut resources = vec![r0, r1, r2];
    for res in &mut resources {
        res.danger = danger_score(res);
    }
    resources
}

fn bump(t: &mut Throughput, kib: u64) {
    t.total = t.total.saturating_add(kib);
    t.per_second = kib as f64;
}

fn track(stat: &mut RunningStat, current: u64, tick: u64) {
    let n = tick.max(1) as f64;
    stat.avg += (current as f64 - stat.avg) / n;
    stat.min = stat.min.min(current);
    stat.max = stat.max.max(current);
    stat.current = current;
}

/// Moves `resources` forward by one demo tick.
pub fn advance(resources: &mut [ResourceSnapshot], tick: u64) {
    for res in resources.iter_mut().filter(|r| !r.unconfigured) {
        let sizes: Vec<(String, u64)> = res
            .device
            .volumes
            .iter()
            .map(|(id, v)| (id.clone(), v.size_kib))
            .collect();
        for vol in res.device.volumes.values_mut() {
            bump(&mut vol.read_kib, 256 + (tick % 7) * 64);
            bump(&mut vol.written_kib, 128 + (tick % 5) * 32);
        }

        for pd in res.peer_devices.values_mut() {
            for (id, pv) in pd.volumes.iter_mut() {
                let size = sizes
                    .iter()
                    .find(|(vid, _)| vid == id)
                    .map(|(_, s)| *s)
                    .unwrap_or(0);
                let oos = pv.out_of_sync_kib.current;
                let next = if oos > 0 {
                    oos.saturating_sub(RESYNC_STEP_KIB)
                } else if tick > 0 && tick % RESYNC_RESTART_TICKS == 0 {
                    size / 4
                } else {
                    0
                };
                let fresh = peer_volume(next);
                pv.replication = fresh.replication;
                pv.disk_state = fresh.disk_state;
                track(&mut pv.out_of_sync_kib, next, tick);
                track(&mut pv.pending_writes, tick % 4, tick);
                track(&mut pv.unacked_writes, tick % 3, tick);
                bump(&mut pv.sent_kib, oos.saturating_sub(next) + 128);
                bump(&mut pv.received_kib, 16);
            }
        }
        res.danger = danger_score(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{InSync, volume_in_sync};

    #[test]
    fn demo_has_expected_shape() {
        let res = demo_resources();
        let names: Vec<&str> = res.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r0", "r1", "r2"]);
        assert!(res[2].unconfigured);
        assert_eq!(res[2].danger, 0);
        // bravo: Inconsistent + SyncSource on volume 1.
        assert_eq!(res[0].danger, 2);
        // charlie: Connecting.
        assert_eq!(res[1].danger, 1);
    }

    #[test]
    fn resync_progresses_to_established() {
        let mut res = demo_resources();
        let start = volume_in_sync(&res[0], "1");
        assert_eq!(start, InSync::Percent(63));

        for tick in 1..=64 {
            advance(&mut res, tick);
        }
        assert_eq!(volume_in_sync(&res[0], "1"), InSync::Percent(100));
        let bravo = &res[0].peer_devices["bravo"].volumes["1"];
        assert_eq!(bravo.replication, "Established");
        assert_eq!(bravo.disk_state, "UpToDate");
        assert_eq!(bravo.out_of_sync_kib.max, 3 * GIB);
        assert_eq!(res[0].danger, 0);
    }

    #[test]
    fn counters_grow() {
        let mut res = demo_resources();
        advance(&mut res, 1);
        advance(&mut res, 2);
        let vol = &res[0].device.volumes["0"];
        assert!(vol.read_kib.total > 0);
        assert!(vol.written_kib.per_second > 0.0);
    }
}
