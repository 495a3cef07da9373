//! Status and detailed-status panel content.

use crate::fmt::{device_path, kib_to_human, percent_1, running_count, running_kib, throughput};
use crate::stats::{REPL_ESTABLISHED, connection_health, disk_health, resync_remaining};
use crate::store::{ConnectionState, PeerDeviceState, ResourceSnapshot};

use super::{PanelText, TextWriter};

pub const TXT_UNCONFIGURED: &str =
    "This resource is Unconfigured, no further information available.";

/// Placeholder for a selected resource the store does not know (any more).
pub fn render_missing(name: &str) -> PanelText {
    let mut w = TextWriter::new();
    w.plain(format!("Resource {} is not available.", name));
    w.finish()
}

/// Single-line placeholder for an unconfigured resource.
pub fn render_unconfigured() -> PanelText {
    let mut w = TextWriter::new();
    w.plain(TXT_UNCONFIGURED);
    w.finish()
}

/// Builds the status panel for `res`. `detailed` adds markers, sizes,
/// throughput and running statistics.
pub fn render_status(res: &ResourceSnapshot, detailed: bool) -> PanelText {
    let mut w = TextWriter::new();
    write_header(&mut w, res);

    if res.unconfigured {
        w.newline();
        w.plain(TXT_UNCONFIGURED).newline();
        return w.finish();
    }

    write_local_disk(&mut w, res, detailed);
    w.newline();

    for (name, conn) in &res.connections {
        write_connection(&mut w, conn);
        if let Some(pd) = res.peer_devices.get(name) {
            write_peer_device(&mut w, res, pd, detailed);
        }
        w.newline();
    }

    w.finish()
}

fn write_header(w: &mut TextWriter, res: &ResourceSnapshot) {
    w.label("Resource")
        .plain(format!(": {}: (Overall danger score: {}) ", res.name, res.danger));
    if res.suspended {
        w.plain("(Suspended)");
    }
    w.newline();
}

fn write_local_disk(w: &mut TextWriter, res: &ResourceSnapshot, detailed: bool) {
    w.plain(" ")
        .label("Local Disc")
        .plain(format!("({}):", res.role))
        .newline();

    for (id, v) in &res.device.volumes {
        w.plain(format!("  volume {} ({}): ", id, device_path(v.minor)))
            .state(v.disk_state.as_str(), disk_health(&v.disk_state))
            .plain(format!("({})", v.disk_hint));

        if detailed {
            if let Some(side) = &v.blocked {
                w.plain(format!(" Blocked: {} ", side));
            }
            if v.al_suspended {
                w.plain(" Activity Log Suspended ");
            }
            w.newline();
            w.plain(format!(
                "    size: {} total-read:{} read/Sec:{} total-written:{} written/Sec:{} ",
                kib_to_human(v.size_kib as f64),
                kib_to_human(v.read_kib.total as f64),
                kib_to_human(v.read_kib.per_second),
                kib_to_human(v.written_kib.total as f64),
                kib_to_human(v.written_kib.per_second),
            ));
        }
        w.newline();
    }
}

fn write_connection(w: &mut TextWriter, c: &ConnectionState) {
    w.label(format!(" Connection to {}", c.peer))
        .plain(format!("({}): ", c.role))
        .state(c.status.as_str(), connection_health(&c.status))
        .plain(format!("({})", c.hint));
    if c.congested {
        w.plain(" Congested ");
    }
    w.newline();
}

fn write_peer_device(
    w: &mut TextWriter,
    res: &ResourceSnapshot,
    pd: &PeerDeviceState,
    detailed: bool,
) {
    for (id, v) in &pd.volumes {
        w.plain(format!("  volume {}: ", id));
        if let Some(reason) = &v.resync_suspended {
            w.plain(format!(" ResyncSuspended:{} ", reason));
        }
        w.newline();

        if v.replication != REPL_ESTABLISHED {
            w.plain(format!("   Replication:{}({})", v.replication, v.replication_hint));
        }
        if let Some(remaining) = resync_remaining(v, res.device.volumes.get(id)) {
            w.plain(format!(" {} remaining", percent_1(remaining)));
        }
        w.plain("   ")
            .state(v.disk_state.as_str(), disk_health(&v.disk_state))
            .plain(format!("({})", v.disk_hint))
            .newline();

        if detailed {
            w.plain(format!("   Sent: {}", throughput(&v.sent_kib))).newline();
            w.plain(format!("   Received: {}", throughput(&v.received_kib)))
                .newline();
            w.plain(format!("   OutOfSync: {}", running_kib(&v.out_of_sync_kib)))
                .newline();
            w.plain(format!("   PendingWrites: {}", running_count(&v.pending_writes)))
                .newline();
            w.plain(format!("   UnackedWrites: {}", running_count(&v.unacked_writes)))
                .newline();
            w.newline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Health;
    use crate::store::scenario::demo_resources;
    use crate::store::{PeerVolumeState, RunningStat, VolumeState};
    use crate::tui::panels::TextClass;

    fn r0() -> ResourceSnapshot {
        demo_resources().remove(0)
    }

    #[test]
    fn test_status_layout() {
        let text = render_status(&r0(), false).to_plain();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Resource: r0: (Overall danger score: 2) ");
        assert_eq!(lines[1], " Local Disc(Primary):");
        assert_eq!(lines[2], "  volume 0 (/dev/drbd100): UpToDate(normal)");
        assert_eq!(lines[3], "  volume 1 (/dev/drbd101): UpToDate(normal)");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], " Connection to alpha(Secondary): Connected(normal)");
        assert_eq!(lines[6], "  volume 0: ");
        assert_eq!(lines[7], "   UpToDate(normal)");

        // bravo is resyncing volume 1: 3 GiB of 4 GiB left.
        let bravo = lines
            .iter()
            .position(|l| l.starts_with(" Connection to bravo"))
            .unwrap();
        assert_eq!(
            lines[bravo + 4],
            "   Replication:SyncSource(normal) 75.0% remaining   Inconsistent(normal)"
        );
        assert!(!text.contains("Sent:"));
    }

    #[test]
    fn test_local_disc_shows_resource_role() {
        let mut res = r0();
        res.role = "Secondary".to_string();
        let text = render_status(&res, true).to_plain();
        assert_eq!(text.lines().nth(1), Some(" Local Disc(Secondary):"));
        // Peer roles stay on their connection lines.
        assert!(text.contains(" Connection to alpha(Secondary): "));
    }

    #[test]
    fn test_status_is_idempotent() {
        let res = r0();
        assert_eq!(render_status(&res, false), render_status(&res, false));
        assert_eq!(render_status(&res, true), render_status(&res, true));
    }

    #[test]
    fn test_detailed_adds_figures() {
        let mut res = r0();
        let v0 = res.device.volumes.get_mut("0").unwrap();
        v0.blocked = Some("upper".to_string());
        v0.al_suspended = true;

        let text = render_status(&res, true).to_plain();
        assert!(text.contains(" Blocked: upper "));
        assert!(text.contains(" Activity Log Suspended "));
        assert!(text.contains("    size: 10.0GiB total-read:0.0KiB"));
        assert!(text.contains("   Sent: total:0.0KiB Per/Sec:0.0KiB"));
        assert!(text.contains("   OutOfSync: current:3.0GiB average:3.0GiB min:3.0GiB max:3.0GiB"));
        assert!(text.contains("   PendingWrites: current:0.0 average:0.0 min:0.0 max:0.0"));

        // Markers are detailed-only.
        let plain = render_status(&res, false).to_plain();
        assert!(!plain.contains("Blocked"));
    }

    #[test]
    fn test_unconfigured_shows_only_placeholder() {
        let res = ResourceSnapshot {
            name: "r2".to_string(),
            unconfigured: true,
            ..r0()
        };
        let text = render_status(&res, true);
        let body: Vec<String> = text.lines[1..]
            .iter()
            .map(|l| l.text())
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(body, vec![TXT_UNCONFIGURED.to_string()]);
        assert!(!text.to_plain().contains("Local Disc"));
        assert!(!text.to_plain().contains("Connection"));
    }

    #[test]
    fn test_health_classes() {
        let text = render_status(&r0(), false);
        let states: Vec<(String, TextClass)> = text
            .lines
            .iter()
            .flat_map(|l| l.segments.iter())
            .filter(|s| matches!(s.class, TextClass::State(_)))
            .map(|s| (s.text.clone(), s.class))
            .collect();
        assert!(states.contains(&("Connected".to_string(), TextClass::State(Health::Healthy))));
        assert!(states.contains(&(
            "Inconsistent".to_string(),
            TextClass::State(Health::Unhealthy)
        )));
        assert!(states.contains(&("UpToDate".to_string(), TextClass::State(Health::Healthy))));
    }

    #[test]
    fn test_markers_and_missing_local_volume() {
        let mut res = ResourceSnapshot {
            name: "rx".to_string(),
            suspended: true,
            ..ResourceSnapshot::default()
        };
        res.device.volumes.insert("0".to_string(), VolumeState::default());
        res.connections.insert(
            "p".to_string(),
            ConnectionState {
                peer: "p".to_string(),
                status: "Connected".to_string(),
                congested: true,
                ..ConnectionState::default()
            },
        );
        let mut pd = PeerDeviceState::default();
        pd.volumes.insert(
            "9".to_string(),
            PeerVolumeState {
                resync_suspended: Some("user".to_string()),
                replication: "SyncTarget".to_string(),
                out_of_sync_kib: RunningStat {
                    current: 5,
                    ..RunningStat::default()
                },
                ..PeerVolumeState::default()
            },
        );
        res.peer_devices.insert("p".to_string(), pd);

        let text = render_status(&res, false).to_plain();
        assert!(text.starts_with("Resource: rx: (Overall danger score: 0) (Suspended)\n"));
        assert!(text.contains(" Congested "));
        assert!(text.contains("  volume 9:  ResyncSuspended:user "));
        // No local volume 9: no remaining hint.
        assert!(text.contains("   Replication:SyncTarget()   "));
        assert!(!text.contains("remaining"));
    }

    #[test]
    fn test_missing_placeholder() {
        assert_eq!(render_missing("r7").to_plain(), "Resource r7 is not available.");
        assert_eq!(render_unconfigured().to_plain(), TXT_UNCONFIGURED);
    }
}
