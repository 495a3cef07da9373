//! Shared formatting helpers for the detail panels.
//!
//! Pure functions only: no styles, no layout.

use crate::store::{RunningStat, Throughput};

const KIB_UNITS: [&str; 8] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Format a KiB amount with a binary suffix and one decimal.
///
/// `512.0` -> `"512.0KiB"`, `1536.0` -> `"1.5MiB"`, `1_000_000.0` -> `"976.6MiB"`.
pub fn kib_to_human(kib: f64) -> String {
    let mut value = kib;
    for unit in &KIB_UNITS[..KIB_UNITS.len() - 1] {
        if value.abs() < 1024.0 {
            return format!("{:.1}{}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1}{}", value, KIB_UNITS[KIB_UNITS.len() - 1])
}

/// `total:<human> Per/Sec:<human>` pair used for sent/received lines.
pub fn throughput(t: &Throughput) -> String {
    format!(
        "total:{} Per/Sec:{}",
        kib_to_human(t.total as f64),
        kib_to_human(t.per_second)
    )
}

/// Running statistic of a KiB quantity.
pub fn running_kib(s: &RunningStat) -> String {
    format!(
        "current:{} average:{} min:{} max:{}",
        kib_to_human(s.current as f64),
        kib_to_human(s.avg),
        kib_to_human(s.min as f64),
        kib_to_human(s.max as f64)
    )
}

/// Running statistic of a plain count (pending/unacked writes).
pub fn running_count(s: &RunningStat) -> String {
    format!(
        "current:{:.1} average:{:.1} min:{:.1} max:{:.1}",
        s.current as f64, s.avg, s.min as f64, s.max as f64
    )
}

/// Percentage with one decimal: `"12.5%"`.
pub fn percent_1(p: f64) -> String {
    format!("{:.1}%", p)
}

/// Device node of a minor number.
pub fn device_path(minor: u32) -> String {
    format!("/dev/drbd{}", minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kib_to_human_scales() {
        assert_eq!(kib_to_human(0.0), "0.0KiB");
        assert_eq!(kib_to_human(512.0), "512.0KiB");
        assert_eq!(kib_to_human(1536.0), "1.5MiB");
        assert_eq!(kib_to_human(1_000_000.0), "976.6MiB");
        assert_eq!(kib_to_human(1024.0 * 1024.0 * 3.0), "3.0GiB");
    }

    #[test]
    fn test_kib_to_human_saturates_at_last_unit() {
        let huge = 1024f64.powi(8);
        assert_eq!(kib_to_human(huge), "1024.0YiB");
    }

    #[test]
    fn test_running_stats() {
        let s = RunningStat {
            current: 2048,
            avg: 1024.0,
            min: 0,
            max: 4096,
        };
        assert_eq!(
            running_kib(&s),
            "current:2.0MiB average:1.0MiB min:0.0KiB max:4.0MiB"
        );

        let w = RunningStat {
            current: 3,
            avg: 1.5,
            min: 0,
            max: 9,
        };
        assert_eq!(running_count(&w), "current:3.0 average:1.5 min:0.0 max:9.0");
    }

    #[test]
    fn test_throughput() {
        let t = Throughput {
            total: 2048,
            per_second: 10.0,
        };
        assert_eq!(throughput(&t), "total:2.0MiB Per/Sec:10.0KiB");
    }

    #[test]
    fn test_small_helpers() {
        assert_eq!(percent_1(12.34), "12.3%");
        assert_eq!(device_path(100), "/dev/drbd100");
    }
}
