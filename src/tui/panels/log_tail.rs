//! Kernel log panel.

use crate::logtail::LogTailError;

use super::{PanelText, TextWriter};

/// Body rows that are not log lines: the top border and the header line.
const LOG_TAIL_OVERHEAD: u16 = 2;

/// Number of log lines that fit a body of `body_height` rows.
pub fn log_line_budget(body_height: u16) -> usize {
    usize::from(body_height.saturating_sub(LOG_TAIL_OVERHEAD))
}

/// Builds the log panel. Only the last `max_lines` lines are kept; an error
/// replaces the whole panel.
pub fn render_log_tail(
    resource: &str,
    fetched: &Result<Vec<String>, LogTailError>,
    max_lines: usize,
) -> PanelText {
    let mut w = TextWriter::new();
    match fetched {
        Err(e) => {
            w.plain(e.to_string()).newline();
        }
        Ok(lines) => {
            w.label("Kernel log for resource")
                .plain(" ")
                .label(resource)
                .plain(":")
                .newline();
            let skip = lines.len().saturating_sub(max_lines);
            for line in &lines[skip..] {
                w.plain(line.as_str()).newline();
            }
        }
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("drbd r0: line {}", i)).collect()
    }

    #[test]
    fn test_budget() {
        assert_eq!(log_line_budget(20), 18);
        assert_eq!(log_line_budget(2), 0);
        assert_eq!(log_line_budget(0), 0);
    }

    #[test]
    fn test_keeps_most_recent_lines() {
        let text = render_log_tail("r0", &Ok(lines(10)), 3);
        let plain = text.to_plain();
        let rows: Vec<&str> = plain.lines().collect();
        assert_eq!(rows[0], "Kernel log for resource r0:");
        assert_eq!(&rows[1..], &["drbd r0: line 7", "drbd r0: line 8", "drbd r0: line 9"]);
    }

    #[test]
    fn test_fewer_lines_shown_in_full() {
        let text = render_log_tail("r0", &Ok(lines(2)), 18);
        assert_eq!(text.lines.len(), 3);
    }

    #[test]
    fn test_error_replaces_panel() {
        let err = LogTailError::Spawn {
            program: "dmesg".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let text = render_log_tail("r0", &Err(err), 18);
        assert_eq!(text.to_plain(), "could not run dmesg: not found");
    }
}
