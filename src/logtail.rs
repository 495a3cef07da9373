//! Kernel log lines for one resource.
//!
//! The detail view asks for at most `max_lines` recent lines that mention
//! the selected resource. Sources are synchronous and are called from within
//! a tick; a failure is shown as the panel content and retried on the next
//! tick.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Error returned by a [`LogTail`] source.
#[derive(Debug)]
pub enum LogTailError {
    /// The log reader could not be started.
    Spawn { program: String, source: io::Error },
    /// The log reader ran but exited unsuccessfully.
    Exit { program: String, stderr: String },
    /// A log file could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for LogTailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTailError::Spawn { program, source } => {
                write!(f, "could not run {}: {}", program, source)
            }
            LogTailError::Exit { program, stderr } => {
                if stderr.is_empty() {
                    write!(f, "{} failed", program)
                } else {
                    write!(f, "{} failed: {}", program, stderr)
                }
            }
            LogTailError::Read { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LogTailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogTailError::Spawn { source, .. } | LogTailError::Read { source, .. } => Some(source),
            LogTailError::Exit { .. } => None,
        }
    }
}

/// Source of recent log lines.
pub trait LogTail {
    /// Returns up to `max_lines` most recent lines about `resource`, oldest first.
    fn tail(&self, resource: &str, max_lines: usize) -> Result<Vec<String>, LogTailError>;
}

/// Returns true if `line` is a DRBD kernel message about `resource`.
///
/// Kernel messages are prefixed `drbd <res>:`, `drbd <res>/<vol> ...` or
/// `drbd <res> <peer>: ...`; the name must end at one of those separators so
/// `r1` does not match `r10`.
pub fn mentions_resource(line: &str, resource: &str) -> bool {
    let needle = format!("drbd {}", resource);
    line.match_indices(&needle).any(|(at, _)| {
        matches!(
            line[at + needle.len()..].chars().next(),
            None | Some(':') | Some('/') | Some(' ')
        )
    })
}

/// Keeps the last `max_lines` lines of `text` that mention `resource`.
pub fn last_matching(text: &str, resource: &str, max_lines: usize) -> Vec<String> {
    let matching: Vec<&str> = text
        .lines()
        .filter(|l| mentions_resource(l, resource))
        .collect();
    let start = matching.len().saturating_sub(max_lines);
    matching[start..].iter().map(|l| l.to_string()).collect()
}

/// Reads the kernel ring buffer through `dmesg`.
#[derive(Debug, Clone)]
pub struct DmesgTail {
    program: String,
}

impl DmesgTail {
    pub fn new() -> Self {
        Self {
            program: "dmesg".to_string(),
        }
    }

    /// Uses a different executable (e.g. a wrapper script).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DmesgTail {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTail for DmesgTail {
    fn tail(&self, resource: &str, max_lines: usize) -> Result<Vec<String>, LogTailError> {
        let output = Command::new(&self.program)
            .output()
            .map_err(|source| LogTailError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(LogTailError::Exit {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(last_matching(&text, resource, max_lines))
    }
}

/// Reads a kernel log file (e.g. `/var/log/kern.log`).
#[derive(Debug, Clone)]
pub struct FileTail {
    path: PathBuf,
}

impl FileTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogTail for FileTail {
    fn tail(&self, resource: &str, max_lines: usize) -> Result<Vec<String>, LogTailError> {
        let bytes = fs::read(&self.path).map_err(|source| LogTailError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(last_matching(
            &String::from_utf8_lossy(&bytes),
            resource,
            max_lines,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KERN_LOG: &str = "\
[    1.0] drbd r0: Starting worker thread
[    1.1] eth0: link up
[    1.2] drbd r10: Starting worker thread
[    1.3] drbd r0/0 drbd100: disk( Attaching -> UpToDate )
[    1.4] drbd r0 alpha: conn( Connecting -> Connected )
[    1.5] drbd r1: Starting worker thread
[    1.6] drbd r0 alpha: pdsk( DUnknown -> UpToDate )
";

    #[test]
    fn test_resource_name_must_end_at_separator() {
        assert!(mentions_resource("drbd r0: x", "r0"));
        assert!(mentions_resource("drbd r0/0 drbd100: x", "r0"));
        assert!(mentions_resource("drbd r0 peer: x", "r0"));
        assert!(mentions_resource("... drbd r0", "r0"));
        assert!(!mentions_resource("drbd r01: x", "r0"));
        assert!(!mentions_resource("drbdr0: x", "r0"));
        // A later occurrence can still match.
        assert!(mentions_resource("drbd r00 then drbd r0: x", "r0"));
    }

    #[test]
    fn test_last_matching_keeps_order_and_budget() {
        let all = last_matching(KERN_LOG, "r0", 10);
        assert_eq!(all.len(), 4);
        assert!(all[0].ends_with("Starting worker thread"));
        assert!(all[3].contains("pdsk"));

        let last_two = last_matching(KERN_LOG, "r0", 2);
        assert_eq!(last_two.len(), 2);
        assert!(last_two[0].contains("conn("));
        assert!(last_two[1].contains("pdsk("));

        assert!(last_matching(KERN_LOG, "r0", 0).is_empty());
        assert!(last_matching(KERN_LOG, "r7", 10).is_empty());
    }

    #[test]
    fn test_file_tail_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kern.log");
        std::fs::write(&path, KERN_LOG).unwrap();

        let tail = FileTail::new(&path);
        let lines = tail.tail("r1", 5).unwrap();
        assert_eq!(lines, vec!["[    1.5] drbd r1: Starting worker thread"]);
        assert_eq!(tail.path(), path);
    }

    #[test]
    fn test_file_tail_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let tail = FileTail::new(dir.path().join("missing.log"));
        let err = tail.tail("r0", 5).unwrap_err();
        assert!(matches!(err, LogTailError::Read { .. }));
        assert!(err.to_string().starts_with("could not read "));
    }

    #[test]
    fn test_dmesg_missing_program_is_error() {
        let tail = DmesgTail::with_program("/nonexistent/dmesg-for-tests");
        let err = tail.tail("r0", 5).unwrap_err();
        assert!(matches!(err, LogTailError::Spawn { .. }));
        assert!(err.to_string().contains("dmesg-for-tests"));
    }
}
