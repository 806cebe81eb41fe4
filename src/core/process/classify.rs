//! Splitting of raw process output into log fragments and severity classification.

use crate::core::events::EventSeverity;
use regex::Regex;
use std::sync::OnceLock;

/// Boundary between structured log records glued on one line.
pub const RECORD_DELIMITER: &str = "time=\"";

/// Substrings marking stderr lines that are progress chatter rather than failures.
pub const INFORMATIONAL_MARKERS: &[&str] = &[
    "Container",
    "Creating",
    "Created",
    "Starting",
    "Started",
    "Stopping",
    "Stopped",
    "Removing",
    "Removed",
    "Running",
    "Waiting",
    "Healthy",
    "Network",
    "Volume",
    "Pulling",
    "Pulled",
    "Building",
    "Built",
    "Cloning into",
    "Installing",
    "Downloading",
    "Generating",
    "Updating",
    "Writing lock file",
    "Package operations",
    "Nothing to install",
    "[OK]",
    "[+]",
    "#",
];

/// Stream a fragment was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

fn level_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\blevel="?(error|fatal|warning|warn|debug|info)\b"#)
            .expect("level pattern is valid")
    })
}

/// Severity of one output fragment.
///
/// An explicit `level=` token wins. Otherwise stderr is an error unless it matches
/// an informational marker, and stdout is informational.
pub fn classify(fragment: &str, stream: OutputStream) -> EventSeverity {
    if let Some(captures) = level_pattern().captures(fragment) {
        return match &captures[1] {
            "error" | "fatal" => EventSeverity::Error,
            "warning" | "warn" => EventSeverity::Warning,
            "debug" => EventSeverity::Debug,
            _ => EventSeverity::Info,
        };
    }

    match stream {
        OutputStream::Stdout => EventSeverity::Info,
        OutputStream::Stderr => {
            if INFORMATIONAL_MARKERS
                .iter()
                .any(|marker| fragment.contains(marker))
            {
                EventSeverity::Info
            } else {
                EventSeverity::Error
            }
        }
    }
}

/// Split one complete line into its structured log records.
pub fn split_records(line: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut start = 0;
    for (index, _) in line.match_indices(RECORD_DELIMITER) {
        if index > start {
            records.push(&line[start..index]);
            start = index;
        }
    }
    records.push(&line[start..]);

    records
        .into_iter()
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a whole buffer on line terminators and record boundaries.
pub fn split_fragments(buffer: &str) -> Vec<String> {
    buffer
        .split(['\n', '\r'])
        .flat_map(split_records)
        .collect()
}

/// Accumulates raw chunks and yields complete lines, keeping partial ones for later.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the fragments of every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let Some(last_break) = self
            .pending
            .iter()
            .rposition(|byte| *byte == b'\n' || *byte == b'\r')
        else {
            return Vec::new();
        };

        let remainder = self.pending.split_off(last_break + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);
        split_fragments(&String::from_utf8_lossy(&complete))
    }

    /// Fragments of the trailing line without terminator.
    pub fn finish(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.pending);
        split_fragments(&String::from_utf8_lossy(&rest))
    }
}
