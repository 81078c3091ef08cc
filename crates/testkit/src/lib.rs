#![warn(missing_docs)]
//! Recording surfaces for headless runs (JSONL event stream + in-memory log).

use anyhow::{Context, Result};
use meshpick_interact::{InteractionEvent, InteractionEventKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// One interaction event tagged with the frame it happened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Frame index when the event fired.
    pub frame: u64,
    /// Event type.
    pub kind: InteractionEventKind,
    /// Display label of the target node.
    pub target: String,
    /// Selection carried by `select` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

impl InteractionRecord {
    /// Record `event`, labelling its target through `Display`.
    pub fn new<N: fmt::Display>(frame: u64, event: &InteractionEvent<N>) -> Self {
        Self::labelled(frame, event, event.target.to_string())
    }

    /// Record `event` under an explicit target label.
    pub fn labelled<N>(frame: u64, event: &InteractionEvent<N>, target: impl Into<String>) -> Self {
        Self {
            frame,
            kind: event.kind,
            target: target.into(),
            is_selected: event.is_selected,
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        debug!(path = %path.display(), "event log opened");
        Ok(Self { file, written: 0 })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &InteractionRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Append several records.
    pub fn write_all<'a>(&mut self, records: impl IntoIterator<Item = &'a InteractionRecord>) -> Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Flush buffered data to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Read a JSONL event log back.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<InteractionRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Malformed record on line {}", index + 1))
        })
        .collect()
}

/// In-memory event log for assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    records: Vec<InteractionRecord>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every event of one frame.
    pub fn record<N: fmt::Display>(&mut self, frame: u64, events: &[InteractionEvent<N>]) {
        self.records
            .extend(events.iter().map(|event| InteractionRecord::new(frame, event)));
    }

    /// Append a prepared record.
    pub fn push(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    /// All records in arrival order.
    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    /// Records concerning `target`.
    pub fn for_target<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a InteractionRecord> + 'a {
        self.records.iter().filter(move |record| record.target == target)
    }

    /// Event kinds seen by `target`, in order.
    pub fn kinds_for(&self, target: &str) -> Vec<InteractionEventKind> {
        self.for_target(target).map(|record| record.kind).collect()
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: InteractionEventKind) -> usize {
        self.records.iter().filter(|record| record.kind == kind).count()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
