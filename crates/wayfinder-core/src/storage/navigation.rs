//! Write-only sinks for the last navigation record.
//!
//! Nothing reads these records back; the engine only guarantees that the
//! latest route change is handed to the sink before anything else runs.

use std::path::{Path, PathBuf};

use crate::behavior::NavigationEvent;
use crate::error::Result;

/// Receives every navigation event produced by the engine.
pub trait NavigationSink: Send {
    fn record(&mut self, event: &NavigationEvent) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NavigationSink for NullSink {
    fn record(&mut self, _event: &NavigationEvent) -> Result<()> {
        Ok(())
    }
}

/// Keeps the most recent record in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    last: Option<NavigationEvent>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&NavigationEvent> {
        self.last.as_ref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl NavigationSink for MemorySink {
    fn record(&mut self, event: &NavigationEvent) -> Result<()> {
        self.last = Some(event.clone());
        self.writes += 1;
        Ok(())
    }
}

/// Overwrites a single JSON file with the latest record.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub const FILE_NAME: &'static str = "last_navigation.json";

    /// Sink at `<data_dir>/last_navigation.json`.
    pub fn open() -> Result<Self> {
        Ok(Self::with_path(super::data_dir()?.join(Self::FILE_NAME)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NavigationSink for JsonFileSink {
    fn record(&mut self, event: &NavigationEvent) -> Result<()> {
        let content = serde_json::to_string(event)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn event(route: &str) -> NavigationEvent {
        NavigationEvent {
            session_id: Uuid::nil(),
            route: route.to_string(),
            previous: None,
            timestamp: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn memory_sink_keeps_only_latest() {
        let mut sink = MemorySink::new();
        sink.record(&event("/")).unwrap();
        sink.record(&event("/reports")).unwrap();
        assert_eq!(sink.writes(), 2);
        assert_eq!(sink.last().unwrap().route, "/reports");
    }

    #[test]
    fn json_sink_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::with_path(dir.path().join(JsonFileSink::FILE_NAME));
        sink.record(&event("/")).unwrap();
        sink.record(&event("/our-doctors")).unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let stored: NavigationEvent = serde_json::from_str(&content).unwrap();
        assert_eq!(stored.route, "/our-doctors");
    }

    #[test]
    fn json_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::with_path(dir.path().join("missing").join("nav.json"));
        assert!(sink.record(&event("/")).is_err());
    }
}
