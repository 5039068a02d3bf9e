//! Report delivery sinks.
//!
//! The engine hands a finished `Report` to one or more sinks; transport
//! and format belong to the sink, not the engine. Chat delivery (e.g. a
//! Telegram sender) is an external collaborator implementing the same
//! contract.

use std::path::PathBuf;

use tracing::info;

use vigil_core::Report;

use crate::render::render_text;

/// Receives a finished report for delivery or durable storage.
pub trait ReportSink {
    fn deliver(&self, report: &Report) -> anyhow::Result<()>;
}

/// Persists the report as a pretty-printed JSON artifact.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn deliver(&self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, json)?;
        info!(path = ?self.path, "report artifact written");
        Ok(())
    }
}

/// Prints the rendered summary to stdout.
///
/// Stands in for a chat notifier in CLI runs.
pub struct ConsoleNotifier;

impl ReportSink for ConsoleNotifier {
    fn deliver(&self, report: &Report) -> anyhow::Result<()> {
        print!("{}", render_text(report));
        Ok(())
    }
}
