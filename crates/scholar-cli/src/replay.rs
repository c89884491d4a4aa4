//! Event-log replay and output.
//!
//! The event log is a JSON array of `{ "context_id", "paper_id" }`
//! records. Unlock events are written to the output as JSON lines, one per
//! event, in emission order. Snapshots are written one file per context,
//! named after the context id.

use std::io::Write;
use std::path::Path;

use scholar_engine::Campaign;
use scholar_types::{PaperCompleted, UnlockEvent};
use tracing::info;

use crate::error::CliError;

/// Read a completion-event log.
pub fn read_events(path: &Path) -> Result<Vec<PaperCompleted>, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|source| CliError::Events {
        path: path.display().to_string(),
        source,
    })
}

/// Write unlock events as JSON lines.
pub fn write_unlocks<W: Write>(events: &[UnlockEvent], mut out: W) -> Result<(), CliError> {
    let stream_error = |source| CliError::Io {
        target: String::from("output"),
        source,
    };
    for event in events {
        let line = serde_json::to_string(event).map_err(|source| CliError::Engine {
            source: source.into(),
        })?;
        writeln!(out, "{line}").map_err(stream_error)?;
    }
    out.flush().map_err(stream_error)
}

/// Write one `<context_id>.json` snapshot per context into `dir`.
pub fn write_snapshots(campaign: &Campaign, dir: &Path) -> Result<usize, CliError> {
    std::fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
    let mut written: usize = 0;
    for snapshot in campaign.snapshots() {
        let path = dir.join(format!("{}.json", snapshot.context_id));
        let json = snapshot.to_json()?;
        std::fs::write(&path, json).map_err(|e| CliError::io(&path, e))?;
        written = written.saturating_add(1);
    }
    info!(dir = %dir.display(), snapshots = written, "Snapshots written");
    Ok(written)
}
