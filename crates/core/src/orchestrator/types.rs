//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::converter::ConverterError;
use crate::session::{Batch, RunSummary};

/// Errors that stop a run before any file is attempted.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The converter is not usable (e.g. ffmpeg missing).
    #[error("converter unavailable: {0}")]
    ConverterUnavailable(#[source] ConverterError),

    /// Nothing to convert.
    #[error("batch is empty")]
    EmptyBatch,

    /// A file in the batch was already attempted.
    #[error("file {0} is not pending")]
    FileNotPending(String),
}

/// Per-file status change streamed while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileUpdate {
    /// The engine was invoked for this file.
    Started { file_id: String },
    /// The file was converted.
    Converted {
        file_id: String,
        result_path: PathBuf,
    },
    /// The engine failed for this file.
    Failed { file_id: String, reason: String },
}

impl FileUpdate {
    pub fn file_id(&self) -> &str {
        match self {
            Self::Started { file_id }
            | Self::Converted { file_id, .. }
            | Self::Failed { file_id, .. } => file_id,
        }
    }
}

/// What a completed run hands back.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The batch with every file attempted.
    pub batch: Batch,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    /// Builds the finished summary for this run.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.batch.len(),
            done: self.batch.done_count(),
            failed: self.batch.failed_count(),
            elapsed_ms: self.elapsed.as_millis() as u64,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_update_serialization() {
        let update = FileUpdate::Failed {
            file_id: "f-1".to_string(),
            reason: "codec".to_string(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "failed");
        assert_eq!(json["file_id"], "f-1");
        assert_eq!(update.file_id(), "f-1");
    }

    #[test]
    fn test_outcome_summary() {
        let mut batch = Batch::from_paths(["/a.mp4", "/b.mp4"]);
        let ids: Vec<String> = batch.iter().map(|f| f.id.clone()).collect();
        batch.get_mut(&ids[0]).unwrap().mark_failed("x").unwrap();
        batch
            .get_mut(&ids[1])
            .unwrap()
            .mark_done(PathBuf::from("/tmp/b.mkv"))
            .unwrap();

        let now = Utc::now();
        let outcome = RunOutcome {
            batch,
            elapsed: Duration::from_millis(1500),
            started_at: now,
            finished_at: now,
        };

        let summary = outcome.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.elapsed_ms, 1500);
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::FileNotPending("f-9".to_string());
        assert_eq!(err.to_string(), "file f-9 is not pending");
    }
}
