//! Batch conversion runner.
//!
//! Converts every file of a batch, strictly one at a time and in batch order:
//! - A failing file is recorded and the run moves on to the next one
//! - Progress is synthetic (see [`ProgressTicker`]) and snaps to 100 at the end
//! - Per-file status changes are streamed to an optional channel

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::classifier::TargetFormat;
use crate::converter::{ConversionRequest, Converter};
use crate::session::Batch;

use super::config::OrchestratorConfig;
use super::progress::ProgressTicker;
use super::types::{FileUpdate, OrchestratorError, RunOutcome};

/// Drives one batch at a time through a [`Converter`].
pub struct BatchOrchestrator<C>
where
    C: Converter + 'static,
{
    config: OrchestratorConfig,
    converter: Arc<C>,
    progress: Arc<watch::Sender<f32>>,
}

impl<C> BatchOrchestrator<C>
where
    C: Converter + 'static,
{
    /// Create a new orchestrator.
    pub fn new(config: OrchestratorConfig, converter: Arc<C>) -> Self {
        let (progress, _) = watch::channel(0.0);
        Self {
            config,
            converter,
            progress: Arc::new(progress),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn converter(&self) -> &Arc<C> {
        &self.converter
    }

    /// Subscribe to the progress percentage of the current run.
    pub fn subscribe_progress(&self) -> watch::Receiver<f32> {
        self.progress.subscribe()
    }

    /// Converts every file in `batch` to `format`.
    ///
    /// Per-file failures never abort the run; they end up as error statuses
    /// in the returned batch. An `Err` means no file was attempted.
    pub async fn run(
        &self,
        mut batch: Batch,
        format: TargetFormat,
        updates: Option<mpsc::Sender<FileUpdate>>,
    ) -> Result<RunOutcome, OrchestratorError> {
        if batch.is_empty() {
            return Err(OrchestratorError::EmptyBatch);
        }
        if let Some(file) = batch.iter().find(|f| f.status().is_terminal()) {
            return Err(OrchestratorError::FileNotPending(file.id.clone()));
        }

        self.converter.validate().await.map_err(|e| {
            error!("Converter {} is not usable: {}", self.converter.name(), e);
            OrchestratorError::ConverterUnavailable(e)
        })?;

        info!(
            "Starting run of {} file(s) to {} with {}",
            batch.len(),
            format,
            self.converter.name()
        );

        let started_at = Utc::now();
        let clock = Instant::now();
        self.progress.send_replace(0.0);
        let ticker = ProgressTicker::start(&self.config, Arc::clone(&self.progress));

        for file in batch.iter_mut() {
            if let Err(e) = file.mark_converting() {
                warn!("Skipping file {}: {}", file.id, e);
                continue;
            }
            notify(
                &updates,
                FileUpdate::Started {
                    file_id: file.id.clone(),
                },
            )
            .await;

            let request = ConversionRequest::new(file.id.clone(), file.source_path.clone(), format);
            let update = match self.converter.convert(&request).await {
                Ok(output) => {
                    debug!(
                        "Converted {} -> {} ({} bytes, {} ms)",
                        file.display_name,
                        output.output_path.display(),
                        output.output_size_bytes,
                        output.duration_ms
                    );
                    FileUpdate::Converted {
                        file_id: file.id.clone(),
                        result_path: output.output_path,
                    }
                }
                Err(e) => {
                    warn!("Conversion of {} failed: {}", file.display_name, e);
                    FileUpdate::Failed {
                        file_id: file.id.clone(),
                        reason: e.to_string(),
                    }
                }
            };

            let applied = match &update {
                FileUpdate::Converted { result_path, .. } => file.mark_done(result_path.clone()),
                FileUpdate::Failed { reason, .. } => file.mark_failed(reason.clone()),
                FileUpdate::Started { .. } => Ok(()),
            };
            if let Err(e) = applied {
                warn!("Could not record result for {}: {}", file.id, e);
            }
            notify(&updates, update).await;
        }

        ticker.stop().await;
        self.progress.send_replace(100.0);

        let outcome = RunOutcome {
            batch,
            elapsed: clock.elapsed(),
            started_at,
            finished_at: Utc::now(),
        };
        let summary = outcome.summary();
        info!(
            "Run finished: {}/{} converted, {} failed ({} ms)",
            summary.done, summary.total, summary.failed, summary.elapsed_ms
        );

        Ok(outcome)
    }
}

async fn notify(updates: &Option<mpsc::Sender<FileUpdate>>, update: FileUpdate) {
    if let Some(tx) = updates {
        if tx.send(update).await.is_err() {
            debug!("File update receiver dropped");
        }
    }
}
