//! The session state machine.
//!
//! `Session` owns the batch, the selected format, the progress value and the
//! last user-facing error. [`Session::handle`] applies one event and returns
//! the side effects the driver has to perform. It does no I/O and reads no
//! clock, so every transition can be tested in isolation.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::classifier::{self, TargetFormat};
use crate::orchestrator::{FileUpdate, RunOutcome};

use super::error::SessionError;
use super::types::{Batch, FileStatus, RunSummary, SessionSnapshot, SessionState, TrackedFile};

/// Where a set of input paths came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    /// An explicit file picker.
    Picker,
    /// A drag-and-drop delivery. Ignored while a run is in flight.
    DragDrop,
}

/// Something that happened to the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    FilesAdded {
        paths: Vec<PathBuf>,
        origin: InputOrigin,
    },
    FileRemoved {
        file_id: String,
    },
    FormatSelected(TargetFormat),
    ConvertRequested,
    ProgressTick(f32),
    FileUpdated(FileUpdate),
    /// Every file was attempted. `finish_delay` is the pacing pause to hold
    /// before the session moves to finished.
    RunCompleted {
        outcome: RunOutcome,
        finish_delay: Option<Duration>,
    },
    /// The run could not be carried out at all.
    RunFailed {
        reason: String,
    },
    /// The pacing pause is over.
    FinishRun,
    Reset,
    ExportFailed {
        reason: String,
    },
    ErrorDismissed,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Convert these files, in order, to this format.
    StartRun { batch: Batch, format: TargetFormat },
    /// Send `FinishRun` after the delay (or at once).
    ScheduleFinish { delay: Option<Duration> },
}

/// Single owned session state.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    batch: Batch,
    format: Option<TargetFormat>,
    progress: f32,
    error: Option<String>,
    summary: Option<RunSummary>,
    awaiting_finish: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            batch: Batch::new(),
            format: None,
            progress: 0.0,
            error: None,
            summary: None,
            awaiting_finish: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn format(&self) -> Option<TargetFormat> {
        self.format
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Formats offered for the current batch (empty when idle).
    pub fn allowed_formats(&self) -> &'static [TargetFormat] {
        match self.batch.first() {
            Some(first) => classifier::allowed_formats(first.category),
            None => &[],
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            files: self.batch.files().to_vec(),
            format: self.format,
            allowed_formats: self.allowed_formats().to_vec(),
            progress: self.progress,
            error: self.error.clone(),
            summary: self.summary.clone(),
        }
    }

    /// Applies one event.
    ///
    /// On error the session is left untouched.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionEffect>, SessionError> {
        match event {
            SessionEvent::FilesAdded { paths, origin } => self.add_files(paths, origin),
            SessionEvent::FileRemoved { file_id } => self.remove_file(&file_id),
            SessionEvent::FormatSelected(format) => self.select_format(format),
            SessionEvent::ConvertRequested => self.start_conversion(),
            SessionEvent::ProgressTick(value) => {
                self.tick(value);
                Ok(vec![])
            }
            SessionEvent::FileUpdated(update) => self.apply_file_update(update),
            SessionEvent::RunCompleted {
                outcome,
                finish_delay,
            } => self.complete_run(outcome, finish_delay),
            SessionEvent::RunFailed { reason } => self.fail_run(reason),
            SessionEvent::FinishRun => self.finish_run(),
            SessionEvent::Reset => self.reset(),
            SessionEvent::ExportFailed { reason } => self.record_export_failure(reason),
            SessionEvent::ErrorDismissed => {
                self.error = None;
                Ok(vec![])
            }
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            action,
        }
    }

    fn add_files(
        &mut self,
        paths: Vec<PathBuf>,
        origin: InputOrigin,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state == SessionState::Processing {
            if origin == InputOrigin::DragDrop {
                debug!("Ignoring {} dropped file(s) while processing", paths.len());
                return Ok(vec![]);
            }
            return Err(self.invalid("add files"));
        }

        if paths.is_empty() {
            debug!("No files selected, nothing to add");
            return Ok(vec![]);
        }

        // A finished batch is never merged into; new files start over.
        if self.state == SessionState::Finished {
            info!("Starting a new session from finished batch");
            self.clear();
        }

        let first_files = self.batch.is_empty();
        for path in paths {
            self.batch.push(TrackedFile::new(path));
        }

        if first_files {
            if let Some(first) = self.batch.first() {
                let format = classifier::default_format(first.category);
                debug!(
                    "Auto-selected {} for first file category {}",
                    format, first.category
                );
                self.format = Some(format);
            }
        }

        self.state = SessionState::Selecting;
        info!("{} file(s) selected", self.batch.len());
        Ok(vec![])
    }

    fn remove_file(&mut self, file_id: &str) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Selecting {
            return Err(self.invalid("remove files"));
        }
        if self.batch.remove(file_id).is_none() {
            return Err(SessionError::FileNotFound(file_id.to_string()));
        }
        if self.batch.is_empty() {
            self.clear();
            return Ok(vec![]);
        }

        // The first file decides the offered formats
        if let Some(first) = self.batch.first() {
            let allowed = classifier::allowed_formats(first.category);
            if !self.format.is_some_and(|f| allowed.contains(&f)) {
                let format = classifier::default_format(first.category);
                debug!(
                    "Format reset to {} for new first file category {}",
                    format, first.category
                );
                self.format = Some(format);
            }
        }
        Ok(vec![])
    }

    fn select_format(&mut self, format: TargetFormat) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Selecting {
            return Err(self.invalid("select a format"));
        }
        if let Some(first) = self.batch.first() {
            if !classifier::allowed_formats(first.category).contains(&format) {
                return Err(SessionError::FormatNotAllowed {
                    format,
                    category: first.category,
                });
            }
        }
        self.format = Some(format);
        Ok(vec![])
    }

    fn start_conversion(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Selecting {
            return Err(self.invalid("convert"));
        }
        if self.batch.is_empty() {
            return Err(SessionError::EmptyBatch);
        }
        let format = match self.format {
            Some(format) => format,
            None => {
                let format = classifier::default_format(self.batch.files()[0].category);
                self.format = Some(format);
                format
            }
        };

        self.state = SessionState::Processing;
        self.error = None;
        self.progress = 0.0;
        self.summary = None;
        self.awaiting_finish = false;

        info!("Converting {} file(s) to {}", self.batch.len(), format);
        Ok(vec![SessionEffect::StartRun {
            batch: self.batch.clone(),
            format,
        }])
    }

    fn tick(&mut self, value: f32) {
        if self.state != SessionState::Processing || self.awaiting_finish {
            return;
        }
        self.progress = self.progress.max(value.clamp(0.0, 100.0));
    }

    fn apply_file_update(&mut self, update: FileUpdate) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Processing || self.awaiting_finish {
            return Err(self.invalid("update a file"));
        }

        // Validate on a copy so a rejected update leaves the session untouched.
        let file = self
            .batch
            .get(update.file_id())
            .ok_or_else(|| SessionError::FileNotFound(update.file_id().to_string()))?;
        let mut updated = file.clone();

        match update {
            FileUpdate::Started { .. } => updated.mark_converting()?,
            FileUpdate::Converted { result_path, .. } => updated.mark_done(result_path)?,
            FileUpdate::Failed { reason, .. } => updated.mark_failed(reason)?,
        }

        if let Some(slot) = self.batch.get_mut(&updated.id) {
            *slot = updated;
        }
        Ok(vec![])
    }

    fn complete_run(
        &mut self,
        outcome: RunOutcome,
        finish_delay: Option<Duration>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Processing || self.awaiting_finish {
            return Err(self.invalid("complete a run"));
        }

        let summary = outcome.summary();
        info!(
            "Run complete: {} done, {} failed in {} ms",
            summary.done, summary.failed, summary.elapsed_ms
        );

        self.batch = outcome.batch;
        self.progress = 100.0;
        self.summary = Some(summary);
        self.awaiting_finish = true;

        Ok(vec![SessionEffect::ScheduleFinish {
            delay: finish_delay,
        }])
    }

    fn fail_run(&mut self, reason: String) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Processing {
            return Err(self.invalid("fail a run"));
        }

        for file in self.batch.iter_mut() {
            file.reset_to_pending();
        }

        self.state = SessionState::Selecting;
        self.progress = 0.0;
        self.awaiting_finish = false;
        self.error = Some(reason);
        Ok(vec![])
    }

    fn finish_run(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Processing || !self.awaiting_finish {
            return Err(self.invalid("finish"));
        }
        self.state = SessionState::Finished;
        self.awaiting_finish = false;
        info!("Session finished");
        Ok(vec![])
    }

    fn reset(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state == SessionState::Processing {
            return Err(SessionError::NotResettable);
        }
        self.clear();
        Ok(vec![])
    }

    fn record_export_failure(&mut self, reason: String) -> Result<Vec<SessionEffect>, SessionError> {
        if self.state != SessionState::Finished {
            return Err(self.invalid("export"));
        }
        self.error = Some(reason);
        Ok(vec![])
    }

    fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.batch = Batch::new();
        self.format = None;
        self.progress = 0.0;
        self.error = None;
        self.summary = None;
        self.awaiting_finish = false;
    }

    /// Files ready to be exported.
    pub fn exportable(&self) -> impl Iterator<Item = &TrackedFile> {
        self.batch
            .iter()
            .filter(|f| matches!(f.status(), FileStatus::Done { .. }))
    }
}
