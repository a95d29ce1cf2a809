//! Core session data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::classifier::{self, MediaCategory, TargetFormat};

use super::error::SessionError;

/// Coarse application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing selected; the batch is empty.
    Idle,
    /// Files selected, format can still change.
    Selecting,
    /// A run is in flight.
    Processing,
    /// Every file has been attempted; the batch is read-only.
    Finished,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Processing => "processing",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion status of one tracked file.
///
/// The converted artifact lives in the `Done` variant, so a result path exists
/// exactly when the file is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Converting,
    Done { result_path: PathBuf },
    Error { reason: String },
}

impl FileStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converting => "converting",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }

    /// Whether the file has been attempted (done or error).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

/// A file tracked through the conversion lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    /// Unique ID, also used as the conversion job ID.
    pub id: String,
    /// Absolute path of the original file.
    pub source_path: PathBuf,
    /// File name for presentation.
    pub display_name: String,
    /// Category assigned at creation.
    pub category: MediaCategory,
    /// Current status.
    #[serde(flatten)]
    status: FileStatus,
}

impl TrackedFile {
    /// Creates a pending file, classifying it by its name.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let display_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source_path.to_string_lossy().to_string());
        let category = classifier::classify(&display_name);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            display_name,
            category,
            status: FileStatus::Pending,
        }
    }

    pub fn status(&self) -> &FileStatus {
        &self.status
    }

    /// Location of the converted artifact, set only when done.
    pub fn result_path(&self) -> Option<&Path> {
        match &self.status {
            FileStatus::Done { result_path } => Some(result_path),
            _ => None,
        }
    }

    /// Source file name without its extension.
    pub fn stem(&self) -> String {
        self.source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.display_name.clone())
    }

    /// Marks the file as being converted. Only valid from `Pending`.
    pub fn mark_converting(&mut self) -> Result<(), SessionError> {
        match self.status {
            FileStatus::Pending => {
                self.status = FileStatus::Converting;
                Ok(())
            }
            _ => Err(self.invalid_move("converting")),
        }
    }

    /// Records a successful conversion.
    pub fn mark_done(&mut self, result_path: PathBuf) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            return Err(self.invalid_move("done"));
        }
        self.status = FileStatus::Done { result_path };
        Ok(())
    }

    /// Records a failed conversion.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            return Err(self.invalid_move("error"));
        }
        self.status = FileStatus::Error {
            reason: reason.into(),
        };
        Ok(())
    }

    /// Hands the file back untouched after a run that never started.
    pub(super) fn reset_to_pending(&mut self) {
        self.status = FileStatus::Pending;
    }

    fn invalid_move(&self, to: &'static str) -> SessionError {
        SessionError::InvalidFileTransition {
            file_id: self.id.clone(),
            from: self.status.name(),
            to,
        }
    }
}

/// Ordered set of files converted together. Order is processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    files: Vec<TrackedFile>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: paths.into_iter().map(TrackedFile::new).collect(),
        }
    }

    pub fn push(&mut self, file: TrackedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedFile> {
        self.files.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TrackedFile> {
        self.files.iter_mut()
    }

    pub fn first(&self) -> Option<&TrackedFile> {
        self.files.first()
    }

    pub fn get(&self, file_id: &str) -> Option<&TrackedFile> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn get_mut(&mut self, file_id: &str) -> Option<&mut TrackedFile> {
        self.files.iter_mut().find(|f| f.id == file_id)
    }

    pub fn remove(&mut self, file_id: &str) -> Option<TrackedFile> {
        let idx = self.files.iter().position(|f| f.id == file_id)?;
        Some(self.files.remove(idx))
    }

    /// Number of files with a converted artifact.
    pub fn done_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status(), FileStatus::Done { .. }))
            .count()
    }

    /// Number of files whose conversion failed.
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status(), FileStatus::Error { .. }))
            .count()
    }

    /// Whether every file has been attempted.
    pub fn all_attempted(&self) -> bool {
        self.files.iter().all(|f| f.status().is_terminal())
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a TrackedFile;
    type IntoIter = std::slice::Iter<'a, TrackedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Post-run view of how the batch went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    /// Files ready to save.
    pub done: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Serializable view of the whole session, published to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub files: Vec<TrackedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TargetFormat>,
    pub allowed_formats: Vec<TargetFormat>,
    pub progress: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_file_new() {
        let file = TrackedFile::new("/media/Trip.MOV");
        assert_eq!(file.display_name, "Trip.MOV");
        assert_eq!(file.category, MediaCategory::Video);
        assert_eq!(file.status(), &FileStatus::Pending);
        assert_eq!(file.stem(), "Trip");
        assert!(file.result_path().is_none());
        assert!(!file.id.is_empty());
    }

    #[test]
    fn test_file_status_forward_moves() {
        let mut file = TrackedFile::new("/a/song.wav");
        file.mark_converting().unwrap();
        file.mark_done(PathBuf::from("/tmp/song.mp3")).unwrap();
        assert_eq!(file.result_path(), Some(Path::new("/tmp/song.mp3")));
    }

    #[test]
    fn test_file_status_never_moves_backward() {
        let mut file = TrackedFile::new("/a/song.wav");
        file.mark_converting().unwrap();
        file.mark_failed("codec").unwrap();

        assert!(file.mark_converting().is_err());
        assert!(file.mark_done(PathBuf::from("/tmp/x")).is_err());
        assert!(file.mark_failed("again").is_err());
        assert!(file.result_path().is_none());
    }

    #[test]
    fn test_pending_can_fail_directly() {
        let mut file = TrackedFile::new("/a/photo.png");
        file.mark_failed("engine missing").unwrap();
        assert_eq!(file.status().name(), "error");
    }

    #[test]
    fn test_tracked_file_serialization_flattens_status() {
        let mut file = TrackedFile::new("/a/photo.png");
        file.mark_done(PathBuf::from("/tmp/photo.webp")).unwrap();

        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["result_path"], "/tmp/photo.webp");
        assert_eq!(json["category"], "image");
    }

    #[test]
    fn test_batch_counts() {
        let mut batch = Batch::from_paths(["/a.mp4", "/b.mp4", "/c.mp4"]);
        assert!(!batch.all_attempted());

        let ids: Vec<String> = batch.iter().map(|f| f.id.clone()).collect();
        batch.get_mut(&ids[0]).unwrap().mark_failed("boom").unwrap();
        batch
            .get_mut(&ids[1])
            .unwrap()
            .mark_done(PathBuf::from("/tmp/b.mkv"))
            .unwrap();
        batch
            .get_mut(&ids[2])
            .unwrap()
            .mark_done(PathBuf::from("/tmp/c.mkv"))
            .unwrap();

        assert!(batch.all_attempted());
        assert_eq!(batch.done_count(), 2);
        assert_eq!(batch.failed_count(), 1);
    }

    #[test]
    fn test_batch_remove_keeps_order() {
        let mut batch = Batch::from_paths(["/a.mp3", "/b.mp3", "/c.mp3"]);
        let middle = batch.files()[1].id.clone();
        let removed = batch.remove(&middle).unwrap();
        assert_eq!(removed.display_name, "b.mp3");
        let names: Vec<&str> = batch.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.mp3", "c.mp3"]);
        assert!(batch.remove("nope").is_none());
    }
}
