//! Mock destination picker for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::export::DestinationPicker;

/// Scripted answers to save and directory dialogs.
///
/// A picker with no configured answer behaves like a cancelled dialog.
#[derive(Debug, Clone, Default)]
pub struct MockPicker {
    save_path: Option<PathBuf>,
    directory: Option<PathBuf>,
    /// Names proposed to the save dialog, in call order.
    suggested: Arc<RwLock<Vec<String>>>,
    /// Number of directory dialogs shown.
    directory_requests: Arc<RwLock<usize>>,
}

impl MockPicker {
    /// Create a picker that cancels every dialog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer save dialogs with `path`.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// Answer directory dialogs with `dir`.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Names proposed to the save dialog so far.
    pub async fn suggested_names(&self) -> Vec<String> {
        self.suggested.read().await.clone()
    }

    /// How many times a directory was asked for.
    pub async fn directory_requests(&self) -> usize {
        *self.directory_requests.read().await
    }
}

#[async_trait]
impl DestinationPicker for MockPicker {
    async fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        self.suggested
            .write()
            .await
            .push(suggested_name.to_string());
        self.save_path.clone()
    }

    async fn pick_directory(&self) -> Option<PathBuf> {
        *self.directory_requests.write().await += 1;
        self.directory.clone()
    }
}
