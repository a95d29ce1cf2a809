//! Mock copier for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::export::{ExportError, FileCopier};

/// A recorded copy for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Whether the copy succeeded.
    pub success: bool,
}

/// Mock implementation of the FileCopier trait.
///
/// Records every copy and never touches the filesystem. Specific
/// destinations can be made to fail.
#[derive(Debug)]
pub struct MockCopier {
    copies: Arc<RwLock<Vec<RecordedCopy>>>,
    failing_destinations: Arc<RwLock<HashSet<PathBuf>>>,
    /// Bytes reported for each successful copy.
    copy_size: Arc<RwLock<u64>>,
}

impl Default for MockCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCopier {
    /// Create a new mock copier.
    pub fn new() -> Self {
        Self {
            copies: Arc::new(RwLock::new(Vec::new())),
            failing_destinations: Arc::new(RwLock::new(HashSet::new())),
            copy_size: Arc::new(RwLock::new(1024)),
        }
    }

    /// Get all recorded copies.
    pub async fn recorded_copies(&self) -> Vec<RecordedCopy> {
        self.copies.read().await.clone()
    }

    /// Get the number of copies attempted.
    pub async fn copy_count(&self) -> usize {
        self.copies.read().await.len()
    }

    /// Make copies to `destination` fail.
    pub async fn fail_destination(&self, destination: impl AsRef<Path>) {
        self.failing_destinations
            .write()
            .await
            .insert(destination.as_ref().to_path_buf());
    }

    /// Set the byte count reported per copy.
    pub async fn set_copy_size(&self, bytes: u64) {
        *self.copy_size.write().await = bytes;
    }
}

#[async_trait]
impl FileCopier for MockCopier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn copy(&self, source: &Path, destination: &Path) -> Result<u64, ExportError> {
        let fails = self.failing_destinations.read().await.contains(destination);
        self.copies.write().await.push(RecordedCopy {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            success: !fails,
        });

        if fails {
            return Err(ExportError::copy_failed(
                source.to_path_buf(),
                destination.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }
        Ok(*self.copy_size.read().await)
    }
}
