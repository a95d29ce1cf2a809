//! File system copier implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use super::config::ExportConfig;
use super::error::ExportError;
use super::traits::FileCopier;

/// Buffered tokio copy with optional SHA-256 verification.
pub struct FsCopier {
    config: ExportConfig,
}

impl FsCopier {
    /// Creates a new copier with the given configuration.
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Creates a copier with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    fn buffer_size(&self) -> usize {
        self.config.buffer_size.max(1)
    }

    /// Streams `source` into `destination`, hashing on the way when asked.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), ExportError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExportError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                ExportError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            ExportError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.buffer_size(), source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size(), dest_file);
        let mut hasher = calculate_checksum.then(Sha256::new);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.buffer_size()];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                ExportError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;
            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                ExportError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;
            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            ExportError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        Ok((total_bytes, hasher.map(|h| format!("{:x}", h.finalize()))))
    }

    /// SHA-256 of a file on disk.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, ExportError> {
        let map_err = |e: std::io::Error| ExportError::ChecksumCalculationFailed {
            path: path.to_path_buf(),
            source: e,
        };

        let file = File::open(path).await.map_err(map_err)?;
        let mut reader = BufReader::with_capacity(self.buffer_size(), file);
        let mut buffer = vec![0u8; self.buffer_size()];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(map_err)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[async_trait]
impl FileCopier for FsCopier {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn copy(&self, source: &Path, destination: &Path) -> Result<u64, ExportError> {
        if !self.config.overwrite && fs::try_exists(destination).await.unwrap_or(false) {
            return Err(ExportError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ExportError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }

        let (bytes, expected) = self
            .copy_file(source, destination, self.config.verify_checksums)
            .await?;

        if let Some(expected) = expected {
            let actual = self.calculate_checksum(destination).await?;
            if actual != expected {
                return Err(ExportError::ChecksumMismatch {
                    path: destination.to_path_buf(),
                    expected,
                    actual,
                });
            }
            debug!("Verified {} ({})", destination.display(), actual);
        }

        debug!(
            "Copied {} -> {} ({} bytes)",
            source.display(),
            destination.display(),
            bytes
        );
        Ok(bytes)
    }
}
