//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConversionOutput, ConversionRequest, Converter, ConverterError};

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion requests for assertions
/// - Fail specific input paths
/// - Fail the next call (validate or convert)
/// - Optionally write real artifacts so exports can copy them
///
/// # Example
///
/// ```rust,ignore
/// use mediabatch_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_path("/in/broken.mp4", "corrupt header").await;
///
/// // Run a batch...
///
/// let requests = converter.recorded_requests().await;
/// assert_eq!(requests.len(), 3);
/// ```
#[derive(Debug)]
pub struct MockConverter {
    /// Recorded conversion requests, in call order.
    requests: Arc<RwLock<Vec<ConversionRequest>>>,
    /// Input paths that always fail, with their failure reason.
    failing_paths: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Simulated conversion duration in milliseconds.
    conversion_duration_ms: Arc<RwLock<u64>>,
    /// When set, artifacts are written under this directory.
    output_dir: Arc<RwLock<Option<PathBuf>>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            failing_paths: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            conversion_duration_ms: Arc::new(RwLock::new(10)),
            output_dir: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded conversion requests.
    pub async fn recorded_requests(&self) -> Vec<ConversionRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }

    /// Make every conversion of `path` fail with `reason`.
    pub async fn fail_path(&self, path: impl AsRef<Path>, reason: impl Into<String>) {
        self.failing_paths
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), reason.into());
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Write artifacts to disk under `dir` instead of only reporting a path.
    pub async fn set_output_dir(&self, dir: impl Into<PathBuf>) {
        *self.output_dir.write().await = Some(dir.into());
    }

    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }

    fn artifact_name(request: &ConversionRequest) -> String {
        let stem = request
            .input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        format!("{}.{}", stem, request.format.extension())
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutput, ConverterError> {
        self.requests.write().await.push(request.clone());

        let duration_ms = *self.conversion_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        if let Some(reason) = self.failing_paths.read().await.get(&request.input_path) {
            return Err(ConverterError::conversion_failed(reason.clone(), None));
        }

        let name = Self::artifact_name(request);
        let output_dir = self.output_dir.read().await.clone();
        let (output_path, output_size_bytes) = match output_dir {
            Some(dir) => {
                let job_dir = dir.join(&request.job_id);
                tokio::fs::create_dir_all(&job_dir).await?;
                let path = job_dir.join(&name);
                let contents = format!("converted {}", request.input_path.display());
                tokio::fs::write(&path, contents.as_bytes()).await?;
                (path, contents.len() as u64)
            }
            None => (
                PathBuf::from("/tmp/mediabatch-mock")
                    .join(&request.job_id)
                    .join(&name),
                1024,
            ),
        };

        Ok(ConversionOutput {
            job_id: request.job_id.clone(),
            output_path,
            output_size_bytes,
            duration_ms,
            format: request.format,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TargetFormat;

    fn request(id: &str, path: &str) -> ConversionRequest {
        ConversionRequest::new(id, path, TargetFormat::Ogg)
    }

    #[tokio::test]
    async fn test_basic_conversion() {
        let converter = MockConverter::new();
        converter.set_conversion_duration(Duration::ZERO).await;

        let output = converter.convert(&request("job-1", "/in/song.flac")).await.unwrap();

        assert_eq!(output.job_id, "job-1");
        assert_eq!(
            output.output_path,
            PathBuf::from("/tmp/mediabatch-mock/job-1/song.ogg")
        );
        assert_eq!(output.format, TargetFormat::Ogg);
    }

    #[tokio::test]
    async fn test_failing_path() {
        let converter = MockConverter::new();
        converter.set_conversion_duration(Duration::ZERO).await;
        converter.fail_path("/in/bad.flac", "corrupt").await;

        let err = converter.convert(&request("job-1", "/in/bad.flac")).await.unwrap_err();
        assert!(err.to_string().contains("corrupt"));

        // Other paths still work, and both attempts are recorded
        converter.convert(&request("job-2", "/in/good.flac")).await.unwrap();
        assert_eq!(converter.conversion_count().await, 2);
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let converter = MockConverter::new();
        converter
            .set_next_error(ConverterError::FfmpegNotFound {
                path: "ffmpeg".into(),
            })
            .await;

        assert!(converter.validate().await.is_err());
        assert!(converter.validate().await.is_ok());
    }

    #[tokio::test]
    async fn test_writes_artifacts_when_output_dir_set() {
        let temp = tempfile::tempdir().unwrap();
        let converter = MockConverter::new();
        converter.set_conversion_duration(Duration::ZERO).await;
        converter.set_output_dir(temp.path()).await;

        let output = converter.convert(&request("job-1", "/in/song.flac")).await.unwrap();

        assert!(output.output_path.starts_with(temp.path()));
        let written = std::fs::read_to_string(&output.output_path).unwrap();
        assert_eq!(written, "converted /in/song.flac");
        assert_eq!(output.output_size_bytes, written.len() as u64);
    }
}
