//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionOutput, ConversionRequest};
use crate::classifier::TargetFormat;

/// Largest edge ffmpeg may produce for ICO output.
const ICO_MAX_EDGE: u32 = 256;

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Returns the configuration this converter runs with.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Computes where the artifact for a request is written.
    ///
    /// Each job gets its own directory so two sources sharing a stem never
    /// overwrite each other's artifacts.
    fn output_path_for(&self, request: &ConversionRequest) -> Result<PathBuf, ConverterError> {
        let stem = request
            .input_path
            .file_stem()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConverterError::InvalidInput {
                path: request.input_path.clone(),
            })?;

        let file_name = format!("{}.{}", stem.to_string_lossy(), request.format.extension());
        Ok(self.config.temp_dir.join(&request.job_id).join(file_name))
    }

    /// Builds ffmpeg arguments for a conversion.
    fn build_args(&self, input_path: &Path, output_path: &Path, format: TargetFormat) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        // ICO cannot hold images larger than 256x256
        if format == TargetFormat::Ico {
            args.extend([
                "-vf".to_string(),
                format!(
                    "scale='min({},iw)':'min({},ih)':force_original_aspect_ratio=decrease",
                    ICO_MAX_EDGE, ICO_MAX_EDGE
                ),
            ]);
        }

        // Log level
        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(output_path.to_string_lossy().to_string());

        args
    }

    /// Returns the MIME type used for the embedded raster in SVG output.
    fn embedded_mime_type(input_path: &Path) -> &'static str {
        let ext = input_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/png",
        }
    }

    /// Renders an SVG document that embeds the raster image as a data URI.
    fn render_svg(width: u32, height: u32, mime_type: &str, data: &[u8]) -> String {
        let encoded = STANDARD.encode(data);
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
    <image href="data:{mime};base64,{data}" width="{w}" height="{h}" />
</svg>"#,
            w = width,
            h = height,
            mime = mime_type,
            data = encoded,
        )
    }

    /// Produces SVG output without ffmpeg, which has no raster-to-vector path.
    async fn embed_as_svg(input_path: &Path, output_path: &Path) -> Result<(), ConverterError> {
        let probe_path = input_path.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || image::image_dimensions(probe_path))
            .await
            .map_err(|e| ConverterError::embed_failed(e.to_string()))?
            .map_err(|e| {
                ConverterError::embed_failed(format!("Failed to read image dimensions: {}", e))
            })?;

        let data = tokio::fs::read(input_path).await?;
        let svg = Self::render_svg(width, height, Self::embedded_mime_type(input_path), &data);
        tokio::fs::write(output_path, svg).await?;
        Ok(())
    }

    /// Runs ffmpeg for one request.
    async fn run_ffmpeg(&self, input_path: &Path, output_path: &Path, format: TargetFormat) -> Result<(), ConverterError> {
        let args = self.build_args(input_path, output_path, format);
        debug!("Running {:?} {:?}", self.config.ffmpeg_path, args);

        let command = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match timeout(Duration::from_secs(self.config.timeout_secs), command).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?,
            // Dropping the future kills the child
            Err(_) => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::conversion_failed(
                format!("FFmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutput, ConverterError> {
        let start = Instant::now();

        if !request.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: request.input_path.clone(),
            });
        }

        let output_path = self.output_path_for(request)?;

        // Ensure output directory exists
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        if request.format == TargetFormat::Svg {
            Self::embed_as_svg(&request.input_path, &output_path).await?;
        } else {
            self.run_ffmpeg(&request.input_path, &output_path, request.format)
                .await?;
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(ConversionOutput {
            job_id: request.job_id.clone(),
            output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            format: request.format,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        // Check ffmpeg exists
        let ffmpeg_result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        // Ensure temp dir exists
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        Ok(())
    }
}
