//! Converter module: the boundary to the external conversion engine.
//!
//! This module provides the `Converter` trait and an FFmpeg-backed
//! implementation. A converter takes a source file and a target format and
//! returns the path of the converted artifact, or fails. Callers treat every
//! failure as opaque; the orchestrator never looks inside the engine.
//!
//! # Features
//!
//! - One ffmpeg process per file, with a timeout
//! - ICO output scaled down to fit 256x256
//! - SVG output built by embedding the raster source as a data URI
//! - Artifacts written under a per-job directory inside the temp dir
//!
//! # Example
//!
//! ```ignore
//! use mediabatch_core::converter::{ConversionRequest, Converter, FfmpegConverter};
//! use mediabatch_core::classifier::TargetFormat;
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let request = ConversionRequest::new("job-1", "/videos/clip.mov", TargetFormat::Mp4);
//! let output = converter.convert(&request).await?;
//! println!("Converted to {:?} in {} ms", output.output_path, output.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{ConversionOutput, ConversionRequest};
