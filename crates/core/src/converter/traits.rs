//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{ConversionOutput, ConversionRequest};

/// An engine that converts one media file to a target format.
///
/// Each call is independent; implementations keep no per-batch state.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts the source file and returns where the artifact was written.
    async fn convert(&self, request: &ConversionRequest)
        -> Result<ConversionOutput, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TargetFormat;
    use std::path::PathBuf;

    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn convert(
            &self,
            request: &ConversionRequest,
        ) -> Result<ConversionOutput, ConverterError> {
            Ok(ConversionOutput {
                job_id: request.job_id.clone(),
                output_path: request.input_path.with_extension(request.format.extension()),
                output_size_bytes: 512,
                duration_ms: 1,
                format: request.format,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_converter_as_trait_object() {
        let converter: Box<dyn Converter> = Box::new(EchoConverter);
        let request = ConversionRequest::new("job", "/in/song.wav", TargetFormat::Mp3);
        let output = converter.convert(&request).await.unwrap();
        assert_eq!(output.output_path, PathBuf::from("/in/song.mp3"));
        assert_eq!(converter.name(), "echo");
        assert!(converter.validate().await.is_ok());
    }
}
