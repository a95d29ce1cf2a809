//! Configuration for the export module.

use serde::{Deserialize, Serialize};

/// Configuration for exporting converted files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Prefix of every exported file name.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Whether an existing destination file is replaced.
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Whether to verify SHA-256 checksums after copying.
    #[serde(default)]
    pub verify_checksums: bool,
}

fn default_file_prefix() -> String {
    "converted_".to_string()
}

fn default_buffer_size() -> usize {
    1024 * 1024 // 1 MB
}

fn default_true() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            buffer_size: default_buffer_size(),
            overwrite: true,
            verify_checksums: false,
        }
    }
}

impl ExportConfig {
    /// Enables checksum verification.
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    /// Sets the overwrite policy.
    pub fn with_overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Sets the copy buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}
