//! Testing utilities and mock implementations.
//!
//! Mock implementations of every collaborator trait, so sessions can be run
//! end to end without ffmpeg, dialogs or real copies.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediabatch_core::testing::{MockConverter, MockCopier, MockPicker};
//!
//! let converter = MockConverter::new();
//! converter.fail_path("/in/broken.mov", "corrupt header").await;
//!
//! let picker = MockPicker::new().with_directory("/exports");
//! // Build an orchestrator and export manager around them...
//! ```

mod mock_converter;
mod mock_copier;
mod mock_picker;

pub use mock_converter::MockConverter;
pub use mock_copier::{MockCopier, RecordedCopy};
pub use mock_picker::MockPicker;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::PathBuf;

    use crate::session::Batch;

    /// A batch where each entry is either converted to the given artifact
    /// path or failed.
    pub fn finished_batch(entries: &[(&str, Option<&str>)]) -> Batch {
        let mut batch = Batch::from_paths(entries.iter().map(|(path, _)| *path));
        for (file, (_, result)) in batch.iter_mut().zip(entries) {
            // Fresh files accept either move
            let _ = match result {
                Some(path) => file.mark_done(PathBuf::from(*path)),
                None => file.mark_failed("conversion failed"),
            };
        }
        batch
    }

    /// Paths for a list of file names under `dir`.
    pub fn paths_in(dir: &str, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(dir).join(n)).collect()
    }
}
