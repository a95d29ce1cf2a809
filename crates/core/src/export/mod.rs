//! Export module for saving converted files where the user wants them.
//!
//! Converted artifacts live in the converter's temporary area until exported.
//! The [`ExportManager`] asks a [`DestinationPicker`] for a target and copies
//! artifacts with a [`FileCopier`].
//!
//! # Features
//!
//! - Save dialog for a batch of one, directory dialog otherwise
//! - Cancelled dialogs are a silent no-op
//! - Failed conversions are skipped
//! - Optional SHA-256 verification of each copy
//!
//! # Example
//!
//! ```ignore
//! use mediabatch_core::export::{ExportConfig, ExportManager, FsCopier};
//!
//! let manager = ExportManager::new(config.clone(), Arc::new(FsCopier::new(config)));
//! let outcome = manager.export(&batch, &picker).await?;
//! println!("Exported {} file(s)", outcome.exported_count());
//! ```

mod config;
mod error;
mod fs_copier;
mod manager;
mod traits;
mod types;

pub use config::ExportConfig;
pub use error::ExportError;
pub use fs_copier::FsCopier;
pub use manager::ExportManager;
pub use traits::{DestinationPicker, FileCopier};
pub use types::{ExportOutcome, ExportedFile};
