//! Session state machine and the batch data model.
//!
//! States: `Idle -> Selecting -> Processing -> Finished`, plus reset back to
//! `Idle` from `Selecting` or `Finished`, and `Processing -> Selecting` when a
//! run cannot be carried out at all. A single [`Session`] value owns the
//! batch; transitions are applied through [`Session::handle`].

mod error;
mod machine;
mod types;

pub use error::SessionError;
pub use machine::{InputOrigin, Session, SessionEffect, SessionEvent};
pub use types::{
    Batch, FileStatus, RunSummary, SessionSnapshot, SessionState, TrackedFile,
};
