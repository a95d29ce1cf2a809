//! Session controller.
//!
//! A single task owns the [`Session`](crate::session::Session) and applies
//! every request in order. Clients hold a [`SessionHandle`]; snapshots are
//! published through a `watch` channel after each change.
//!
//! # Example
//!
//! ```ignore
//! let (handle, controller) = create_session_controller(orchestrator, exporter, 64);
//! tokio::spawn(controller.run());
//!
//! handle.add_files(vec!["/videos/trip.mov".into()]).await?;
//! handle.convert().await?;
//! ```

mod actor;
mod error;
mod handle;

pub use actor::{create_session_controller, SessionController};
pub use error::ControllerError;
pub use handle::SessionHandle;
