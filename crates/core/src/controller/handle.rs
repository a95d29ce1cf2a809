//! Cloneable front door to the session controller.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot, watch};

use crate::classifier::TargetFormat;
use crate::export::{DestinationPicker, ExportOutcome};
use crate::session::{InputOrigin, SessionEvent, SessionSnapshot};

use super::actor::Command;
use super::error::ControllerError;

/// Handle for driving the session.
///
/// This is cheaply cloneable and can be shared across tasks. Every request is
/// applied by the controller task in arrival order.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub(super) fn new(tx: mpsc::Sender<Command>, snapshots: watch::Receiver<SessionSnapshot>) -> Self {
        Self { tx, snapshots }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Files chosen through a file picker.
    pub async fn add_files(&self, paths: Vec<PathBuf>) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::FilesAdded {
            paths,
            origin: InputOrigin::Picker,
        })
        .await
    }

    /// Files delivered by drag-and-drop. Silently ignored during a run.
    pub async fn drop_files(&self, paths: Vec<PathBuf>) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::FilesAdded {
            paths,
            origin: InputOrigin::DragDrop,
        })
        .await
    }

    pub async fn remove_file(&self, file_id: impl Into<String>) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::FileRemoved {
            file_id: file_id.into(),
        })
        .await
    }

    pub async fn select_format(&self, format: TargetFormat) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::FormatSelected(format)).await
    }

    /// Starts converting the batch. Returns once the run has started.
    pub async fn convert(&self) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::ConvertRequested).await
    }

    pub async fn reset(&self) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::Reset).await
    }

    pub async fn dismiss_error(&self) -> Result<SessionSnapshot, ControllerError> {
        self.apply(SessionEvent::ErrorDismissed).await
    }

    /// Exports the finished batch to wherever `picker` answers.
    pub async fn export(
        &self,
        picker: Box<dyn DestinationPicker>,
    ) -> Result<ExportOutcome, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Export { picker, reply })
            .await
            .map_err(|_| ControllerError::Closed)?;
        rx.await.map_err(|_| ControllerError::Closed)?
    }

    /// Waits until the published snapshot satisfies `predicate`.
    pub async fn wait_for<P>(&self, mut predicate: P) -> Result<SessionSnapshot, ControllerError>
    where
        P: FnMut(&SessionSnapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| ControllerError::Closed)?;
        Ok(snapshot.clone())
    }

    async fn apply(&self, event: SessionEvent) -> Result<SessionSnapshot, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Apply {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| ControllerError::Closed)?;
        rx.await.map_err(|_| ControllerError::Closed)?
    }
}
