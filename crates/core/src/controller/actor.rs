use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::classifier::TargetFormat;
use crate::converter::Converter;
use crate::export::{DestinationPicker, ExportManager, ExportOutcome, FileCopier};
use crate::orchestrator::BatchOrchestrator;
use crate::session::{
    Batch, Session, SessionEffect, SessionError, SessionEvent, SessionSnapshot, SessionState,
};

use super::error::ControllerError;
use super::handle::SessionHandle;

type Reply<T> = oneshot::Sender<Result<T, ControllerError>>;

/// Message processed by the controller task.
pub(super) enum Command {
    /// Apply a session event. Internal events from the run carry no reply.
    Apply {
        event: SessionEvent,
        reply: Option<Reply<SessionSnapshot>>,
    },
    Export {
        picker: Box<dyn DestinationPicker>,
        reply: Reply<ExportOutcome>,
    },
}

/// Background task that owns the [`Session`].
///
/// It is the only code that mutates the session. Runs execute in their own
/// task and report back through the same command channel, so requests keep
/// being served while a batch converts.
pub struct SessionController<C, F>
where
    C: Converter + 'static,
    F: FileCopier + 'static,
{
    session: Session,
    orchestrator: Arc<BatchOrchestrator<C>>,
    exporter: ExportManager<F>,
    rx: mpsc::Receiver<Command>,
    /// Weak so that dropping every handle stops the controller.
    self_tx: mpsc::WeakSender<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
}

/// Create a complete session controller.
///
/// Returns:
/// - `SessionHandle` - for driving the session (clone this to share across tasks)
/// - `SessionController` - spawn this with `tokio::spawn(controller.run())`
pub fn create_session_controller<C, F>(
    orchestrator: Arc<BatchOrchestrator<C>>,
    exporter: ExportManager<F>,
    buffer_size: usize,
) -> (SessionHandle, SessionController<C, F>)
where
    C: Converter + 'static,
    F: FileCopier + 'static,
{
    let (tx, rx) = mpsc::channel(buffer_size.max(1));
    let session = Session::new();
    let (snapshots, snapshot_rx) = watch::channel(session.snapshot());

    let controller = SessionController {
        session,
        orchestrator,
        exporter,
        rx,
        self_tx: tx.downgrade(),
        snapshots,
    };
    (SessionHandle::new(tx, snapshot_rx), controller)
}

impl<C, F> SessionController<C, F>
where
    C: Converter + 'static,
    F: FileCopier + 'static,
{
    /// Processes commands until every handle is dropped.
    pub async fn run(mut self) {
        info!("Session controller started");

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Apply { event, reply } => {
                    let result = self.apply(event).map_err(ControllerError::from);
                    match reply {
                        Some(reply) => {
                            let _ = reply.send(result);
                        }
                        None => {
                            if let Err(e) = result {
                                debug!("Dropped run event: {}", e);
                            }
                        }
                    }
                }
                Command::Export { picker, reply } => {
                    let result = self.export(picker.as_ref()).await;
                    let _ = reply.send(result);
                }
            }
        }

        info!("Session controller shutting down");
    }

    /// Applies one event, performs its effects and publishes the new snapshot.
    fn apply(&mut self, event: SessionEvent) -> Result<SessionSnapshot, SessionError> {
        let effects = self.session.handle(event)?;
        for effect in effects {
            match effect {
                SessionEffect::StartRun { batch, format } => self.spawn_run(batch, format),
                SessionEffect::ScheduleFinish { delay } => self.schedule_finish(delay),
            }
        }
        Ok(self.publish())
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
        snapshot
    }

    fn schedule_finish(&mut self, delay: Option<Duration>) {
        let Some(delay) = delay else {
            if let Err(e) = self.session.handle(SessionEvent::FinishRun) {
                warn!("Could not finish run: {}", e);
            }
            return;
        };

        let Some(tx) = self.self_tx.upgrade() else {
            return;
        };
        debug!("Holding completed run for {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            send_internal(&tx, SessionEvent::FinishRun).await;
        });
    }

    fn spawn_run(&self, batch: Batch, format: TargetFormat) {
        let Some(tx) = self.self_tx.upgrade() else {
            return;
        };
        let orchestrator = Arc::clone(&self.orchestrator);

        tokio::spawn(async move {
            let (update_tx, mut update_rx) = mpsc::channel(64);
            let mut progress = orchestrator.subscribe_progress();

            let runner = Arc::clone(&orchestrator);
            let mut run =
                tokio::spawn(async move { runner.run(batch, format, Some(update_tx)).await });

            let joined = loop {
                tokio::select! {
                    joined = &mut run => break joined,
                    Some(update) = update_rx.recv() => {
                        send_internal(&tx, SessionEvent::FileUpdated(update)).await;
                    }
                    Ok(()) = progress.changed() => {
                        let value = *progress.borrow_and_update();
                        send_internal(&tx, SessionEvent::ProgressTick(value)).await;
                    }
                }
            };

            while let Ok(update) = update_rx.try_recv() {
                send_internal(&tx, SessionEvent::FileUpdated(update)).await;
            }

            let event = match joined {
                Ok(Ok(outcome)) => {
                    let finish_delay = orchestrator.config().finish_delay(outcome.elapsed);
                    SessionEvent::RunCompleted {
                        outcome,
                        finish_delay,
                    }
                }
                Ok(Err(e)) => {
                    error!("Run failed: {}", e);
                    SessionEvent::RunFailed {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    error!("Run task aborted: {}", e);
                    SessionEvent::RunFailed {
                        reason: format!("conversion stopped unexpectedly: {}", e),
                    }
                }
            };
            send_internal(&tx, event).await;
        });
    }

    async fn export(
        &mut self,
        picker: &dyn DestinationPicker,
    ) -> Result<ExportOutcome, ControllerError> {
        if self.session.state() != SessionState::Finished {
            return Err(SessionError::InvalidTransition {
                state: self.session.state(),
                action: "export",
            }
            .into());
        }

        match self.exporter.export(self.session.batch(), picker).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!("Export failed: {}", e);
                self.session.handle(SessionEvent::ExportFailed {
                    reason: e.to_string(),
                })?;
                self.publish();
                Err(e.into())
            }
        }
    }
}

async fn send_internal(tx: &mpsc::Sender<Command>, event: SessionEvent) {
    if tx
        .send(Command::Apply { event, reply: None })
        .await
        .is_err()
    {
        debug!("Session controller stopped; dropping run event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConversionOutput, ConversionRequest, ConverterError};
    use crate::export::ExportConfig;
    use crate::orchestrator::OrchestratorConfig;
    use crate::session::FileStatus;
    use crate::testing::{MockConverter, MockCopier, MockPicker};
    use std::path::PathBuf;

    struct Harness {
        handle: SessionHandle,
        converter: Arc<MockConverter>,
        copier: Arc<MockCopier>,
    }

    async fn harness() -> Harness {
        let converter = Arc::new(MockConverter::new());
        converter.set_conversion_duration(Duration::ZERO).await;
        let copier = Arc::new(MockCopier::new());

        let config = OrchestratorConfig {
            progress_tick_ms: 5,
            ..Default::default()
        };
        let orchestrator = Arc::new(BatchOrchestrator::new(config, Arc::clone(&converter)));
        let exporter = ExportManager::new(ExportConfig::default(), Arc::clone(&copier));
        let (handle, controller) = create_session_controller(orchestrator, exporter, 32);
        tokio::spawn(controller.run());

        Harness {
            handle,
            converter,
            copier,
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    async fn wait_finished(handle: &SessionHandle) -> SessionSnapshot {
        tokio::time::timeout(
            Duration::from_secs(5),
            handle.wait_for(|s| s.state == SessionState::Finished),
        )
        .await
        .expect("run did not finish")
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_run_reaches_finished() {
        let h = harness().await;
        h.converter.fail_path("/in/a.mp4", "corrupt").await;

        h.handle
            .add_files(paths(&["/in/a.mp4", "/in/b.mp4", "/in/c.mp4"]))
            .await
            .unwrap();
        let started = h.handle.convert().await.unwrap();
        assert_eq!(started.state, SessionState::Processing);

        let finished = wait_finished(&h.handle).await;
        let statuses: Vec<&str> = finished.files.iter().map(|f| f.status().name()).collect();
        assert_eq!(statuses, vec!["error", "done", "done"]);
        assert_eq!(finished.progress, 100.0);
        assert_eq!(finished.summary.unwrap().done, 2);
    }

    #[tokio::test]
    async fn test_drop_during_run_is_ignored() {
        let h = harness().await;
        h.converter
            .set_conversion_duration(Duration::from_millis(100))
            .await;

        h.handle.add_files(paths(&["/in/a.wav"])).await.unwrap();
        h.handle.convert().await.unwrap();

        let during = h.handle.drop_files(paths(&["/in/b.wav"])).await.unwrap();
        assert_eq!(during.files.len(), 1);
        assert!(h.handle.add_files(paths(&["/in/c.wav"])).await.is_err());
        assert!(h.handle.reset().await.unwrap_err().is_rejected());

        let finished = wait_finished(&h.handle).await;
        assert_eq!(finished.files.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_converter_returns_to_selecting() {
        let h = harness().await;
        h.converter
            .set_next_error(ConverterError::FfmpegNotFound {
                path: "ffmpeg".into(),
            })
            .await;

        h.handle.add_files(paths(&["/in/a.png"])).await.unwrap();
        h.handle.convert().await.unwrap();

        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            h.handle.wait_for(|s| s.state == SessionState::Selecting && s.error.is_some()),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(snapshot.error.unwrap().contains("converter unavailable"));
        assert_eq!(snapshot.files[0].status(), &FileStatus::Pending);
    }

    struct PanickingConverter;

    #[async_trait::async_trait]
    impl Converter for PanickingConverter {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn convert(
            &self,
            _request: &ConversionRequest,
        ) -> Result<ConversionOutput, ConverterError> {
            panic!("engine crashed");
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_crashed_run_returns_to_selecting() {
        let orchestrator = Arc::new(BatchOrchestrator::new(
            OrchestratorConfig::default(),
            Arc::new(PanickingConverter),
        ));
        let exporter = ExportManager::new(ExportConfig::default(), Arc::new(MockCopier::new()));
        let (handle, controller) = create_session_controller(orchestrator, exporter, 8);
        tokio::spawn(controller.run());

        handle.add_files(paths(&["/in/a.mp4"])).await.unwrap();
        handle.convert().await.unwrap();

        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            handle.wait_for(|s| s.state == SessionState::Selecting && s.error.is_some()),
        )
        .await
        .expect("session stayed in processing")
        .unwrap();
        assert_eq!(snapshot.files[0].status(), &FileStatus::Pending);
        assert_eq!(snapshot.progress, 0.0);

        let reset = handle.reset().await.unwrap();
        assert_eq!(reset.state, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_export_requires_finished() {
        let h = harness().await;
        h.handle.add_files(paths(&["/in/a.png"])).await.unwrap();

        let err = h
            .handle
            .export(Box::new(MockPicker::new().with_save_path("/out/a.png")))
            .await
            .unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(h.copier.copy_count().await, 0);
    }

    #[tokio::test]
    async fn test_export_failure_keeps_finished_with_error() {
        let h = harness().await;
        h.handle
            .add_files(paths(&["/in/a.png", "/in/b.png"]))
            .await
            .unwrap();
        h.handle.convert().await.unwrap();
        wait_finished(&h.handle).await;

        h.copier.fail_destination("/out/converted_a.png").await;
        let err = h
            .handle
            .export(Box::new(MockPicker::new().with_directory("/out")))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Export(_)));

        let snapshot = h.handle.snapshot();
        assert_eq!(snapshot.state, SessionState::Finished);
        assert!(snapshot.error.is_some());

        h.handle.dismiss_error().await.unwrap();
        assert!(h.handle.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_export_multi_file() {
        let h = harness().await;
        h.handle
            .add_files(paths(&["/in/a.mov", "/in/b.mov"]))
            .await
            .unwrap();
        h.handle
            .select_format(TargetFormat::Webm)
            .await
            .unwrap();
        h.handle.convert().await.unwrap();
        wait_finished(&h.handle).await;

        let outcome = h
            .handle
            .export(Box::new(MockPicker::new().with_directory("/out")))
            .await
            .unwrap();
        assert_eq!(outcome.exported_count(), 2);

        let destinations: Vec<PathBuf> = h
            .copier
            .recorded_copies()
            .await
            .into_iter()
            .map(|c| c.destination)
            .collect();
        assert_eq!(
            destinations,
            vec![
                PathBuf::from("/out/converted_a.webm"),
                PathBuf::from("/out/converted_b.webm"),
            ]
        );
    }
}
