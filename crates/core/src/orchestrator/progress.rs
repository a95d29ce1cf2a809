//! Synthetic progress for a run in flight.
//!
//! The conversion engine reports nothing while it works, so progress is a
//! cosmetic estimate: on every tick it advances by a random step but never
//! passes the ceiling. The runner snaps it to 100 once every file is done.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::config::OrchestratorConfig;

/// Applies one tick to `current`, staying within `[current, ceiling]`.
pub fn advance(current: f32, step: f32, ceiling: f32) -> f32 {
    if current >= ceiling {
        return current;
    }
    (current + step.max(0.0)).min(ceiling)
}

/// Background task feeding a progress channel until stopped.
pub struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl ProgressTicker {
    /// Starts ticking into `progress`. The current channel value is the
    /// starting point.
    pub fn start(config: &OrchestratorConfig, progress: Arc<watch::Sender<f32>>) -> Self {
        let tick = config.progress_tick();
        let ceiling = config.progress_ceiling;
        let max_step = config.progress_max_step;
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let step = if max_step.is_finite() && max_step > 0.0 {
                            rand::rng().random_range(0.0..max_step)
                        } else {
                            0.0
                        };
                        progress.send_if_modified(|value| {
                            let next = advance(*value, step, ceiling);
                            let changed = next > *value;
                            *value = next;
                            changed
                        });
                    }
                }
            }
            debug!("Progress ticker stopped");
        });

        Self {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
        }
    }

    /// Stops ticking and waits for the task to exit. No tick is published
    /// after this returns.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_advance_clamps_at_ceiling() {
        assert_eq!(advance(0.0, 5.0, 90.0), 5.0);
        assert_eq!(advance(88.0, 5.0, 90.0), 90.0);
        assert_eq!(advance(90.0, 5.0, 90.0), 90.0);
        // Never moves backward
        assert_eq!(advance(95.0, 5.0, 90.0), 95.0);
        assert_eq!(advance(10.0, -3.0, 90.0), 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stays_below_ceiling() {
        let config = OrchestratorConfig {
            progress_tick_ms: 10,
            progress_ceiling: 90.0,
            progress_max_step: 10.0,
            ..Default::default()
        };
        let (tx, rx) = watch::channel(0.0f32);
        let ticker = ProgressTicker::start(&config, Arc::new(tx));

        let mut last = 0.0;
        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let value = *rx.borrow();
            assert!(value >= last, "progress moved backward");
            assert!(value <= 90.0, "progress passed the ceiling");
            last = value;
        }

        ticker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_stop() {
        let config = OrchestratorConfig {
            progress_tick_ms: 10,
            ..Default::default()
        };
        let (tx, rx) = watch::channel(0.0f32);
        let ticker = ProgressTicker::start(&config, Arc::new(tx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        ticker.stop().await;
        let frozen = *rx.borrow();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*rx.borrow(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_step_does_not_kill_ticker() {
        let config = OrchestratorConfig {
            progress_tick_ms: 10,
            progress_max_step: f32::INFINITY,
            ..Default::default()
        };
        let (tx, rx) = watch::channel(0.0f32);
        let ticker = ProgressTicker::start(&config, Arc::new(tx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!ticker.handle.as_ref().unwrap().is_finished());
        assert_eq!(*rx.borrow(), 0.0);

        ticker.stop().await;
    }
}
