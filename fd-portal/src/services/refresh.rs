use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// What the refresh task should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// Owns the single recurring refresh task of a session client.
///
/// The first tick fires one full period after `start`. Starting again aborts
/// the running task before spawning the new one, so at most one exists.
pub struct RefreshCycle {
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshCycle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start<F, Fut>(&self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickOutcome> + Send + 'static,
    {
        let period = self.period;
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = handle.take() {
            previous.abort();
            tracing::debug!("Replaced running token refresh cycle");
        }

        if period.is_zero() {
            tracing::error!("Token refresh period is zero, proactive refresh disabled");
            return;
        }

        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tick().await == TickOutcome::Stop {
                    tracing::debug!("Token refresh cycle finished");
                    break;
                }
            }
        }));

        tracing::debug!(period_secs = period.as_secs(), "Started token refresh cycle");
    }

    /// Idempotent.
    pub fn stop(&self) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = previous {
            handle.abort();
            tracing::debug!("Stopped token refresh cycle");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RefreshCycle {
    fn drop(&mut self) {
        self.stop();
    }
}
