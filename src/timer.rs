//! Single-handle repeating timer.
//!
//! A [`RepeatingTimer`] owns at most one tokio task. [`RepeatingTimer::restart`]
//! aborts the current task before spawning the next, so two ticking loops can
//! never coexist for the same timer. The task only sends an [`AppEvent`]; the
//! event loop does the actual work.

use crate::events::AppEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub struct RepeatingTimer {
    label: &'static str,
    handle: Option<JoinHandle<()>>,
    live: Arc<AtomicUsize>,
}

/// Decrements the live-task count when the timer task is dropped, including
/// when it is aborted.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(live)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RepeatingTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            handle: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Clears the current timer, then arms a new one whose first tick fires
    /// one full `period` from now.
    pub fn restart(
        &mut self,
        period: Duration,
        tx: mpsc::UnboundedSender<AppEvent>,
        make_event: fn() -> AppEvent,
    ) {
        self.clear();
        let live = self.live.clone();
        let label = self.label;
        tracing::debug!("{label} timer armed ({}ms)", period.as_millis());
        self.handle = Some(tokio::spawn(async move {
            let _guard = LiveGuard::enter(live);
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(make_event()).is_err() {
                    tracing::debug!("{label} timer: channel closed");
                    return;
                }
            }
        }));
    }

    pub fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Number of timer tasks of this timer that are still running.
    pub fn live_tasks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.clear();
    }
}
