//! Fixed-interval countdown.
//!
//! The timer is a small state machine (`Idle → Running ⇄ Paused → Expired`)
//! driven by a Tokio task per run. Every run carries a generation number; a
//! tick only mutates state if its generation is still current, and the
//! `Running → Expired` transition happens under the same lock, so a tick
//! racing `pause()` or `reset()` can never fire the callback twice.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

use crate::error::TimerError;

/// Tick interval used by question countdowns.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Callback invoked when a run reaches zero.
type ExpireCallback = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Configured but not ticking; remaining time equals the duration.
    Idle,
    /// Ticking down.
    Running,
    /// Frozen mid-run.
    Paused,
    /// Reached zero; terminal until `reset()` or `restart()`.
    Expired,
}

/// Observable countdown state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerState {
    /// Seconds left, never negative.
    pub remaining_seconds: f64,
    /// `remaining / duration * 100`, clamped to `[0, 100]`.
    pub progress_percent: f64,
    /// Whether the countdown is currently ticking.
    pub running: bool,
    pub phase: TimerPhase,
}

struct Inner {
    phase: TimerPhase,
    duration_ms: u64,
    remaining_ms: u64,
    generation: u64,
    on_expire: Option<ExpireCallback>,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    #[allow(clippy::cast_precision_loss)]
    fn snapshot(&self) -> TimerState {
        let progress_percent = if self.duration_ms == 0 {
            0.0
        } else {
            (self.remaining_ms as f64 / self.duration_ms as f64 * 100.0).clamp(0.0, 100.0)
        };
        TimerState {
            remaining_seconds: self.remaining_ms as f64 / 1000.0,
            progress_percent,
            running: self.phase == TimerPhase::Running,
            phase: self.phase,
        }
    }

    /// Invalidates the current run and stops its task.
    fn halt(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<TimerState>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.snapshot());
    }
}

/// A countdown that fires a callback exactly once when it reaches zero.
///
/// Nothing starts automatically; the owner calls [`start`](Self::start).
/// Methods that begin a run must be called from within a Tokio runtime.
pub struct CountdownTimer {
    tick: Duration,
    tick_ms: u64,
    shared: Arc<Shared>,
}

impl CountdownTimer {
    /// Creates an idle timer ticking every `tick`.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::ZeroTickInterval` if `tick` is shorter than a
    /// millisecond.
    pub fn new(tick: Duration) -> Result<Self, TimerError> {
        let tick_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
        if tick_ms == 0 {
            return Err(TimerError::ZeroTickInterval(tick));
        }
        let inner = Inner {
            phase: TimerPhase::Idle,
            duration_ms: 0,
            remaining_ms: 0,
            generation: 0,
            on_expire: None,
            ticker: None,
        };
        let (state_tx, _rx) = watch::channel(inner.snapshot());
        Ok(Self {
            tick,
            tick_ms,
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                state_tx,
            }),
        })
    }

    /// Starts counting down from `duration`, or resumes a paused run from
    /// its frozen value (in which case `duration` is ignored).
    ///
    /// A call while already running is a no-op.
    pub fn start<F>(&self, duration: Duration, on_expire: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut inner = self.shared.inner.lock();
        match inner.phase {
            TimerPhase::Running => return,
            TimerPhase::Paused => {}
            TimerPhase::Idle | TimerPhase::Expired => {
                let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                inner.duration_ms = duration_ms;
                inner.remaining_ms = duration_ms;
            }
        }
        inner.on_expire = Some(Arc::new(on_expire));
        self.run(&mut inner);
    }

    /// Freezes the remaining time and stops ticking.
    pub fn pause(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.phase != TimerPhase::Running {
            return;
        }
        inner.halt();
        inner.phase = TimerPhase::Paused;
        self.shared.publish(&inner);
    }

    /// Restores the full duration, stops ticking and forgets the callback.
    pub fn reset(&self) {
        let mut inner = self.shared.inner.lock();
        inner.halt();
        inner.phase = TimerPhase::Idle;
        inner.remaining_ms = inner.duration_ms;
        inner.on_expire = None;
        self.shared.publish(&inner);
    }

    /// Restores the full duration and starts a fresh run with the last
    /// callback.
    pub fn restart(&self) {
        let mut inner = self.shared.inner.lock();
        inner.remaining_ms = inner.duration_ms;
        self.run(&mut inner);
    }

    /// Current countdown state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        *self.shared.state_tx.borrow()
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining_seconds(&self) -> f64 {
        self.state().remaining_seconds
    }

    /// Remaining share of the duration, in percent.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.state().progress_percent
    }

    /// Subscribes to state changes; every tick publishes a new value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    fn run(&self, inner: &mut Inner) {
        inner.halt();
        inner.phase = TimerPhase::Running;
        let generation = inner.generation;
        debug!(
            generation,
            remaining_ms = inner.remaining_ms,
            "countdown running"
        );
        inner.ticker = Some(tokio::spawn(tick_loop(
            Arc::clone(&self.shared),
            generation,
            self.tick,
            self.tick_ms,
        )));
        self.shared.publish(inner);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.shared.inner.lock().halt();
    }
}

async fn tick_loop(shared: Arc<Shared>, generation: u64, tick: Duration, tick_ms: u64) {
    let mut interval = interval_at(Instant::now() + tick, tick);
    loop {
        interval.tick().await;
        let callback = {
            let mut inner = shared.inner.lock();
            if inner.generation != generation || inner.phase != TimerPhase::Running {
                return;
            }
            inner.remaining_ms = inner.remaining_ms.saturating_sub(tick_ms);
            if inner.remaining_ms > 0 {
                shared.publish(&inner);
                continue;
            }
            inner.phase = TimerPhase::Expired;
            inner.ticker = None;
            shared.publish(&inner);
            inner.on_expire.clone()
        };
        debug!(generation, "countdown expired");
        if let Some(callback) = callback {
            callback();
        }
        return;
    }
}
