//! Rate-limited progress notification.
//!
//! [`Throttle`] wraps a callback so that however often it is signaled, the
//! callback fires at most once per configured interval:
//!
//! - the first signal fires immediately (leading edge),
//! - signals arriving within the interval are coalesced into one deferred
//!   firing carrying the latest value (trailing edge),
//! - the latest value is always delivered at most one interval after it
//!   was last signaled.
//!
//! The trailing fire records the instant it actually ran, not the instant
//! it was scheduled, so the once-per-interval guarantee holds across
//! rescheduling patterns.
//!
//! Timers use `tokio::time`, so `call` must be invoked from within a tokio
//! runtime and the throttle cooperates with paused test time.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A throttled callback.
///
/// Cloning is cheap and clones share the same state, like the closure the
/// throttle replaces.
pub struct Throttle<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Throttle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    interval: Duration,
    callback: Box<dyn Fn(T) + Send + Sync>,
    state: Mutex<State<T>>,
}

struct State<T> {
    /// When the callback last actually ran.
    last_fired: Option<Instant>,
    /// Latest value signaled during the current interval.
    pending: Option<T>,
    /// Whether a trailing-edge timer task is in flight.
    timer_armed: bool,
}

impl<T: Send + 'static> Throttle<T> {
    /// Wraps `callback` so it fires at most once per `interval`.
    pub fn new(interval: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                interval,
                callback: Box::new(callback),
                state: Mutex::new(State {
                    last_fired: None,
                    pending: None,
                    timer_armed: false,
                }),
            }),
        }
    }

    /// Signals the throttle with a new value.
    ///
    /// Fires the callback synchronously if the interval has elapsed since
    /// the last fire (or nothing has fired yet); otherwise stores `value`
    /// as the pending payload and arms a single trailing-edge timer. A
    /// later signal within the same window replaces the pending value.
    pub fn call(&self, value: T) {
        let now = Instant::now();
        let mut state = self.inner.state.lock();

        let fire_now = match state.last_fired {
            None => true,
            // If a trailing fire is armed, new values must route through it
            // even when the interval has technically elapsed.
            Some(last) => !state.timer_armed && now.duration_since(last) >= self.inner.interval,
        };

        if fire_now {
            state.last_fired = Some(now);
            drop(state);
            (self.inner.callback)(value);
            return;
        }

        state.pending = Some(value);
        if state.timer_armed {
            return;
        }
        state.timer_armed = true;

        let fire_at = state
            .last_fired
            .expect("trailing timer armed before any leading fire")
            + self.inner.interval;
        drop(state);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep_until(fire_at).await;

            let value = {
                let mut state = inner.state.lock();
                state.timer_armed = false;
                match state.pending.take() {
                    Some(value) => {
                        // Record the actual fire time, not the scheduled one.
                        state.last_fired = Some(Instant::now());
                        value
                    }
                    None => return,
                }
            };
            (inner.callback)(value);
        });
    }

    /// The configured minimum interval between firings.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }
}
