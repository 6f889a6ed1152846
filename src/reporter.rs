//! Periodic statistics reporting on a background thread.
//!
//! [`StatsReporter::spawn`] starts a thread that, every `interval`, takes a
//! delta snapshot from a [`StatsSource`] and hands it to a callback. The
//! snapshot is copied under the source's lock; the callback runs after the
//! lock is released, so a slow callback never blocks cache operations.
//!
//! ```text
//!   spawn ──► [wait interval] ──► take_stats() ──► f(stats) ──┐
//!                   ▲                 (locked)      (unlocked) │
//!                   └──────────────────────────────────────────┘
//!   stop / drop ──► notify ──► thread exits ──► join
//! ```
//!
//! Stopping is immediate: the wait is on a condition variable, not a sleep,
//! and no snapshot is taken once the stop flag is set.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::metrics::CacheStats;
use crate::traits::StatsSource;

#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn stop(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }

    /// Waits until `deadline` or a stop request. Returns `true` if stopped.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }
}

/// Handle to a running reporter thread.
///
/// The thread stops and is joined when the handle is dropped or
/// [`stop`](Self::stop) is called.
///
/// ```
/// use evictkit::concurrent::SharedCache;
/// use evictkit::policy::lfu::LfuCache;
/// use evictkit::reporter::StatsReporter;
/// use std::sync::mpsc;
/// use std::time::Duration;
///
/// let cache = SharedCache::new(LfuCache::new(8).unwrap());
/// let (tx, rx) = mpsc::channel();
/// let reporter = StatsReporter::spawn(cache.clone(), Duration::from_millis(20), move |s| {
///     let _ = tx.send(s);
/// })
/// .unwrap();
///
/// cache.set("a", 1);
/// let mut sets = 0;
/// while sets == 0 {
///     sets += rx.recv().unwrap().sets;
/// }
/// reporter.stop();
/// assert_eq!(sets, 1);
/// ```
#[derive(Debug)]
pub struct StatsReporter {
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl StatsReporter {
    /// Starts reporting `source` every `interval`.
    ///
    /// Fails with [`ConfigError::ZeroStatsInterval`] when `interval` is zero.
    pub fn spawn<S, F>(source: S, interval: Duration, mut f: F) -> Result<Self, ConfigError>
    where
        S: StatsSource + Send + 'static,
        F: FnMut(CacheStats) + Send + 'static,
    {
        if interval.is_zero() {
            warn!("rejecting zero stats interval");
            return Err(ConfigError::ZeroStatsInterval);
        }

        let signal = Arc::new(StopSignal::default());
        let thread_signal = Arc::clone(&signal);
        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                if thread_signal.wait_until(deadline) {
                    break;
                }
                let stats = source.take_stats();
                f(stats);
                deadline += interval;
                let now = Instant::now();
                if deadline < now {
                    deadline = now + interval;
                }
            }
        });
        debug!(interval_ms = interval.as_millis() as u64, "stats reporter started");

        Ok(Self {
            signal,
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.signal.stop();
        if handle.join().is_err() {
            warn!("stats reporter callback panicked");
        } else {
            debug!("stats reporter stopped");
        }
    }
}

impl Drop for StatsReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
