//! Sources of "now" and the calendar rules evaluated against them.
//!
//! All engine timing runs on local wall-clock time expressed as
//! [`NaiveDateTime`]. The caller picks the source: [`SystemClock`] in
//! production, [`ManualClock`] for tests and what-if queries, and
//! [`TokioClock`] when the tokio timer (possibly paused) should drive time.

mod emergency;

pub use emergency::{
    default_holidays, detect_emergency, is_after_hours, is_holiday, EmergencyAssessment,
    EmergencyDetector, Holiday,
};
pub(crate) use emergency::duration_secs;

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};

/// A source of local wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A settable clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        *self.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        *guard += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

/// A fixed wall-clock origin advanced by tokio's monotonic clock.
///
/// Under `tokio::time::pause` the reported time moves only as the runtime
/// auto-advances, which keeps reveal timing deterministic in tests.
#[derive(Debug, Clone)]
pub struct TokioClock {
    base: NaiveDateTime,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(base: NaiveDateTime) -> Self {
        Self {
            base,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = Duration::from_std(self.started.elapsed()).unwrap_or(Duration::zero());
        self.base + elapsed
    }
}
