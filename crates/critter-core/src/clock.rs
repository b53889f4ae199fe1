//! Time source for the Critter simulation.
//!
//! The simulation core never reads the wall clock itself. Callers hand it
//! timestamps, usually from a [`TimeSource`], and it turns pairs of
//! timestamps into elapsed time with [`elapsed_between`].
//!
//! # Design Principles
//!
//! - A clock that runs backwards (NTP step, manual change, restored save
//!   from the future) yields zero elapsed time, never negative.
//! - Tests drive time explicitly through [`ManualClock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

/// Milliseconds per minute, for converting elapsed time.
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// A source of "now".
pub trait TimeSource: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Millisecond resolution. Interior mutability lets a shared reference be
/// advanced while the simulation holds another.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// A clock stopped at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Move the clock to `instant`, forwards or backwards.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis.store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move the clock by `delta` (negative deltas go back in time).
    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// A clock that runs `scale` times as fast as another, from the instant it
/// was created.
///
/// Used to fast-forward a critter: at scale 60 one real second is one
/// simulated minute.
#[derive(Debug)]
pub struct ScaledClock<T> {
    inner: T,
    origin: DateTime<Utc>,
    scale: f64,
}

impl<T: TimeSource> ScaledClock<T> {
    /// Wrap `inner`. A non-positive or non-finite scale runs at real time.
    pub fn new(inner: T, scale: f64) -> Self {
        let origin = inner.now();
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            inner,
            origin,
            scale,
        }
    }

    /// The speed-up factor in effect.
    pub const fn scale(&self) -> f64 {
        self.scale
    }
}

impl<T: TimeSource> TimeSource for ScaledClock<T> {
    fn now(&self) -> DateTime<Utc> {
        let real = elapsed_between(self.origin, self.inner.now());
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let scaled_ms = (real.num_milliseconds() as f64 * self.scale) as i64;
        TimeDelta::try_milliseconds(scaled_ms)
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Time elapsed from `last` to `now`, clamped at zero.
///
/// A regression is logged and treated as no time at all.
pub fn elapsed_between(last: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
    let delta = now.signed_duration_since(last);
    if delta < TimeDelta::zero() {
        warn!(
            %last,
            %now,
            regression_ms = delta.num_milliseconds().saturating_neg(),
            "Clock moved backwards, treating elapsed time as zero"
        );
        return TimeDelta::zero();
    }
    delta
}

/// [`elapsed_between`] in fractional minutes.
pub fn elapsed_minutes(last: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let millis = elapsed_between(last, now).num_milliseconds() as f64;
    millis / MILLIS_PER_MINUTE
}
