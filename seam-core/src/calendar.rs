//! Trading calendars and wall clocks used to locate the historical/live boundary.

use std::sync::Mutex;

use chrono::{DateTime, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Exchange time zone of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingCalendar {
    time_zone: Tz,
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl TradingCalendar {
    /// Calendar for the given exchange time zone.
    #[must_use]
    pub const fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    /// The universal calendar used when a request carries none.
    #[must_use]
    pub const fn utc() -> Self {
        Self { time_zone: Tz::UTC }
    }

    /// Exchange time zone.
    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Convert a UTC instant to exchange-local wall-clock time.
    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.time_zone)
    }

    /// Convert exchange-local wall-clock time to UTC.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant; times that
    /// do not exist locally (DST spring-forward gap) return `None`.
    #[must_use]
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.time_zone.from_local_datetime(&local) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Some(t.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }

    /// Local midnight of the calendar date containing `now`, expressed in UTC.
    ///
    /// When midnight falls inside a DST gap the first valid local instant after
    /// midnight is used.
    #[must_use]
    pub fn start_of_day_utc(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.to_local(now).date_naive().and_time(NaiveTime::MIN);
        let mut candidate = midnight;
        // Real-world gaps are whole quarter hours and never longer than a day.
        for _ in 0..=96 {
            if let Some(t) = self.to_utc(candidate) {
                return t;
            }
            candidate += TimeDelta::minutes(15);
        }
        midnight.and_utc()
    }
}

impl From<Tz> for TradingCalendar {
    fn from(time_zone: Tz) -> Self {
        Self::new(time_zone)
    }
}

/// Source of the current wall-clock instant.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
