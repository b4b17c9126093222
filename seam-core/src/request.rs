use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::TradingCalendar;
use crate::types::{Resolution, SeamError, Symbol};

/// Immutable description of a historical data request over `[start, end)`.
///
/// Requests built through [`HistoryRequest::new`] always satisfy `start <= end`.
/// Deserialized requests are not re-validated; check [`HistoryRequest::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    symbol: Symbol,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default)]
    calendar: Option<TradingCalendar>,
    #[serde(default)]
    resolution: Resolution,
}

impl HistoryRequest {
    /// Build a request for `symbol` over `[start, end)`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start` is after `end`.
    pub fn new(symbol: Symbol, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SeamError> {
        if start > end {
            return Err(SeamError::invalid_arg(format!(
                "history request for {symbol} starts at {start} after its end {end}"
            )));
        }
        Ok(Self {
            symbol,
            start,
            end,
            calendar: None,
            resolution: Resolution::default(),
        })
    }

    /// Attach the instrument's trading calendar.
    #[must_use]
    pub const fn with_calendar(mut self, calendar: TradingCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Select the data granularity.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Copy of this request over a different `[start, end)`; every other field is kept.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start` is after `end`.
    pub fn with_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SeamError> {
        if start > end {
            return Err(SeamError::invalid_arg(format!(
                "derived range for {} starts at {start} after its end {end}",
                self.symbol
            )));
        }
        Ok(self.narrowed(start, end))
    }

    pub(crate) fn narrowed(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// Instrument identifier.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Inclusive start instant.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end instant.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Trading calendar, if the caller supplied one.
    #[must_use]
    pub const fn calendar(&self) -> Option<&TradingCalendar> {
        self.calendar.as_ref()
    }

    /// Requested granularity.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Length of the requested range.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether the range is well formed (`start <= end`).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Whether `instant` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
