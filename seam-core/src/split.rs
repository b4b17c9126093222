//! Splitting requests at the historical/live boundary.
//!
//! The boundary is the local midnight of "today" in the instrument's trading
//! calendar, expressed in UTC. Everything strictly before it is served by the
//! historical store; everything from it onward by the live source.

use chrono::{DateTime, Utc};

use crate::calendar::TradingCalendar;
use crate::request::HistoryRequest;

/// Result of splitting one request.
///
/// When both halves are present their ranges are adjacent: the first ends
/// exactly where the second starts. Both halves absent means no split was
/// performed because the request was malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRequest {
    /// Part of the request strictly before the boundary.
    pub before_today: Option<HistoryRequest>,
    /// Part of the request at or after the boundary.
    pub today: Option<HistoryRequest>,
}

impl SplitRequest {
    /// True when the request straddled the boundary and was cut in two.
    #[must_use]
    pub const fn is_straddling(&self) -> bool {
        self.before_today.is_some() && self.today.is_some()
    }

    /// True when no split was performed.
    #[must_use]
    pub const fn is_unsplit(&self) -> bool {
        self.before_today.is_none() && self.today.is_none()
    }
}

/// Locates the boundary for a request and splits the request around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundarySplitter {
    default_calendar: TradingCalendar,
}

impl BoundarySplitter {
    /// Splitter using `default_calendar` for requests that carry none.
    #[must_use]
    pub const fn new(default_calendar: TradingCalendar) -> Self {
        Self { default_calendar }
    }

    /// Today's local midnight for `request`'s calendar, in UTC.
    #[must_use]
    pub fn today_start_utc(&self, request: &HistoryRequest, now: DateTime<Utc>) -> DateTime<Utc> {
        request
            .calendar()
            .unwrap_or(&self.default_calendar)
            .start_of_day_utc(now)
    }

    /// Split `request` at the boundary that holds at `now`.
    #[must_use]
    pub fn split(&self, request: &HistoryRequest, now: DateTime<Utc>) -> SplitRequest {
        split_at(request, self.today_start_utc(request, now))
    }
}

/// Split `request` at an already computed `boundary`.
///
/// - `end <= boundary`: the whole request is historical.
/// - `start >= boundary`: the whole request is live.
/// - otherwise: `[start, boundary)` and `[boundary, end)`.
///
/// A malformed request (`start > end`) is not split at all.
#[must_use]
pub fn split_at(request: &HistoryRequest, boundary: DateTime<Utc>) -> SplitRequest {
    if !request.is_valid() {
        return SplitRequest::default();
    }
    if request.end() <= boundary {
        return SplitRequest {
            before_today: Some(request.clone()),
            today: None,
        };
    }
    if request.start() >= boundary {
        return SplitRequest {
            before_today: None,
            today: Some(request.clone()),
        };
    }
    SplitRequest {
        before_today: Some(request.narrowed(request.start(), boundary)),
        today: Some(request.narrowed(boundary, request.end())),
    }
}
