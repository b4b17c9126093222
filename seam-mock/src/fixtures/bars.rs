use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use seam_core::{Bar, DataSlice, MarketData, Symbol};

/// A flat bar at `close` opening one `width` before `end`.
#[must_use]
pub fn flat_bar(end: DateTime<Utc>, width: TimeDelta, close: Decimal) -> MarketData {
    MarketData::Bar(Bar {
        open_time: end - width,
        open: close,
        high: close,
        low: close,
        close,
        volume: Some(1_000),
    })
}

/// `count` consecutive single-symbol slices every `step`, starting at `first`.
///
/// Closes count up from 100 so every bar is distinguishable.
#[must_use]
pub fn series(symbol: &Symbol, first: DateTime<Utc>, step: TimeDelta, count: usize) -> Vec<DataSlice> {
    let mut close = Decimal::from(100);
    let mut at = first;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(DataSlice::new(at).with_entry(symbol.clone(), flat_bar(at, step, close)));
        close += Decimal::ONE;
        at += step;
    }
    out
}
