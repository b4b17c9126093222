use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use seam::{
    BoundaryPolicy, BoundarySplitter, Clock, InitializeParams, RoutedRequests, Seam,
    TradingCalendar,
};
use seam_mock::ScriptedSource;

use crate::helpers::{ABC, HISTORICAL, LIVE, XYZ, dt, req};

/// Clock that hands out a scripted sequence of instants, repeating the last one.
struct ScriptedClock {
    instants: Mutex<Vec<DateTime<Utc>>>,
    reads: Mutex<usize>,
}

impl ScriptedClock {
    fn new(mut instants: Vec<DateTime<Utc>>) -> Self {
        instants.reverse();
        Self {
            instants: Mutex::new(instants),
            reads: Mutex::new(0),
        }
    }

    fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.reads.lock().unwrap() += 1;
        let mut instants = self.instants.lock().unwrap();
        if instants.len() > 1 {
            instants.pop().unwrap()
        } else {
            instants[0]
        }
    }
}

fn around_midnight() -> ScriptedClock {
    ScriptedClock::new(vec![dt(2024, 3, 15, 23, 59, 59), dt(2024, 3, 16, 0, 0, 1)])
}

fn batch() -> Vec<seam::HistoryRequest> {
    let start = dt(2024, 3, 15, 12, 0, 0);
    let end = dt(2024, 3, 16, 12, 0, 0);
    vec![req(ABC, start, end), req(XYZ, start, end)]
}

#[test]
fn per_batch_reads_the_clock_once() {
    let clock = around_midnight();
    let splitter = BoundarySplitter::new(TradingCalendar::utc());
    let routed = RoutedRequests::route(&batch(), &splitter, &clock, BoundaryPolicy::PerBatch);

    assert_eq!(clock.reads(), 1);
    assert!(routed.historical.is_empty());
    assert_eq!(routed.live, batch());
}

#[test]
fn per_request_rereads_the_clock() {
    let clock = around_midnight();
    let splitter = BoundarySplitter::new(TradingCalendar::utc());
    let routed = RoutedRequests::route(&batch(), &splitter, &clock, BoundaryPolicy::PerRequest);

    assert_eq!(clock.reads(), 2);
    let midnight = dt(2024, 3, 16, 0, 0, 0);
    assert_eq!(
        routed.historical,
        vec![req(XYZ, dt(2024, 3, 15, 12, 0, 0), midnight)]
    );
    assert_eq!(
        routed.live,
        vec![
            req(ABC, dt(2024, 3, 15, 12, 0, 0), dt(2024, 3, 16, 12, 0, 0)),
            req(XYZ, midnight, dt(2024, 3, 16, 12, 0, 0)),
        ]
    );
}

#[test]
fn empty_batch_routes_nowhere() {
    let clock = around_midnight();
    let splitter = BoundarySplitter::default();
    let routed = RoutedRequests::route(&[], &splitter, &clock, BoundaryPolicy::PerBatch);
    assert!(routed.is_empty());
}

#[tokio::test]
async fn facade_honours_configured_policy_and_time_zone() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let clock = Arc::new(around_midnight());

    let mut seam = Seam::builder()
        .historical(historical.clone())
        .clock(clock.clone())
        .boundary_policy(BoundaryPolicy::PerRequest)
        .default_time_zone(chrono_tz::Europe::Rome)
        .build()
        .unwrap();
    seam.set_live_source(live.clone()).unwrap();
    seam.initialize(&InitializeParams::default()).await.unwrap();
    assert_eq!(seam.config().boundary_policy, BoundaryPolicy::PerRequest);

    seam.history(Some(batch()), Tz::UTC).unwrap();
    assert_eq!(clock.reads(), 2);

    // Both instants fall on 2024-03-16 in Rome, whose midnight is 23:00 UTC.
    let rome_midnight = dt(2024, 3, 15, 23, 0, 0);
    let calls = historical.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].iter().all(|r| r.end() == rome_midnight));
    assert!(live.calls()[0].iter().all(|r| r.start() == rome_midnight));
}
