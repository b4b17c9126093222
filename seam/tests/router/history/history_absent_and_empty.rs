use std::sync::Arc;

use chrono_tz::Tz;
use futures::StreamExt;
use seam_mock::ScriptedSource;

use crate::helpers::{HISTORICAL, LIVE, now, ready};

#[tokio::test]
async fn absent_batch_yields_absent_stream() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let seam = ready(&historical, &live, now()).await;

    assert!(seam.history(None, Tz::UTC).unwrap().is_none());
    assert!(historical.calls().is_empty());
    assert!(live.calls().is_empty());
}

#[tokio::test]
async fn empty_batch_yields_empty_stream() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let seam = ready(&historical, &live, now()).await;

    let stream = seam.history(Some(Vec::new()), Tz::UTC).unwrap().unwrap();
    assert_eq!(stream.count().await, 0);
    assert!(historical.calls().is_empty());
    assert!(live.calls().is_empty());
}
