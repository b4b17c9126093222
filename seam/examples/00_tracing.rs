use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use futures::StreamExt;
use seam::{HistoryRequest, InitializeParams, Seam, Symbol};
use seam_mock::ScriptedSource;
use seam_mock::fixtures::bars::series;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,seam=trace,seam_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let abc = Symbol::new("ABC")?;
    let now = Utc::now();
    let start = now - TimeDelta::days(2);

    let historical = Arc::new(ScriptedSource::new("file-store").with_slices(series(
        &abc,
        start,
        TimeDelta::hours(6),
        8,
    )));
    let live = Arc::new(ScriptedSource::new("brokerage").with_slices(series(
        &abc,
        now - TimeDelta::hours(2),
        TimeDelta::minutes(30),
        4,
    )));

    let mut seam = Seam::builder().historical(historical).build()?;
    seam.set_live_source(live)?;
    seam.initialize(&InitializeParams {
        job_id: Some("tracing-demo".into()),
        ..InitializeParams::default()
    })
    .await?;

    let request = HistoryRequest::new(abc, start, now)?;
    if let Some(stream) = seam.history(Some(vec![request]), chrono_tz::Tz::UTC)? {
        let n = stream.count().await;
        println!("{n} slices, {} data points", seam.data_point_count());
    }
    Ok(())
}
