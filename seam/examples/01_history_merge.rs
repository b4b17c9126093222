use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::America::New_York;
use futures::StreamExt;
use seam::{
    DiagnosticKind, FixedClock, HistoryRequest, InitializeParams, MarketData, Seam, Symbol,
    TradingCalendar,
};
use seam_mock::ScriptedSource;

fn ny(date: &str, time: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")?;
    TradingCalendar::new(New_York)
        .to_utc(date.and_time(time))
        .ok_or_else(|| "nonexistent local time".into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. The historical store knows the fixture closes up to 2023-01-05; the
    //    live source only knows "today", 2023-01-06.
    let historical = Arc::new(ScriptedSource::new("file-store").with_fixture_history(&["ABC", "XYZ"]));
    let live = Arc::new(ScriptedSource::new("brokerage").with_fixture_history(&["ABC", "XYZ"]));

    // 2. Pretend it is 2023-01-06 17:30 in New York.
    let now = ny("2023-01-06", "17:30")?;
    let mut seam = Seam::builder()
        .historical(historical.clone())
        .clock(Arc::new(FixedClock::new(now)))
        .default_time_zone(New_York)
        .build()?;
    seam.set_live_source(live.clone())?;

    seam.on_diagnostic(DiagnosticKind::DownloadFailed, |d| {
        eprintln!("download failed: {:?}", d.context());
    });
    seam.initialize(&InitializeParams::default()).await?;

    // 3. One batch, two symbols, each straddling today's New York midnight.
    let start = ny("2023-01-03", "00:00")?;
    let batch = vec![
        HistoryRequest::new(Symbol::new("ABC")?, start, now)?,
        HistoryRequest::new(Symbol::new("XYZ")?, start, now)?,
    ];

    let Some(mut slices) = seam.history(Some(batch), New_York)? else {
        return Ok(());
    };

    println!("## Merged history");
    while let Some(slice) = slices.next().await {
        let local = slice.time().with_timezone(&New_York);
        for (symbol, data) in slice.entries() {
            for point in data {
                if let MarketData::Bar(bar) = point {
                    println!(" - {local} {symbol}: close {}", bar.close);
                }
            }
        }
    }

    println!("\n## Calls");
    println!(" - file-store: {} batch(es)", historical.calls().len());
    println!(" - brokerage:  {} batch(es)", live.calls().len());
    println!(" - data points: {}", seam.data_point_count());
    Ok(())
}
