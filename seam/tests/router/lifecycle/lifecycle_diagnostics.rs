use std::sync::Arc;

use chrono_tz::Tz;
use futures::StreamExt;
use seam::{Diagnostic, DiagnosticContext, DiagnosticKind, HistorySource};
use seam_mock::ScriptedSource;

use crate::helpers::{ABC, HISTORICAL, LIVE, dt, now, ready, record, req, seam_at, slice};

#[tokio::test]
async fn notifications_raised_during_initialize_are_relayed() {
    let warn = Diagnostic::new(
        DiagnosticKind::StartDateLimited,
        DiagnosticContext::new(HISTORICAL, "start moved to 1998-01-02").with_symbol(ABC),
    );
    let historical = Arc::new(ScriptedSource::new(HISTORICAL).raising_on_initialize(warn.clone()));
    let live = Arc::new(ScriptedSource::new(LIVE));

    let mut seam = seam_at(&historical, &live, now());
    let seen = record(&seam, DiagnosticKind::StartDateLimited);
    seam.initialize(&seam::InitializeParams::default()).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![warn]);
}

#[tokio::test]
async fn every_kind_is_relayed_from_both_sources_unchanged() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let seam = ready(&historical, &live, now()).await;

    let recorders: Vec<_> = DiagnosticKind::ALL
        .iter()
        .map(|&k| (k, record(&seam, k)))
        .collect();

    for kind in DiagnosticKind::ALL {
        historical
            .diagnostics()
            .raise(kind, DiagnosticContext::new(HISTORICAL, kind.as_str()));
        live.diagnostics()
            .raise(kind, DiagnosticContext::new(LIVE, kind.as_str()).with_symbol(ABC));
    }

    for (kind, seen) in recorders {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2, "{kind}");
        assert!(seen.iter().all(|d| d.kind() == kind));
        assert_eq!(seen[0].context().source, HISTORICAL);
        assert_eq!(seen[0].context().symbol, None);
        assert_eq!(seen[1].context().source, LIVE);
        assert_eq!(seen[1].context().symbol.as_deref(), Some(ABC));
        assert_eq!(seen[1].context().message, kind.as_str());
    }
}

#[tokio::test]
async fn download_failure_is_relayed_and_stream_continues() {
    let live = Arc::new(ScriptedSource::new(LIVE).with_slices(vec![
        slice(ABC, dt(2024, 3, 15, 9, 0, 0), 10),
        slice(ABC, dt(2024, 3, 15, 10, 0, 0), 11),
    ]));
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let seam = ready(&historical, &live, now()).await;
    let failed = record(&seam, DiagnosticKind::DownloadFailed);

    let today = dt(2024, 3, 15, 0, 0, 0);
    let stream = seam
        .history(
            Some(vec![req(ABC, today, now()), req("FAIL", today, now())]),
            Tz::UTC,
        )
        .unwrap()
        .unwrap();
    assert!(failed.lock().unwrap().is_empty());

    let slices: Vec<_> = stream.collect().await;
    assert_eq!(slices.len(), 2);
    let failed = failed.lock().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].context().source, LIVE);
    assert_eq!(failed[0].context().symbol.as_deref(), Some("FAIL"));
}
