use std::sync::Arc;

use chrono_tz::Tz;
use seam::{DiagnosticKind, HistorySource, InitializeParams, Lifecycle, Seam, SeamError, SourceRole};
use seam_mock::ScriptedSource;

use crate::helpers::{HISTORICAL, LIVE, now, ready, seam_at};

#[test]
fn build_requires_historical_source() {
    let err = Seam::builder().build().err().unwrap();
    assert!(matches!(err, SeamError::InvalidArg(_)));
}

#[tokio::test]
async fn initialize_without_live_source_is_rejected() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let mut seam = Seam::builder().historical(historical.clone()).build().unwrap();
    assert_eq!(seam.lifecycle(), Lifecycle::Uninitialized);

    let err = seam.initialize(&InitializeParams::default()).await.unwrap_err();
    assert_eq!(err, SeamError::MissingLiveSource);
    assert!(err.is_configuration());
    assert_eq!(historical.init_count(), 0);
}

#[tokio::test]
async fn retrieval_before_initialize_is_rejected() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let seam = seam_at(&historical, &live, now());
    assert_eq!(seam.lifecycle(), Lifecycle::DependencySet);

    let err = seam.history(Some(vec![]), Tz::UTC).err().unwrap();
    assert_eq!(err, SeamError::NotInitialized);
    assert!(historical.calls().is_empty());
}

#[tokio::test]
async fn second_initialize_fails_and_sources_start_once() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let mut seam = ready(&historical, &live, now()).await;
    assert_eq!(seam.lifecycle(), Lifecycle::Initialized);

    let err = seam.initialize(&InitializeParams::default()).await.unwrap_err();
    assert_eq!(err, SeamError::AlreadyInitialized);
    assert!(err.is_configuration());
    assert_eq!(historical.init_count(), 1);
    assert_eq!(live.init_count(), 1);
}

#[tokio::test]
async fn live_source_is_locked_after_initialize() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let mut seam = ready(&historical, &live, now()).await;

    let other = Arc::new(ScriptedSource::new("other-brokerage"));
    assert_eq!(seam.set_live_source(other), Err(SeamError::LiveSourceLocked));
    assert_eq!(seam.lifecycle(), Lifecycle::Initialized);
}

#[tokio::test]
async fn last_live_source_before_initialize_wins() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let first = Arc::new(ScriptedSource::new("first-brokerage"));
    let second = Arc::new(ScriptedSource::new(LIVE));

    let mut seam = seam_at(&historical, &first, now());
    seam.set_live_source(second.clone()).unwrap();
    seam.initialize(&InitializeParams::default()).await.unwrap();

    assert_eq!(first.init_count(), 0);
    assert_eq!(second.init_count(), 1);
    assert_eq!(seam.source(SourceRole::Live).unwrap().name(), LIVE);
}

#[tokio::test]
async fn failed_source_initialize_is_tagged_and_retryable() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let broken = Arc::new(
        ScriptedSource::new(LIVE).failing_initialize(SeamError::Other("login rejected".into())),
    );
    let mut seam = seam_at(&historical, &broken, now());

    let err = seam.initialize(&InitializeParams::default()).await.unwrap_err();
    match &err {
        SeamError::Source { source_name, msg } => {
            assert_eq!(source_name, LIVE);
            assert!(msg.contains("live initialization"), "{msg}");
            assert!(msg.contains("login rejected"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_configuration());
    assert_eq!(seam.lifecycle(), Lifecycle::DependencySet);
    assert!(seam.is_started(SourceRole::Historical));
    assert!(!seam.is_started(SourceRole::Live));

    // Relays are unwired so a retry does not double-deliver.
    for kind in DiagnosticKind::ALL {
        assert_eq!(historical.diagnostics().listener_count(kind), 0);
        assert_eq!(broken.diagnostics().listener_count(kind), 0);
    }

    let fixed = Arc::new(ScriptedSource::new(LIVE));
    seam.set_live_source(fixed.clone()).unwrap();
    seam.initialize(&InitializeParams::default()).await.unwrap();
    // The historical store already started and is not initialized again.
    assert_eq!(historical.init_count(), 1);
    assert_eq!(broken.init_count(), 1);
    assert_eq!(fixed.init_count(), 1);
    assert!(seam.is_started(SourceRole::Live));
    for kind in DiagnosticKind::ALL {
        assert_eq!(historical.diagnostics().listener_count(kind), 1);
    }
}

#[tokio::test]
async fn retry_with_same_failing_live_source_keeps_historical_started_once() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let broken = Arc::new(
        ScriptedSource::new(LIVE).failing_initialize(SeamError::Other("login rejected".into())),
    );
    let mut seam = seam_at(&historical, &broken, now());

    for _ in 0..3 {
        assert!(seam.initialize(&InitializeParams::default()).await.is_err());
    }
    assert_eq!(historical.init_count(), 1);
    assert_eq!(broken.init_count(), 3);
    assert_eq!(seam.lifecycle(), Lifecycle::DependencySet);
}

#[tokio::test]
async fn source_error_keeps_its_name_and_gains_the_role() {
    let historical = Arc::new(
        ScriptedSource::new(HISTORICAL)
            .failing_initialize(SeamError::source_failed("archive-index", "index missing")),
    );
    let live = Arc::new(ScriptedSource::new(LIVE));
    let mut seam = seam_at(&historical, &live, now());

    let err = seam.initialize(&InitializeParams::default()).await.unwrap_err();
    assert_eq!(
        err,
        SeamError::source_failed("archive-index", "historical initialization: index missing")
    );
    assert_eq!(live.init_count(), 0);
}

#[tokio::test]
async fn dropping_the_facade_removes_its_relays() {
    let historical = Arc::new(ScriptedSource::new(HISTORICAL));
    let live = Arc::new(ScriptedSource::new(LIVE));
    let seam = ready(&historical, &live, now()).await;
    for kind in DiagnosticKind::ALL {
        assert_eq!(historical.diagnostics().listener_count(kind), 1);
        assert_eq!(live.diagnostics().listener_count(kind), 1);
    }

    drop(seam);
    for kind in DiagnosticKind::ALL {
        assert_eq!(historical.diagnostics().listener_count(kind), 0);
        assert_eq!(live.diagnostics().listener_count(kind), 0);
    }
}
