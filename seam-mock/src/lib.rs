//! Scripted backing sources for seam tests and examples.
//!
//! [`ScriptedSource`] serves slices from an in-memory script, records every
//! batch it receives and counts how many of its streams were released. It is
//! lazy like a real source: nothing is filtered, counted or reported until the
//! stream it returns is polled.

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use chrono_tz::Tz;
use futures::stream::{self, Stream, StreamExt};
use seam_core::{
    DataSlice, Diagnostic, DiagnosticContext, DiagnosticHub, DiagnosticKind, HistoryRequest,
    HistorySource, InitializeParams, SeamError, SourceStream, Symbol,
};

pub mod fixtures;

/// Symbol that makes the scripted source report a failed download.
pub const FAIL_SYMBOL: &str = "FAIL";

/// In-memory [`HistorySource`] driven by a fixed script of slices.
pub struct ScriptedSource {
    name: &'static str,
    slices: Arc<Vec<DataSlice>>,
    hub: Arc<DiagnosticHub>,
    calls: Mutex<Vec<Vec<HistoryRequest>>>,
    init_count: AtomicUsize,
    init_error: Option<SeamError>,
    init_diagnostics: Vec<Diagnostic>,
    fetched: Arc<AtomicU64>,
    released: Arc<AtomicUsize>,
    item_delay: Option<Duration>,
    declines: bool,
}

impl ScriptedSource {
    /// Source named `name` with an empty script.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slices: Arc::new(Vec::new()),
            hub: Arc::new(DiagnosticHub::new()),
            calls: Mutex::new(Vec::new()),
            init_count: AtomicUsize::new(0),
            init_error: None,
            init_diagnostics: Vec::new(),
            fetched: Arc::new(AtomicU64::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            item_delay: None,
            declines: false,
        }
    }

    /// Replace the script. Slices are served in time order whatever their
    /// order here.
    #[must_use]
    pub fn with_slices(mut self, mut slices: Vec<DataSlice>) -> Self {
        slices.sort_by_key(DataSlice::time);
        self.slices = Arc::new(slices);
        self
    }

    /// Script the fixture daily closes of `symbols`. Unknown symbols are skipped.
    #[must_use]
    pub fn with_fixture_history(self, symbols: &[&str]) -> Self {
        let slices = symbols
            .iter()
            .filter_map(|s| fixtures::history::by_symbol(s))
            .flatten()
            .collect();
        self.with_slices(slices)
    }

    /// Make `initialize` fail with `error`.
    #[must_use]
    pub fn failing_initialize(mut self, error: SeamError) -> Self {
        self.init_error = Some(error);
        self
    }

    /// Raise `diagnostic` on this source's hub during `initialize`.
    #[must_use]
    pub fn raising_on_initialize(mut self, diagnostic: Diagnostic) -> Self {
        self.init_diagnostics.push(diagnostic);
        self
    }

    /// Sleep for `delay` before yielding each item.
    #[must_use]
    pub const fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = Some(delay);
        self
    }

    /// Answer every batch with "nothing to offer".
    #[must_use]
    pub const fn declining(mut self) -> Self {
        self.declines = true;
        self
    }

    /// Every batch passed to `history`, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<HistoryRequest>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `initialize` ran.
    #[must_use]
    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    /// How many returned streams have been dropped.
    #[must_use]
    pub fn released_streams(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Data points yielded so far across all streams.
    #[must_use]
    pub fn fetched_items(&self) -> u64 {
        self.fetched.load(Ordering::SeqCst)
    }
}

/// Filter the script down to what `requests` ask for.
///
/// Failing requests come first as empty placeholders and are reported on `hub`.
fn plan(
    name: &'static str,
    slices: &[DataSlice],
    requests: &[HistoryRequest],
    hub: &DiagnosticHub,
) -> Vec<Option<DataSlice>> {
    let mut out = Vec::new();
    for req in requests.iter().filter(|r| r.symbol().as_str() == FAIL_SYMBOL) {
        hub.raise(
            DiagnosticKind::DownloadFailed,
            DiagnosticContext::new(name, "forced failure: history").with_symbol(req.symbol().as_str()),
        );
        out.push(None);
    }
    for slice in slices {
        let wanted = |sym: &Symbol| {
            requests
                .iter()
                .any(|r| r.symbol() == sym && r.contains(slice.time()))
        };
        let mut kept = DataSlice::new(slice.time());
        for (sym, data) in slice.entries() {
            if wanted(sym) {
                for point in data {
                    kept.push(sym.clone(), point.clone());
                }
            }
        }
        if !kept.is_empty() {
            out.push(Some(kept));
        }
    }
    out
}

/// Stream wrapper that counts its own release.
struct Tracked {
    inner: SourceStream,
    released: Arc<AtomicUsize>,
}

impl Stream for Tracked {
    type Item = Option<DataSlice>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistorySource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self, _params: &InitializeParams) -> Result<(), SeamError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        for d in &self.init_diagnostics {
            self.hub.emit(d);
        }
        match &self.init_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn history(&self, requests: Vec<HistoryRequest>, _output_tz: Tz) -> Option<SourceStream> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(requests.clone());
        if self.declines {
            return None;
        }

        let name = self.name;
        let slices = Arc::clone(&self.slices);
        let hub = Arc::clone(&self.hub);
        let fetched = Arc::clone(&self.fetched);
        let delay = self.item_delay;

        let items = stream::once(async move { plan(name, &slices, &requests, &hub) })
            .flat_map(stream::iter)
            .then(move |item| async move {
                if let Some(d) = delay {
                    tokio::time::sleep(d).await;
                }
                item
            })
            .inspect(move |item| {
                if let Some(slice) = item {
                    let points: usize = slice.entries().values().map(Vec::len).sum();
                    fetched.fetch_add(points as u64, Ordering::SeqCst);
                }
            });

        Some(
            Tracked {
                inner: items.boxed(),
                released: Arc::clone(&self.released),
            }
            .boxed(),
        )
    }

    fn diagnostics(&self) -> &DiagnosticHub {
        &self.hub
    }

    fn data_point_count(&self) -> u64 {
        self.fetched_items()
    }
}
