use std::sync::Arc;

use chrono_tz::Tz;
use seam_core::{
    BoundaryPolicy, BoundarySplitter, Clock, Diagnostic, DiagnosticHub, DiagnosticKind,
    HistorySource, InitializeParams, ListenerId, SeamConfig, SeamError, SourceRole, SystemClock,
    TradingCalendar, relay,
};

use crate::lifecycle::Lifecycle;

/// Facade that serves history from a historical store and a live source as
/// one ordered stream.
pub struct Seam {
    pub(crate) historical: Arc<dyn HistorySource>,
    pub(crate) live: Option<Arc<dyn HistorySource>>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) cfg: SeamConfig,
    pub(crate) hub: Arc<DiagnosticHub>,
    relays: Vec<(Arc<dyn HistorySource>, Vec<ListenerId>)>,
    /// Roles whose current source already initialized successfully.
    started: Vec<SourceRole>,
}

/// Builder for constructing a [`Seam`] with custom configuration.
pub struct SeamBuilder {
    historical: Option<Arc<dyn HistorySource>>,
    clock: Arc<dyn Clock>,
    cfg: SeamConfig,
}

impl Default for SeamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SeamBuilder {
    /// Create a builder with the system clock and default configuration.
    ///
    /// A historical source is mandatory; the live source is injected later via
    /// [`Seam::set_live_source`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            historical: None,
            clock: Arc::new(SystemClock),
            cfg: SeamConfig::default(),
        }
    }

    /// Register the bulk historical store. A second call replaces the first.
    #[must_use]
    pub fn historical(mut self, source: Arc<dyn HistorySource>) -> Self {
        self.historical = Some(source);
        self
    }

    /// Clock used to locate "today". Tests pass a `FixedClock`.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SeamConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// When the clock is read while splitting a batch.
    #[must_use]
    pub const fn boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.cfg.boundary_policy = policy;
        self
    }

    /// Time zone used for requests without a trading calendar.
    #[must_use]
    pub const fn default_time_zone(mut self, tz: Tz) -> Self {
        self.cfg.default_time_zone = tz;
        self
    }

    /// Build the facade.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no historical source was registered.
    pub fn build(self) -> Result<Seam, SeamError> {
        let historical = self.historical.ok_or_else(|| {
            SeamError::invalid_arg("no historical source registered; add one via historical(...)")
        })?;
        Ok(Seam {
            historical,
            live: None,
            lifecycle: Lifecycle::default(),
            clock: self.clock,
            cfg: self.cfg,
            hub: Arc::new(DiagnosticHub::new()),
            relays: Vec::new(),
            started: Vec::new(),
        })
    }
}

/// Attach the source name and role to an initialization error.
///
/// A `Source` error keeps the source name it already carries; only the role is
/// prefixed to its message.
pub(crate) fn tag_err(role: SourceRole, source: &str, e: SeamError) -> SeamError {
    match e {
        SeamError::Source { source_name, msg } => {
            SeamError::source_failed(source_name, format!("{role} initialization: {msg}"))
        }
        other => SeamError::source_failed(source, format!("{role} initialization: {other}")),
    }
}

impl Seam {
    /// Start building a new `Seam`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use seam::Seam;
    ///
    /// let mut seam = Seam::builder()
    ///     .historical(Arc::new(FileStore::open("data")?))
    ///     .build()?;
    /// seam.set_live_source(Arc::new(Brokerage::connect(cfg)?))?;
    /// seam.initialize(&InitializeParams::default()).await?;
    /// ```
    #[must_use]
    pub fn builder() -> SeamBuilder {
        SeamBuilder::new()
    }

    /// Inject the live source. May be repeated until initialization; the last
    /// value wins.
    ///
    /// # Errors
    /// `LiveSourceLocked` after [`Seam::initialize`] succeeded.
    pub fn set_live_source(&mut self, source: Arc<dyn HistorySource>) -> Result<(), SeamError> {
        self.lifecycle.set_dependency()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(source = source.name(), "live source set");
        self.started.retain(|r| *r != SourceRole::Live);
        self.live = Some(source);
        Ok(())
    }

    /// Wire diagnostics from both sources into this facade, then initialize
    /// both sources, historical first.
    ///
    /// A failed source initialization unwires the relays and leaves the facade
    /// uninitialized, so the call may be retried. A retry skips sources that
    /// already initialized successfully; replacing the live source makes it
    /// eligible again.
    ///
    /// # Errors
    /// - `MissingLiveSource` if no live source was set.
    /// - `AlreadyInitialized` on a second successful call.
    /// - `Source` tagged with the failing source's name.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "seam::core::initialize",
            skip(self, params),
            fields(job_id = params.job_id.as_deref().unwrap_or("-")),
        )
    )]
    pub async fn initialize(&mut self, params: &InitializeParams) -> Result<(), SeamError> {
        self.lifecycle.check_can_initialize()?;
        let live = self.live.clone().ok_or(SeamError::MissingLiveSource)?;
        let sources = [
            (SourceRole::Historical, Arc::clone(&self.historical)),
            (SourceRole::Live, live),
        ];

        for (_, source) in &sources {
            let ids = relay(source.diagnostics(), &self.hub);
            self.relays.push((Arc::clone(source), ids));
        }

        for (role, source) in &sources {
            if self.started.contains(role) {
                continue;
            }
            if let Err(e) = source.initialize(params).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(role = %role, source = source.name(), error = %e, "source initialization failed");
                self.unwire();
                return Err(tag_err(*role, source.name(), e));
            }
            self.started.push(*role);
        }

        self.lifecycle.complete_initialize()
    }

    fn unwire(&mut self) {
        for (source, ids) in self.relays.drain(..) {
            for id in ids {
                source.diagnostics().unsubscribe(id);
            }
        }
    }

    /// Whether the source serving `role` has been initialized.
    #[must_use]
    pub fn is_started(&self, role: SourceRole) -> bool {
        self.started.contains(&role)
    }

    /// Current setup state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SeamConfig {
        &self.cfg
    }

    /// Hub carrying the relayed notifications of both sources.
    #[must_use]
    pub const fn diagnostics(&self) -> &Arc<DiagnosticHub> {
        &self.hub
    }

    /// Register a listener for relayed notifications of `kind`.
    pub fn on_diagnostic<F>(&self, kind: DiagnosticKind, listener: F) -> ListenerId
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.hub.subscribe(kind, listener)
    }

    /// Data points produced so far by both sources.
    #[must_use]
    pub fn data_point_count(&self) -> u64 {
        let live = self.live.as_ref().map_or(0, |l| l.data_point_count());
        self.historical.data_point_count().saturating_add(live)
    }

    pub(crate) fn splitter(&self) -> BoundarySplitter {
        BoundarySplitter::new(TradingCalendar::new(self.cfg.default_time_zone))
    }
}

impl Drop for Seam {
    fn drop(&mut self) {
        self.unwire();
    }
}
