//! Seam serves market history from two backing sources as if it were one.
//!
//! Overview
//! - A bulk historical store answers everything strictly before "today", where
//!   today starts at local midnight in the instrument's trading calendar.
//! - A live source answers the still-open current day.
//! - Requests that straddle the boundary are cut in two, each source is called
//!   at most once per batch, and the two streams are merged into one strictly
//!   increasing stream of `DataSlice`s. Slices sharing an instant are combined.
//!
//! Key behaviors
//! - Lifecycle: the historical source is given at build time, the live source is
//!   injected afterwards with [`Seam::set_live_source`], and
//!   [`Seam::initialize`] must succeed exactly once before retrieval.
//! - Diagnostics: notifications raised by either source are re-emitted on the
//!   facade's own hub, unchanged.
//! - Laziness: [`Seam::history`] returns immediately; sources do their work
//!   only when the returned stream is polled. Dropping the stream releases
//!   every source stream.
//! - Boundary timing: by default the clock is read once per batch
//!   ([`BoundaryPolicy::PerBatch`]).
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use seam::{InitializeParams, Seam};
//!
//! let mut seam = Seam::builder()
//!     .historical(Arc::new(file_store))
//!     .default_time_zone(chrono_tz::America::New_York)
//!     .build()?;
//! seam.set_live_source(Arc::new(brokerage))?;
//! seam.initialize(&InitializeParams::default()).await?;
//!
//! let mut slices = seam.history(Some(requests), chrono_tz::Tz::UTC)?.unwrap();
//! while let Some(slice) = slices.next().await {
//!     // ...
//! }
//! ```
#![warn(missing_docs)]

mod core;
/// Setup state machine.
pub mod lifecycle;
/// Request routing and the retrieval entry point.
pub mod router;

pub use crate::core::{Seam, SeamBuilder};
pub use lifecycle::Lifecycle;
pub use router::RoutedRequests;

pub use seam_core::{
    BoundarySplitter, Clock, DataSlice, DiagnosticHub, FixedClock, HistoryRequest, HistorySource,
    InitializeParams, ListenerId, MarketData, SliceStream, SourceStream, Symbol, SystemClock,
    TradingCalendar,
};
pub use seam_types::{
    BoundaryPolicy, Diagnostic, DiagnosticContext, DiagnosticKind, SeamConfig, SeamError,
    SourceRole,
};
