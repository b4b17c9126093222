//! seam-core
//!
//! Core types, traits, and algorithms behind the seam history facade.
//!
//! - `types`, `request`, `slice`, `calendar`: request and market data model.
//! - `source`: the `HistorySource` trait implemented by backing sources.
//! - `split`: locating the historical/live boundary and splitting requests at it.
//! - `merge`: N-way merge of time-ordered slice streams.
//! - `diagnostics`: per-kind listener registry and the relay between hubs.
//! - `subscription`: the subscription capability exposed to algorithm code.
//!
//! Streams are `futures` streams and nothing here spawns tasks, so the crate
//! does not tie callers to a particular async runtime.
#![warn(missing_docs)]

/// Trading calendars and clocks.
pub mod calendar;
/// Diagnostic listener registry and relay.
pub mod diagnostics;
/// Merging of time-ordered slice streams.
pub mod merge;
/// History request descriptor.
pub mod request;
/// Market data slices.
pub mod slice;
/// Backing source contract.
pub mod source;
/// Historical/live boundary splitting.
pub mod split;
/// Subscription capability.
pub mod subscription;
pub mod types;

pub use calendar::{Clock, FixedClock, SystemClock, TradingCalendar};
pub use diagnostics::{DiagnosticHub, Listener, ListenerId, relay};
pub use merge::{MergeSlices, merge};
pub use request::HistoryRequest;
pub use slice::DataSlice;
pub use source::{HistorySource, InitializeParams, SliceStream, SourceStream};
pub use split::{BoundarySplitter, SplitRequest, split_at};
pub use subscription::{
    SubscriptionConfig, SubscriptionManager, SubscriptionRegistry, SubscriptionRequest,
};
pub use types::*;
