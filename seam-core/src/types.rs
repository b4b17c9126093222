//! Foundational market-data types shared across the seam workspace.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use seam_types::{
    BoundaryPolicy, Diagnostic, DiagnosticContext, DiagnosticKind, SeamConfig, SeamError,
    SourceRole,
};

/// Instrument identifier.
///
/// Symbols are compared verbatim; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Build a symbol from a non-empty ticker string.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the trimmed input is empty.
    pub fn new(s: impl Into<String>) -> Result<Self, SeamError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SeamError::invalid_arg("symbol must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Data granularity requested from a backing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Resolution {
    /// Individual trades and quotes.
    Tick,
    /// One-second bars.
    Second,
    /// One-minute bars.
    #[default]
    Minute,
    /// One-hour bars.
    Hour,
    /// Daily bars.
    Daily,
}

/// An OHLCV bar closing at the owning slice's instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Instant the bar opened.
    pub open_time: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// Highest price.
    pub high: Decimal,
    /// Lowest price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume, when the source reports it.
    pub volume: Option<u64>,
}

/// A single trade print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade price.
    pub price: Decimal,
    /// Trade size.
    pub quantity: Decimal,
}

/// One market data entry held by a slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketData {
    /// An aggregated bar.
    Bar(Bar),
    /// A trade print.
    Tick(Tick),
}
