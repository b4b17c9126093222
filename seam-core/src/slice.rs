use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MarketData, Symbol};

/// Market data for many instruments at one UTC instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSlice {
    time: DateTime<Utc>,
    entries: BTreeMap<Symbol, Vec<MarketData>>,
}

impl DataSlice {
    /// Empty slice at `time`.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style [`DataSlice::push`].
    #[must_use]
    pub fn with_entry(mut self, symbol: Symbol, data: MarketData) -> Self {
        self.push(symbol, data);
        self
    }

    /// Append one entry for `symbol`.
    pub fn push(&mut self, symbol: Symbol, data: MarketData) {
        self.entries.entry(symbol).or_default().push(data);
    }

    /// Instant the slice describes.
    #[must_use]
    pub const fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Per-symbol entries, ordered by symbol.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<Symbol, Vec<MarketData>> {
        &self.entries
    }

    /// Entries for `symbol`; empty when the slice holds none.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> &[MarketData] {
        self.entries.get(symbol).map(Vec::as_slice).unwrap_or_default()
    }

    /// Symbols with at least one entry.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.keys()
    }

    /// Total number of entries across all symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True when no symbol carries data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Fold `other` into this slice.
    ///
    /// Every entry of `other` is kept: symbols present in both slices end up under
    /// one key holding both entry lists, `self`'s entries first. The instant of
    /// `self` is kept even if `other` describes a different one.
    pub fn combine(&mut self, other: Self) {
        for (symbol, mut data) in other.entries {
            match self.entries.entry(symbol) {
                Entry::Vacant(v) => {
                    v.insert(data);
                }
                Entry::Occupied(mut o) => o.get_mut().append(&mut data),
            }
        }
    }

    /// Owned form of [`DataSlice::combine`].
    #[must_use]
    pub fn combined(mut self, other: Self) -> Self {
        self.combine(other);
        self
    }
}
