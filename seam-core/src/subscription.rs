//! Subscription capability exposed next to the history facade.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::types::{Resolution, Symbol};

/// Identity of a data feed subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Subscribed instrument.
    pub symbol: Symbol,
    /// Feed granularity.
    pub resolution: Resolution,
    /// Include pre- and post-market data.
    pub extended_hours: bool,
}

impl SubscriptionConfig {
    /// Regular-hours subscription for `symbol` at `resolution`.
    #[must_use]
    pub const fn new(symbol: Symbol, resolution: Resolution) -> Self {
        Self {
            symbol,
            resolution,
            extended_hours: false,
        }
    }
}

/// Request to make sure a subscription exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// Subscription to create.
    pub config: SubscriptionConfig,
    /// Universe that owns the subscription; `None` for a direct user request.
    pub universe: Option<Symbol>,
}

/// Ensures and removes data feed subscriptions on behalf of algorithm code.
pub trait SubscriptionManager: Send + Sync {
    /// Make sure the requested subscription exists. Returns whether it exists
    /// after the call.
    fn ensure_subscription(&self, request: &SubscriptionRequest) -> bool;

    /// Remove the subscription for `config`.
    ///
    /// With `universe == None` the subscription is removed for every universe.
    /// Returns whether anything was removed.
    fn remove_subscription(&self, config: &SubscriptionConfig, universe: Option<&Symbol>) -> bool;
}

/// In-memory [`SubscriptionManager`] tracking which universes hold each config.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: RwLock<HashMap<SubscriptionConfig, BTreeSet<Option<Symbol>>>>,
    limit: Option<usize>,
}

impl SubscriptionRegistry {
    /// Unbounded registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry refusing new configs once `limit` distinct configs exist.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: RwLock::default(),
            limit: Some(limit),
        }
    }

    /// Whether any universe holds `config`.
    #[must_use]
    pub fn is_subscribed(&self, config: &SubscriptionConfig) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(config)
    }

    /// Number of distinct subscribed configs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubscriptionManager for SubscriptionRegistry {
    fn ensure_subscription(&self, request: &SubscriptionRequest) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.contains_key(&request.config)
            && self.limit.is_some_and(|limit| inner.len() >= limit)
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(symbol = %request.config.symbol, "subscription limit reached");
            return false;
        }
        inner
            .entry(request.config.clone())
            .or_default()
            .insert(request.universe.clone());
        true
    }

    fn remove_subscription(&self, config: &SubscriptionConfig, universe: Option<&Symbol>) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(universe) = universe else {
            return inner.remove(config).is_some();
        };
        let Some(holders) = inner.get_mut(config) else {
            return false;
        };
        let removed = holders.remove(&Some(universe.clone()));
        if holders.is_empty() {
            inner.remove(config);
        }
        removed
    }
}
