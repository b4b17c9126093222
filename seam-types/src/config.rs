//! Configuration types for the history facade.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// When the historical/live boundary is sampled from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BoundaryPolicy {
    /// Read the clock once per `history` call; every request in the batch is split
    /// against the same instant even if local midnight passes mid-batch.
    #[default]
    PerBatch,
    /// Read the clock again for every request in the batch.
    PerRequest,
}

/// Global configuration for the `Seam` facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeamConfig {
    /// How often the boundary instant is recomputed within a batch.
    pub boundary_policy: BoundaryPolicy,
    /// Time zone used for requests that carry no trading calendar.
    pub default_time_zone: Tz,
}

impl Default for SeamConfig {
    fn default() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::default(),
            default_time_zone: Tz::UTC,
        }
    }
}
