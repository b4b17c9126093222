use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::StreamExt;
use futures::stream;
use seam_core::{
    BoundaryPolicy, BoundarySplitter, Clock, HistoryRequest, HistorySource, SeamError,
    SliceStream, SourceRole, SourceStream, merge,
};

use crate::Seam;

/// Sub-requests grouped by the source that serves them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutedRequests {
    /// Sub-requests strictly before the boundary, plus malformed requests.
    pub historical: Vec<HistoryRequest>,
    /// Sub-requests at or after the boundary.
    pub live: Vec<HistoryRequest>,
}

impl RoutedRequests {
    /// Split every request in `requests` and group the halves by destination.
    ///
    /// With [`BoundaryPolicy::PerBatch`] the clock is read once for the whole
    /// batch; with [`BoundaryPolicy::PerRequest`] it is read for each request.
    #[must_use]
    pub fn route(
        requests: &[HistoryRequest],
        splitter: &BoundarySplitter,
        clock: &dyn Clock,
        policy: BoundaryPolicy,
    ) -> Self {
        let batch_now = matches!(policy, BoundaryPolicy::PerBatch).then(|| clock.now());
        let mut routed = Self::default();
        for request in requests {
            let now: DateTime<Utc> = batch_now.unwrap_or_else(|| clock.now());
            let split = splitter.split(request, now);
            if split.is_unsplit() {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    symbol = %request.symbol(),
                    start = %request.start(),
                    end = %request.end(),
                    "malformed request sent to historical source unsplit"
                );
                routed.historical.push(request.clone());
                continue;
            }
            routed.historical.extend(split.before_today);
            routed.live.extend(split.today);
        }
        routed
    }

    /// True when no source needs to be called.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.historical.is_empty() && self.live.is_empty()
    }
}

impl Seam {
    /// The source serving `role`, if one is set.
    #[must_use]
    pub fn source(&self, role: SourceRole) -> Option<&Arc<dyn HistorySource>> {
        match role {
            SourceRole::Historical => Some(&self.historical),
            SourceRole::Live => self.live.as_ref(),
        }
    }

    /// Call the source serving `role` once with `requests`, skipping the call
    /// when there is nothing to ask for.
    fn dispatch(
        &self,
        role: SourceRole,
        requests: Vec<HistoryRequest>,
        output_tz: Tz,
    ) -> Option<SourceStream> {
        if requests.is_empty() {
            return None;
        }
        let source = self.source(role)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(role = %role, source = source.name(), requests = requests.len(), "dispatching sub-requests");
        source.history(requests, output_tz)
    }

    /// Retrieve history for a batch of requests as one strictly increasing stream.
    ///
    /// - `None` yields `Ok(None)`.
    /// - An empty batch yields an empty stream.
    /// - Otherwise every request is split at today's boundary, each source is
    ///   called at most once with all of its sub-requests, and the resulting
    ///   streams are merged. Nothing is fetched until the stream is polled.
    ///
    /// # Errors
    /// `NotInitialized` before [`Seam::initialize`] succeeded.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "seam::router::history",
            skip(self, requests),
            fields(requests = requests.as_ref().map_or(0, Vec::len), output_tz = %output_tz),
        )
    )]
    pub fn history(
        &self,
        requests: Option<Vec<HistoryRequest>>,
        output_tz: Tz,
    ) -> Result<Option<SliceStream>, SeamError> {
        self.lifecycle.ensure_ready()?;
        let Some(requests) = requests else {
            return Ok(None);
        };
        if requests.is_empty() {
            return Ok(Some(stream::empty().boxed()));
        }

        let routed = RoutedRequests::route(
            &requests,
            &self.splitter(),
            self.clock.as_ref(),
            self.cfg.boundary_policy,
        );
        let streams = [
            self.dispatch(SourceRole::Historical, routed.historical, output_tz),
            self.dispatch(SourceRole::Live, routed.live, output_tz),
        ];
        Ok(Some(merge(streams.into_iter().flatten()).boxed()))
    }
}
