use async_trait::async_trait;
use chrono_tz::Tz;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticHub;
use crate::request::HistoryRequest;
use crate::slice::DataSlice;
use crate::types::SeamError;

/// Output of a backing source: non-decreasing by instant, single pass.
///
/// A `None` item is a produced-but-empty placeholder (for example a file that
/// could not be read); consumers skip it.
pub type SourceStream = BoxStream<'static, Option<DataSlice>>;

/// Merged output handed to callers: strictly increasing by instant.
pub type SliceStream = BoxStream<'static, DataSlice>;

/// Parameters handed to every backing source when the facade initializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeParams {
    /// Identifier of the job or session the facade serves; used in logs only.
    pub job_id: Option<String>,
    /// Whether sources may serve several sub-requests concurrently.
    pub parallel_requests: bool,
}

/// A backing history source the facade routes sub-requests to.
///
/// Implementations must be lazy: calling [`HistorySource::history`] only
/// describes the retrieval, and nothing is fetched until the returned stream is
/// polled. Per-item failures are reported through [`HistorySource::diagnostics`]
/// and never end the stream early.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// A stable identifier used in logs and error tagging.
    fn name(&self) -> &'static str;

    /// Prepare the source for use. The facade calls this after diagnostic
    /// wiring is in place and at most once per source once it has succeeded;
    /// a failed call may be attempted again.
    async fn initialize(&self, params: &InitializeParams) -> Result<(), SeamError>;

    /// Describe the retrieval of all `requests` as one time-ordered stream.
    ///
    /// Returns `None` when the source has nothing to offer for the batch.
    fn history(&self, requests: Vec<HistoryRequest>, output_tz: Tz) -> Option<SourceStream>;

    /// The source's notification channels.
    fn diagnostics(&self) -> &DiagnosticHub;

    /// Number of data points produced so far.
    fn data_point_count(&self) -> u64 {
        0
    }
}
