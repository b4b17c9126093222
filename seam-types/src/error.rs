use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the seam workspace.
///
/// Two classes of failure exist. Configuration errors come from misusing the
/// facade lifecycle and must abort setup. Everything else describes a problem
/// with an argument or with a backing source. Per-item data problems are never
/// surfaced here; they travel through the diagnostic channel instead.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SeamError {
    /// `initialize` was called on a facade that is already initialized.
    #[error("configuration error: history facade already initialized")]
    AlreadyInitialized,

    /// `initialize` was called before the live source was provided.
    #[error("configuration error: live source must be set before initialization")]
    MissingLiveSource,

    /// The live source was replaced after initialization.
    #[error("configuration error: live source cannot change after initialization")]
    LiveSourceLocked,

    /// History was requested before `initialize` completed.
    #[error("configuration error: history facade used before initialization")]
    NotInitialized,

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A backing source returned an error.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Name of the backing source that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl SeamError {
    /// Helper: build a `Source` error with the source name and message.
    pub fn source_failed(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true for lifecycle misuse that must abort setup.
    ///
    /// These are never retried and never reported as data errors.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInitialized
                | Self::MissingLiveSource
                | Self::LiveSourceLocked
                | Self::NotInitialized
        )
    }
}
