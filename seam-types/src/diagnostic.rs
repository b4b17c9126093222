use core::fmt;
use serde::{Deserialize, Serialize};

/// The five notification channels every backing source exposes.
///
/// Kinds map one-to-one with `Diagnostic` variants and give listeners a
/// stable key to register against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A subscription or request was configured in a way the source cannot serve.
    InvalidConfigurationDetected,
    /// Prices were truncated to the precision the source can represent.
    NumericalPrecisionLimited,
    /// The requested start date was moved forward to the earliest available data.
    StartDateLimited,
    /// A remote download did not complete.
    DownloadFailed,
    /// Local data could not be read or parsed.
    ReaderErrorDetected,
}

impl DiagnosticKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 5] = [
        Self::InvalidConfigurationDetected,
        Self::NumericalPrecisionLimited,
        Self::StartDateLimited,
        Self::DownloadFailed,
        Self::ReaderErrorDetected,
    ];

    /// Stable, kebab-case identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidConfigurationDetected => "invalid-configuration-detected",
            Self::NumericalPrecisionLimited => "numerical-precision-limited",
            Self::StartDateLimited => "start-date-limited",
            Self::DownloadFailed => "download-failed",
            Self::ReaderErrorDetected => "reader-error-detected",
        }
    }

    /// Position of this kind in [`DiagnosticKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific context attached to a diagnostic notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticContext {
    /// Name of the backing source that raised the notification.
    pub source: String,
    /// Symbol the notification refers to, when it concerns a single instrument.
    pub symbol: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl DiagnosticContext {
    /// Build a context without a symbol.
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            symbol: None,
            message: message.into(),
        }
    }

    /// Attach the symbol the notification is about.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// A structured diagnostic notification raised by a backing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// See [`DiagnosticKind::InvalidConfigurationDetected`].
    InvalidConfigurationDetected(DiagnosticContext),
    /// See [`DiagnosticKind::NumericalPrecisionLimited`].
    NumericalPrecisionLimited(DiagnosticContext),
    /// See [`DiagnosticKind::StartDateLimited`].
    StartDateLimited(DiagnosticContext),
    /// See [`DiagnosticKind::DownloadFailed`].
    DownloadFailed(DiagnosticContext),
    /// See [`DiagnosticKind::ReaderErrorDetected`].
    ReaderErrorDetected(DiagnosticContext),
}

impl Diagnostic {
    /// Build a notification of the given kind.
    #[must_use]
    pub fn new(kind: DiagnosticKind, context: DiagnosticContext) -> Self {
        match kind {
            DiagnosticKind::InvalidConfigurationDetected => {
                Self::InvalidConfigurationDetected(context)
            }
            DiagnosticKind::NumericalPrecisionLimited => Self::NumericalPrecisionLimited(context),
            DiagnosticKind::StartDateLimited => Self::StartDateLimited(context),
            DiagnosticKind::DownloadFailed => Self::DownloadFailed(context),
            DiagnosticKind::ReaderErrorDetected => Self::ReaderErrorDetected(context),
        }
    }

    /// The channel this notification belongs to.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        match self {
            Self::InvalidConfigurationDetected(_) => DiagnosticKind::InvalidConfigurationDetected,
            Self::NumericalPrecisionLimited(_) => DiagnosticKind::NumericalPrecisionLimited,
            Self::StartDateLimited(_) => DiagnosticKind::StartDateLimited,
            Self::DownloadFailed(_) => DiagnosticKind::DownloadFailed,
            Self::ReaderErrorDetected(_) => DiagnosticKind::ReaderErrorDetected,
        }
    }

    /// The attached context.
    #[must_use]
    pub const fn context(&self) -> &DiagnosticContext {
        match self {
            Self::InvalidConfigurationDetected(c)
            | Self::NumericalPrecisionLimited(c)
            | Self::StartDateLimited(c)
            | Self::DownloadFailed(c)
            | Self::ReaderErrorDetected(c) => c,
        }
    }
}
