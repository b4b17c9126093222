//! Seam-specific data transfer objects and configuration primitives shared by every layer.
#![warn(missing_docs)]

mod config;
mod diagnostic;
mod error;
mod role;

pub use config::{BoundaryPolicy, SeamConfig};
pub use diagnostic::{Diagnostic, DiagnosticContext, DiagnosticKind};
pub use error::SeamError;
pub use role::SourceRole;
