//! Diagnostics for snapshot ingestion.
//!
//! Ingestion never stops at the first problem. Every malformed record and
//! every suspicious reference is reported as a [`Diagnostic`] carrying a
//! [`Severity`], an [`ErrorCode`], the JSON path of the offending value and,
//! when known, its [`Span`](crate::Span) in the source text. Errors are
//! returned together as a [`SnapshotError`]; warnings accompany a successful
//! parse.
//!
//! # Example
//!
//! ```
//! # use swarmmap_snapshot::error::{Diagnostic, ErrorCode};
//! # use swarmmap_snapshot::Span;
//!
//! let diag = Diagnostic::error("identifier `node-1` is used twice")
//!     .with_code(ErrorCode::E204)
//!     .with_path("hosts[1].id")
//!     .with_label(Span::new(120..160), "duplicate here")
//!     .with_secondary_label(Span::new(10..50), "first used here")
//!     .with_help("every host, container and network needs its own id");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;
mod snapshot_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
pub use snapshot_error::SnapshotError;
