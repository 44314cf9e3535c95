//! Error adapter for converting SwarmMapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`swarmmap::snapshot::error::SnapshotError`] carries every problem found
//! in a snapshot; each diagnostic is rendered independently. Diagnostics
//! without a source location fall back to their JSON path in the help text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use swarmmap::{
    SwarmMapError,
    snapshot::{Span, error::Diagnostic},
};

/// Adapter for a single snapshot diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source text for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_error() {
            Some(miette::Severity::Error)
        } else {
            Some(miette::Severity::Warning)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match (self.diag.help(), self.diag.path()) {
            (Some(help), _) => Some(Box::new(help) as Box<dyn fmt::Display>),
            (None, Some(path)) if self.diag.labels().is_empty() => {
                Some(Box::new(format!("at {path}")) as Box<dyn fmt::Display>)
            }
            (None, _) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`SwarmMapError`] variants.
///
/// This adapter handles errors that don't carry source locations, such as
/// I/O errors, layout errors, configuration errors, and export errors.
pub struct ErrorAdapter<'a>(pub &'a SwarmMapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SwarmMapError::Io(_) => "swarmmap::io",
            SwarmMapError::Snapshot { .. } => return None,
            SwarmMapError::Layout(_) => "swarmmap::layout",
            SwarmMapError::Config(_) => "swarmmap::config",
            SwarmMapError::Export(_) => "swarmmap::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SwarmMapError::Config(_) => Some(Box::new(
                "pass a valid TOML file with --config or remove the local swarmmap/config.toml",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SwarmMapError`] into a list of reportable errors.
///
/// For [`SwarmMapError::Snapshot`], this returns one [`Reportable`] for
/// each diagnostic in the error, warnings included. For other error variants,
/// this returns a single [`Reportable`].
pub fn to_reportables(err: &SwarmMapError) -> Vec<Reportable<'_>> {
    match err {
        SwarmMapError::Snapshot { err, src } => err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render a reportable with miette's graphical handler.
///
/// Falls back to the plain message if the handler fails.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    if miette::GraphicalReportHandler::new()
        .render_report(&mut writer, reportable)
        .is_err()
    {
        writer = reportable.to_string();
    }
    writer
}

/// Wrap warnings of a successful parse for rendering.
pub fn warning_reportables<'a>(warnings: &'a [Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    warnings
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
        .collect()
}

#[cfg(test)]
mod tests {
    use swarmmap::{
        LayoutError,
        snapshot::error::{ErrorCode, SnapshotError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("duplicate identifier")
            .with_code(ErrorCode::E204)
            .with_label(Span::new(0..5), "here")
            .with_help("rename one of the records");
        let err = SwarmMapError::new_snapshot_error(SnapshotError::from(diag), "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "duplicate identifier");
                assert_eq!(d.code().map(|c| c.to_string()).as_deref(), Some("E204"));
                assert_eq!(
                    d.help().map(|h| h.to_string()).as_deref(),
                    Some("rename one of the records")
                );
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E203)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E205)
                .with_label(Span::new(10..15), "second"),
            Diagnostic::warning("a warning").with_code(ErrorCode::W304),
        ];
        let err = SwarmMapError::new_snapshot_error(
            SnapshotError::from(diags),
            "source code here...",
        );

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].severity(), Some(miette::Severity::Warning));
    }

    #[test]
    fn test_non_snapshot_error() {
        let err = SwarmMapError::Layout(LayoutError::InvalidConfig("layer_gap".to_string()));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Layout error: invalid layout configuration: layer_gap"
                );
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("swarmmap::layout")
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_path_used_as_help_without_labels() {
        let diag = Diagnostic::warning("dangling attachment")
            .with_code(ErrorCode::W304)
            .with_path("hosts[0].containers[1]");

        let adapter = DiagnosticAdapter::new(&diag, "{}");

        assert!(adapter.labels().is_none());
        assert_eq!(
            adapter.help().map(|h| h.to_string()).as_deref(),
            Some("at hosts[0].containers[1]")
        );
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("secondary"));
    }
}
