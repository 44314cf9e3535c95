//! Decoding of the snapshot JSON document.
//!
//! The document is first split into raw records so that each record can be
//! decoded, validated and located in the source on its own. A broken record
//! is reported and skipped; decoding carries on with the next one.

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{error::Category, value::RawValue};

use swarmmap_core::topology::{ContainerRecord, HostRecord, NetworkRecord, Snapshot};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
};

#[derive(Deserialize)]
struct RawSnapshot<'a> {
    #[serde(borrow, default)]
    hosts: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    containers: Vec<&'a RawValue>,
    #[serde(borrow, default)]
    networks: Vec<&'a RawValue>,
}

/// Only the nested containers of a host, kept raw to locate them.
#[derive(Deserialize)]
struct RawHost<'a> {
    #[serde(borrow, default)]
    containers: Vec<&'a RawValue>,
}

/// Source locations of decoded records, keyed by record id.
#[derive(Debug, Default)]
pub(crate) struct SourceMap {
    spans: IndexMap<String, Span>,
}

impl SourceMap {
    pub(crate) fn span_of(&self, id: &str) -> Option<Span> {
        self.spans.get(id).copied()
    }
}

/// A decoded snapshot together with where its records came from.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) snapshot: Snapshot,
    pub(crate) source_map: SourceMap,
}

/// Decodes `source`, reporting problems to `collector`.
///
/// Returns `None` only when the document itself is unusable.
pub(crate) fn decode(source: &str, collector: &mut DiagnosticCollector) -> Option<Decoded> {
    let raw: RawSnapshot<'_> = match serde_json::from_str(source) {
        Ok(raw) => raw,
        Err(err) => {
            collector.emit(document_error(source, &err));
            return None;
        }
    };
    debug!(
        hosts = raw.hosts.len(),
        containers = raw.containers.len(),
        networks = raw.networks.len();
        "Snapshot document split into records"
    );

    let mut decoder = Decoder {
        source,
        collector,
        source_map: SourceMap::default(),
    };

    let hosts = raw
        .hosts
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| decoder.host(idx, raw))
        .collect();
    let containers = raw
        .containers
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| decoder.flat_container(idx, raw))
        .collect();
    let networks = raw
        .networks
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| decoder.network(idx, raw))
        .collect();

    let snapshot = Snapshot::from_parts(hosts, containers, networks);
    trace!(snapshot:?; "Decoded snapshot");

    Some(Decoded {
        snapshot,
        source_map: decoder.source_map,
    })
}

struct Decoder<'s, 'c> {
    source: &'s str,
    collector: &'c mut DiagnosticCollector,
    source_map: SourceMap,
}

impl Decoder<'_, '_> {
    fn host(&mut self, idx: usize, raw: &RawValue) -> Option<HostRecord> {
        let path = format!("hosts[{idx}]");
        let span = self.span_of(raw);
        let host: HostRecord = self.record(raw, &path, ErrorCode::E200, "host")?;

        let mut valid = self.identify(host.id(), &path, span, "host");
        let nested = serde_json::from_str::<RawHost<'_>>(raw.get())
            .map(|raw_host| raw_host.containers)
            .unwrap_or_default();
        for (container_idx, container) in host.containers().iter().enumerate() {
            let container_path = format!("{path}.containers[{container_idx}]");
            let container_span = nested
                .get(container_idx)
                .and_then(|raw| self.span_of(raw))
                .or(span);
            valid &= self.identify(container.id(), &container_path, container_span, "container");
        }

        valid.then_some(host)
    }

    fn flat_container(&mut self, idx: usize, raw: &RawValue) -> Option<ContainerRecord> {
        let path = format!("containers[{idx}]");
        let span = self.span_of(raw);
        let container: ContainerRecord = self.record(raw, &path, ErrorCode::E201, "container")?;

        let mut valid = self.identify(container.id(), &path, span, "container");
        if container.host_id().is_none_or(str::is_empty) {
            self.collector.emit(
                Diagnostic::error(format!("container `{}` has no host", container.id()))
                    .with_code(ErrorCode::E205)
                    .with_path(&path)
                    .with_optional_label(span, "flat containers need a `hostId`")
                    .with_help("add a `hostId` or move the container into its host's `containers`"),
            );
            valid = false;
        }

        valid.then_some(container)
    }

    fn network(&mut self, idx: usize, raw: &RawValue) -> Option<NetworkRecord> {
        let path = format!("networks[{idx}]");
        let span = self.span_of(raw);
        let network: NetworkRecord = self.record(raw, &path, ErrorCode::E202, "network")?;

        let mut valid = self.identify(network.id(), &path, span, "network");
        if network.name().is_empty() {
            self.collector.emit(
                Diagnostic::error(format!("network `{}` has an empty name", network.id()))
                    .with_code(ErrorCode::E203)
                    .with_path(format!("{path}.name"))
                    .with_optional_label(span, "name required"),
            );
            valid = false;
        }

        valid.then_some(network)
    }

    /// Decodes one record, reporting a decoding failure under `code`.
    fn record<T: DeserializeOwned>(
        &mut self,
        raw: &RawValue,
        path: &str,
        code: ErrorCode,
        kind: &str,
    ) -> Option<T> {
        match serde_json::from_str(raw.get()) {
            Ok(record) => Some(record),
            Err(err) => {
                let span = self.span_of(raw).map(|record_span| {
                    let inner = Span::at_line_column(raw.get(), err.line(), err.column());
                    Span::new(record_span.start() + inner.start()..record_span.start() + inner.end())
                });
                self.collector.emit(
                    Diagnostic::error(format!("malformed {kind} record: {}", describe(&err)))
                        .with_code(code)
                        .with_path(path)
                        .with_optional_label(span, "here"),
                );
                None
            }
        }
    }

    /// Registers an identifier; returns `false` if it is empty or taken.
    fn identify(&mut self, id: &str, path: &str, span: Option<Span>, kind: &str) -> bool {
        if id.is_empty() {
            self.collector.emit(
                Diagnostic::error(format!("{kind} has an empty identifier"))
                    .with_code(ErrorCode::E203)
                    .with_path(format!("{path}.id"))
                    .with_optional_label(span, "identifier required"),
            );
            return false;
        }

        if let Some(first) = self.source_map.spans.get(id).copied() {
            let mut diag = Diagnostic::error(format!("identifier `{id}` is used twice"))
                .with_code(ErrorCode::E204)
                .with_path(format!("{path}.id"))
                .with_optional_label(span, "duplicate here")
                .with_help("hosts, containers and networks share one identifier space");
            if !first.is_empty() {
                diag = diag.with_secondary_label(first, "first used here");
            }
            self.collector.emit(diag);
            return false;
        }

        self.source_map
            .spans
            .insert(id.to_string(), span.unwrap_or_default());
        true
    }

    fn span_of(&self, raw: &RawValue) -> Option<Span> {
        Span::of_slice(self.source, raw.get())
    }
}

/// Maps a document-level parse failure onto a diagnostic.
fn document_error(source: &str, err: &serde_json::Error) -> Diagnostic {
    let span = Span::at_line_column(source, err.line(), err.column());
    let (code, help) = match err.classify() {
        Category::Eof => (ErrorCode::E101, "the document ends too early"),
        Category::Data => (
            ErrorCode::E102,
            "a snapshot is an object with `hosts`, `containers` and `networks` arrays",
        ),
        Category::Syntax | Category::Io => (ErrorCode::E100, "check the JSON syntax"),
    };
    Diagnostic::error(describe(err))
        .with_code(code)
        .with_label(span, code.description())
        .with_help(help)
}

/// The message of a JSON error without its position suffix.
fn describe(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;

    fn decode_ok(source: &str) -> Decoded {
        let mut collector = DiagnosticCollector::new();
        let decoded = decode(source, &mut collector).expect("document decodes");
        collector.finish().expect("no errors");
        decoded
    }

    fn decode_err(source: &str) -> SnapshotError {
        let mut collector = DiagnosticCollector::new();
        let _ = decode(source, &mut collector);
        collector.finish().unwrap_err()
    }

    fn codes(err: &SnapshotError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_decodes_records_and_spans() {
        let source = r#"{
            "hosts": [{"id": "h1", "hostname": "a", "role": "manager",
                       "containers": [{"id": "c1", "serviceName": "web"}]}],
            "containers": [{"id": "c2", "serviceName": "db", "hostId": "h1"}],
            "networks": [{"id": "n1", "name": "frontend", "driver": "overlay"}]
        }"#;
        let decoded = decode_ok(source);

        assert_eq!(decoded.snapshot.hosts().len(), 1);
        assert_eq!(decoded.snapshot.containers().len(), 1);
        assert_eq!(decoded.snapshot.networks().len(), 1);

        let span = decoded.source_map.span_of("c1").expect("nested container located");
        assert_eq!(&source[span.range()], r#"{"id": "c1", "serviceName": "web"}"#);
        assert!(decoded.source_map.span_of("n1").is_some());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let decoded = decode_ok("{}");
        assert!(decoded.snapshot.is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let err = decode_err(r#"{"hosts": [,]}"#);
        assert_eq!(codes(&err), [ErrorCode::E100]);
        let labels = err.diagnostics()[0].labels();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].span().start() < 14);
    }

    #[test]
    fn test_truncated_document() {
        let err = decode_err(r#"{"hosts": ["#);
        assert_eq!(codes(&err), [ErrorCode::E101]);
    }

    #[test]
    fn test_wrong_document_shape() {
        let err = decode_err("[1, 2, 3]");
        assert_eq!(codes(&err), [ErrorCode::E102]);
    }

    #[test]
    fn test_reports_every_malformed_record() {
        let source = r#"{
            "hosts": [{"hostname": "no-id"}, {"id": ""}],
            "containers": [{"id": "c1", "serviceName": "web"}],
            "networks": [{"id": "n1", "name": ""}, {"id": "n2", "name": "x", "driver": 7}]
        }"#;
        let err = decode_err(source);

        assert_eq!(
            codes(&err),
            [
                ErrorCode::E200,
                ErrorCode::E203,
                ErrorCode::E205,
                ErrorCode::E203,
                ErrorCode::E202,
            ]
        );
        assert_eq!(err.diagnostics()[0].path(), Some("hosts[0]"));
        assert!(err.diagnostics()[0].message().contains("missing field `id`"));
    }

    #[test]
    fn test_duplicate_identifier_points_at_both_records() {
        let source = r#"{"hosts": [{"id": "x"}], "networks": [{"id": "x", "name": "n"}]}"#;
        let err = decode_err(source);

        assert_eq!(codes(&err), [ErrorCode::E204]);
        let labels = err.diagnostics()[0].labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(&source[labels[0].span().range()], r#"{"id": "x", "name": "n"}"#);
        assert_eq!(&source[labels[1].span().range()], r#"{"id": "x"}"#);
    }
}
