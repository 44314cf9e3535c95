//! Integration tests for the TopologyBuilder API

use float_cmp::assert_approx_eq;

use swarmmap::{
    SwarmMapError, TopologyBuilder,
    config::{AppConfig, LayoutConfig},
    snapshot::error::ErrorCode,
};

const SOURCE: &str = r#"{
    "hosts": [
        { "id": "node-1", "hostname": "manager-1", "role": "manager" },
        { "id": "node-2", "hostname": "worker-1", "role": "worker" }
    ],
    "containers": [
        { "id": "web.1", "serviceName": "web", "hostId": "node-1",
          "networkAttachments": [{ "networkRef": "frontend", "driver": "overlay" }] },
        { "id": "web.2", "serviceName": "web", "hostId": "node-2",
          "networkAttachments": [{ "networkRef": "frontend", "driver": "overlay" }] }
    ],
    "networks": [
        { "id": "frontend-id", "name": "frontend", "driver": "overlay" },
        { "id": "gwbridge-node-1", "name": "docker_gwbridge", "driver": "bridge" }
    ]
}"#;

#[test]
fn test_builder_api_exists() {
    let _builder = TopologyBuilder::default();
}

#[test]
fn test_parse_and_layout() {
    let builder = TopologyBuilder::default();
    let snapshot = builder.parse(SOURCE).expect("Failed to parse snapshot");
    let layout = builder.layout(&snapshot).expect("Failed to lay out");

    assert_eq!(layout.entities().len(), 6);
    assert!(layout.entity("gwbridge-node-1").is_some());
    assert!(layout.total_width() > 0.0);
    assert!(layout.total_height() > 0.0);
}

#[test]
fn test_render_json_document() {
    let builder = TopologyBuilder::default();
    let snapshot = builder.parse(SOURCE).expect("Failed to parse snapshot");
    let json = builder.render_json(&snapshot, false).expect("Failed to export");

    let document: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    let entities = document["entities"].as_array().expect("entities array");
    assert_eq!(entities[0]["id"], "node-1");
    assert_eq!(entities[0]["kind"], "host");
    assert_eq!(entities[1]["kind"], "container");
    assert_eq!(entities[1]["host"], "node-1");
    assert_eq!(entities[1]["ref"]["serviceName"], "web");
    assert!(document["totalWidth"].as_f64().expect("width") > 0.0);

    let edges = document["edges"].as_array().expect("edges array");
    assert!(edges.iter().any(|edge| edge["label"] == "VXLAN"));
}

#[test]
fn test_pretty_json_spans_lines() {
    let builder = TopologyBuilder::default();
    let snapshot = builder.parse(SOURCE).expect("Failed to parse snapshot");

    let compact = builder.render_json(&snapshot, false).expect("Failed to export");
    let pretty = builder.render_json(&snapshot, true).expect("Failed to export");
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
}

#[test]
fn test_parse_error_keeps_source() {
    let builder = TopologyBuilder::default();
    let source = r#"{ "hosts": [{ "id": "" }] }"#;

    match builder.parse(source) {
        Err(SwarmMapError::Snapshot { err, src }) => {
            assert_eq!(src, source);
            assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E203));
        }
        other => panic!("Expected snapshot error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_is_reported() {
    let config = AppConfig::new(LayoutConfig::default().with_layer_gap(-5.0));
    let builder = TopologyBuilder::new(config);
    let snapshot = builder.parse(SOURCE).expect("Failed to parse snapshot");

    let err = builder.layout(&snapshot).unwrap_err();
    assert!(matches!(err, SwarmMapError::Layout(_)));
    assert!(err.to_string().contains("layer_gap"));
}

#[test]
fn test_builder_with_config() {
    let config = AppConfig::new(LayoutConfig::default().with_min_host_width(400.0));
    let builder = TopologyBuilder::new(config);
    let snapshot = builder.parse(SOURCE).expect("Failed to parse snapshot");
    let layout = builder.layout(&snapshot).expect("Failed to lay out");

    let host = layout.entity("node-2").expect("host placed");
    assert_approx_eq!(f32, host.width(), 400.0);
}
