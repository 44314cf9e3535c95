//! End-to-end layout scenarios with the default configuration.

use float_cmp::assert_approx_eq;

use swarmmap::{
    EdgeKind, EdgeRule, EntityKind, HandleSide, Layer, LayoutError, RecordKind,
    config::LayoutConfig,
    layout::layout,
    stroke::StrokeStyle,
    topology::{
        ContainerRecord, HostRecord, HostRole, NetworkAttachment, NetworkDriver, NetworkRecord,
        Snapshot,
    },
};

fn overlay_attachment(network: &str) -> NetworkAttachment {
    NetworkAttachment::new(network, NetworkDriver::Overlay)
}

#[test]
fn test_single_empty_host() {
    let snapshot = Snapshot::default().with_host(HostRecord::new("h1", "manager-1", HostRole::Manager));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    assert_eq!(result.entities().len(), 1);
    assert!(result.edges().is_empty());

    let host = result.entity("h1").expect("host placed");
    assert_eq!(host.kind(), EntityKind::Host);
    assert_approx_eq!(f32, host.x(), 0.0);
    assert_approx_eq!(f32, host.y(), 0.0);
    assert_approx_eq!(f32, host.width(), 220.0);
    assert_approx_eq!(f32, host.height(), 56.0);
    assert_approx_eq!(f32, result.total_width(), 220.0);
    assert_approx_eq!(f32, result.total_height(), 56.0);
}

#[test]
fn test_host_with_three_containers_and_gwbridge() {
    let snapshot = Snapshot::default()
        .with_host(
            HostRecord::new("node-1", "worker-1", HostRole::Worker)
                .with_container(ContainerRecord::new("web.1", "web"))
                .with_container(ContainerRecord::new("web.2", "web"))
                .with_container(ContainerRecord::new("db.1", "db")),
        )
        .with_network(NetworkRecord::new(
            "gwbridge-node-1",
            "docker_gwbridge",
            NetworkDriver::Bridge,
        ));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    // 3 * 140 + 2 * 16
    let host = result.entity("node-1").expect("host placed");
    assert_approx_eq!(f32, host.width(), 452.0);
    assert_approx_eq!(f32, host.y(), 204.0);

    let xs: Vec<f32> = ["web.1", "web.2", "db.1"]
        .iter()
        .map(|id| result.entity(*id).expect("container placed").x())
        .collect();
    assert_approx_eq!(f32, xs[0], 0.0);
    assert_approx_eq!(f32, xs[1], 156.0);
    assert_approx_eq!(f32, xs[2], 312.0);

    let gwbridge = result.entity("gwbridge-node-1").expect("gwbridge placed");
    assert_eq!(gwbridge.layer(), Layer::Gwbridge);
    assert_approx_eq!(f32, gwbridge.x(), host.x());
    assert_approx_eq!(f32, gwbridge.width(), host.width());
    assert_approx_eq!(f32, gwbridge.y(), 120.0);

    let edges = result.edges();
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[0].rule(), EdgeRule::HostGwbridge);
    assert_eq!(edges[0].kind(), EdgeKind::Default);
    assert_approx_eq!(f32, edges[0].target_handle().expect("center").offset(), 0.5);

    let offsets: Vec<f32> = edges[1..]
        .iter()
        .map(|edge| {
            assert_eq!(edge.kind(), EdgeKind::Vxlan);
            assert_eq!(edge.label(), Some("VXLAN"));
            assert_eq!(edge.stroke(), StrokeStyle::Dashed);
            edge.target_handle().expect("per-container handle").offset()
        })
        .collect();
    assert_approx_eq!(f32, offsets[0], 70.0 / 452.0);
    assert_approx_eq!(f32, offsets[1], 0.5);
    assert_approx_eq!(f32, offsets[2], 382.0 / 452.0);
}

#[test]
fn test_two_hosts_sharing_an_overlay() {
    let snapshot = Snapshot::default()
        .with_host(
            HostRecord::new("h1", "a", HostRole::Manager)
                .with_container(ContainerRecord::new("c1", "web").with_attachment(overlay_attachment("frontend"))),
        )
        .with_host(
            HostRecord::new("h2", "b", HostRole::Worker)
                .with_container(ContainerRecord::new("c2", "web").with_attachment(overlay_attachment("net-1"))),
        )
        .with_network(NetworkRecord::new("net-1", "frontend", NetworkDriver::Overlay));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    assert_approx_eq!(f32, result.total_width(), 488.0);

    let overlay = result.entity("net-1").expect("overlay placed");
    assert_eq!(overlay.layer(), Layer::Overlay);
    assert_approx_eq!(f32, overlay.x(), 0.0);
    assert_approx_eq!(f32, overlay.width(), 488.0);
    assert!(overlay.y() < result.entity("c1").expect("placed").y());

    let edges = result.edges();
    assert_eq!(edges.len(), 2);
    for (edge, (container, center)) in edges.iter().zip([("c1", 110.0), ("c2", 378.0)]) {
        assert_eq!(edge.rule(), EdgeRule::OverlayContainer);
        assert_eq!(edge.kind(), EdgeKind::Ingress);
        assert_eq!(edge.source().to_string(), "net-1");
        assert_eq!(edge.target().to_string(), container);

        let source = edge.source_handle().expect("overlay handle");
        assert_approx_eq!(f32, source.offset(), center / 488.0);
        assert_eq!(source.side(), HandleSide::Bottom);

        let target = edge.target_handle().expect("container handle");
        assert_approx_eq!(f32, target.offset(), 0.5);
        assert_eq!(target.side(), HandleSide::Top);
    }
}

#[test]
fn test_dangling_attachment_is_dropped() {
    let snapshot = Snapshot::default()
        .with_host(
            HostRecord::new("h1", "a", HostRole::Worker)
                .with_container(ContainerRecord::new("c1", "web").with_attachment(overlay_attachment("missing"))),
        )
        .with_network(NetworkRecord::new("net-1", "frontend", NetworkDriver::Overlay));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    assert!(result.entity("c1").is_some());
    assert!(result.entity("net-1").is_some());
    assert!(result.edges().is_empty());
}

#[test]
fn test_ingress_without_handle_metadata() {
    let snapshot = Snapshot::default()
        .with_host(HostRecord::new("h1", "a", HostRole::Worker))
        .with_network(NetworkRecord::new("ingress-id", "ingress", NetworkDriver::Overlay))
        .with_network(NetworkRecord::new("gwbridge-h1", "docker_gwbridge", NetworkDriver::Bridge));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    let ingress = result.entity("ingress-id").expect("ingress placed");
    assert_eq!(ingress.layer(), Layer::Ingress);
    assert!(
        result
            .edges()
            .iter()
            .all(|edge| edge.rule() != EdgeRule::GwbridgeIngress)
    );
    assert_eq!(result.edges().len(), 1);
}

#[test]
fn test_ingress_with_handle_metadata() {
    let snapshot = Snapshot::default()
        .with_host(HostRecord::new("h1", "a", HostRole::Worker))
        .with_network(NetworkRecord::new("ingress-id", "ingress", NetworkDriver::Overlay))
        .with_network(
            NetworkRecord::new("gwbridge-h1", "docker_gwbridge", NetworkDriver::Bridge)
                .with_ingress_handle(0.8),
        );
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    let edge = result
        .edges()
        .iter()
        .find(|edge| edge.rule() == EdgeRule::GwbridgeIngress)
        .expect("ingress edge");
    assert_eq!(edge.id(), "gwbridge-ingress:gwbridge-h1->ingress-id");
    assert_eq!(edge.kind(), EdgeKind::Ingress);
    assert_approx_eq!(f32, edge.source_handle().expect("declared").offset(), 0.8);
    assert_approx_eq!(f32, edge.target_handle().expect("ingress side").offset(), 0.5);
}

#[test]
fn test_zero_hosts_yield_empty_result() {
    let snapshot = Snapshot::default()
        .with_network(NetworkRecord::new("ingress-id", "ingress", NetworkDriver::Overlay));
    let result = layout(&snapshot, &LayoutConfig::default()).expect("Failed to lay out");

    assert!(result.is_empty());
    assert!(result.edges().is_empty());
    assert_approx_eq!(f32, result.total_width(), 0.0);
}

#[test]
fn test_malformed_record_fails_whole_call() {
    let snapshot = Snapshot::default()
        .with_host(HostRecord::new("h1", "a", HostRole::Worker))
        .with_container(ContainerRecord::new("orphan", "web"));
    let err = layout(&snapshot, &LayoutConfig::default()).unwrap_err();

    match err {
        LayoutError::MalformedRecord { kind, record, .. } => {
            assert_eq!(kind, RecordKind::Container);
            assert_eq!(record, "orphan");
        }
        other => panic!("Expected malformed record, got {other:?}"),
    }
}
