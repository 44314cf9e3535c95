//! Snapshot normalization.
//!
//! Rewrites a decoded snapshot into the shape the layout engine prefers:
//!
//! - flat containers are moved under their hosts,
//! - every gateway bridge the naming convention assigns to a host gets an
//!   explicit `hostId`.
//!
//! References the layout will drop are reported as warnings here, so the
//! user learns about them even though the layout itself stays silent.

use indexmap::IndexMap;
use log::debug;

use swarmmap_core::{
    gwbridge,
    identifier::Id,
    topology::{HostRecord, NetworkRecord, Snapshot},
};

use crate::{
    decode::SourceMap,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
};

/// Normalizes `snapshot`, reporting warnings to `collector`.
pub(crate) fn normalize(
    snapshot: Snapshot,
    source_map: &SourceMap,
    collector: &mut DiagnosticCollector,
) -> Snapshot {
    let (mut hosts, containers, mut networks) = snapshot.into_parts();

    let mut grouped = 0;
    for (idx, container) in containers.into_iter().enumerate() {
        let host_id = container.host_id().unwrap_or_default();
        match hosts.iter_mut().find(|host| host.id() == host_id) {
            Some(host) => {
                host.extend_containers([container]);
                grouped += 1;
            }
            None => collector.emit(
                Diagnostic::warning(format!(
                    "container `{}` names unknown host `{host_id}`",
                    container.id()
                ))
                .with_code(ErrorCode::W300)
                .with_path(format!("containers[{idx}].hostId"))
                .with_optional_label(source_map.span_of(container.id()), "dropped from the layout"),
            ),
        }
    }
    debug!(grouped; "Flat containers grouped");

    report_singular_networks(&networks, source_map, collector);
    assign_gwbridges(&hosts, &mut networks, source_map, collector);
    report_dangling_attachments(&hosts, &networks, source_map, collector);
    report_network_metadata(&hosts, &networks, source_map, collector);

    Snapshot::from_parts(hosts, Vec::new(), networks)
}

fn report_singular_networks(
    networks: &[NetworkRecord],
    source_map: &SourceMap,
    collector: &mut DiagnosticCollector,
) {
    let mut ingress: Option<&NetworkRecord> = None;
    let mut external: Option<&NetworkRecord> = None;

    for (idx, network) in networks.iter().enumerate() {
        let (slot, kind) = if network.is_ingress() {
            (&mut ingress, "ingress")
        } else if network.is_external() && !network.is_overlay() {
            (&mut external, "external")
        } else {
            continue;
        };

        if let Some(kept) = *slot {
            collector.emit(
                Diagnostic::warning(format!(
                    "{kind} network `{}` ignored, `{}` is already placed",
                    network.id(),
                    kept.id()
                ))
                .with_code(ErrorCode::W307)
                .with_path(format!("networks[{idx}]"))
                .with_optional_label(source_map.span_of(network.id()), "not placed"),
            );
        } else {
            *slot = Some(network);
        }
    }
}

fn assign_gwbridges(
    hosts: &[HostRecord],
    networks: &mut [NetworkRecord],
    source_map: &SourceMap,
    collector: &mut DiagnosticCollector,
) {
    let mut claims: IndexMap<String, String> = IndexMap::new();

    for (idx, network) in networks.iter_mut().enumerate() {
        if !network.driver().is_bridge_like() || network.is_ingress() || network.is_external() {
            continue;
        }
        let span = source_map.span_of(network.id());

        let unknown_host = network
            .host_id()
            .filter(|host_id| !hosts.iter().any(|host| host.id() == *host_id));
        if let Some(host_id) = unknown_host {
            collector.emit(
                Diagnostic::warning(format!(
                    "gateway bridge `{}` names unknown host `{host_id}`",
                    network.id()
                ))
                .with_code(ErrorCode::W303)
                .with_path(format!("networks[{idx}].hostId"))
                .with_optional_label(span, "not placed"),
            );
            continue;
        }

        let explicit = network.host_id().is_some();
        let Some(owner) = gwbridge::owner_of(network, hosts) else {
            continue;
        };
        let owner_id = hosts[owner].id();

        if !explicit {
            let network_id = Id::new(network.id());
            let matches: Vec<&str> = hosts
                .iter()
                .map(HostRecord::id)
                .filter(|host_id| network_id.contains(Id::new(host_id)))
                .collect();
            if matches.len() > 1 {
                collector.emit(
                    Diagnostic::warning(format!(
                        "gateway bridge `{}` matches hosts {}",
                        network.id(),
                        matches
                            .iter()
                            .map(|id| format!("`{id}`"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                    .with_code(ErrorCode::W301)
                    .with_path(format!("networks[{idx}].id"))
                    .with_optional_label(span, format!("assigned to `{owner_id}`"))
                    .with_help("set `hostId` on the network to choose the host explicitly"),
                );
            }
            network.set_host_id(owner_id);
        }

        if let Some(kept) = claims.get(owner_id) {
            collector.emit(
                Diagnostic::warning(format!(
                    "host `{owner_id}` already has gateway bridge `{kept}`, `{}` is ignored",
                    network.id()
                ))
                .with_code(ErrorCode::W302)
                .with_path(format!("networks[{idx}]"))
                .with_optional_label(span, "not placed"),
            );
        } else {
            claims.insert(owner_id.to_string(), network.id().to_string());
        }
    }

    debug!(assigned = claims.len(); "Gateway bridges assigned");
}

fn report_dangling_attachments(
    hosts: &[HostRecord],
    networks: &[NetworkRecord],
    source_map: &SourceMap,
    collector: &mut DiagnosticCollector,
) {
    for (host_idx, host) in hosts.iter().enumerate() {
        for (container_idx, container) in host.containers().iter().enumerate() {
            for (idx, attachment) in container.network_attachments().iter().enumerate() {
                let reference = attachment.network_ref();
                if networks.iter().any(|network| network.is_referenced_by(reference)) {
                    continue;
                }
                collector.emit(
                    Diagnostic::warning(format!(
                        "container `{}` attaches to unknown network `{reference}`",
                        container.id()
                    ))
                    .with_code(ErrorCode::W304)
                    .with_path(format!(
                        "hosts[{host_idx}].containers[{container_idx}].networkAttachments[{idx}]"
                    ))
                    .with_optional_label(source_map.span_of(container.id()), "attachment ignored"),
                );
            }
        }
    }
}

fn report_network_metadata(
    hosts: &[HostRecord],
    networks: &[NetworkRecord],
    source_map: &SourceMap,
    collector: &mut DiagnosticCollector,
) {
    for (idx, network) in networks.iter().enumerate() {
        let span = source_map.span_of(network.id());

        for (handle_idx, host_id) in network.host_handles().iter().enumerate() {
            if hosts.iter().any(|host| host.id() == host_id) {
                continue;
            }
            collector.emit(
                Diagnostic::warning(format!(
                    "network `{}` links to unknown host `{host_id}`",
                    network.id()
                ))
                .with_code(ErrorCode::W305)
                .with_path(format!("networks[{idx}].hostHandles[{handle_idx}]"))
                .with_optional_label(span, "link ignored"),
            );
        }

        let out_of_range = network
            .ingress_handle()
            .filter(|offset| !(0.0..=1.0).contains(offset));
        if let Some(offset) = out_of_range {
            collector.emit(
                Diagnostic::warning(format!(
                    "ingress handle {offset} of `{}` is outside [0, 1]",
                    network.id()
                ))
                .with_code(ErrorCode::W306)
                .with_path(format!("networks[{idx}].ingressHandle"))
                .with_optional_label(span, "clamped")
                .with_help("offsets are fractions of the gateway bridge width"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use swarmmap_core::topology::{
        ContainerRecord, HostRole, NetworkAttachment, NetworkDriver, NetworkType,
    };

    use super::*;

    fn run(snapshot: Snapshot) -> (Snapshot, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let snapshot = normalize(snapshot, &SourceMap::default(), &mut collector);
        let warnings = collector.finish().expect("normalization never errors");
        (snapshot, warnings)
    }

    fn codes(warnings: &[Diagnostic]) -> Vec<ErrorCode> {
        warnings.iter().filter_map(Diagnostic::code).collect()
    }

    fn host(id: &str) -> HostRecord {
        HostRecord::new(id, id, HostRole::Worker)
    }

    #[test]
    fn test_groups_flat_containers() {
        let snapshot = Snapshot::default()
            .with_host(host("h1").with_container(ContainerRecord::new("c1", "web")))
            .with_container(ContainerRecord::new("c2", "web").with_host_id("h1"))
            .with_container(ContainerRecord::new("c3", "web").with_host_id("ghost"));
        let (snapshot, warnings) = run(snapshot);

        assert!(snapshot.containers().is_empty());
        let ids: Vec<&str> = snapshot.hosts()[0]
            .containers()
            .iter()
            .map(ContainerRecord::id)
            .collect();
        assert_eq!(ids, ["c1", "c2"]);
        assert_eq!(codes(&warnings), [ErrorCode::W300]);
    }

    #[test]
    fn test_assigns_gwbridge_host_ids() {
        let snapshot = Snapshot::default()
            .with_host(host("node-1"))
            .with_host(host("node-10"))
            .with_network(NetworkRecord::new("gwbridge-node-10", "docker_gwbridge", NetworkDriver::Bridge))
            .with_network(NetworkRecord::new("overlay-node-1", "frontend", NetworkDriver::Overlay));
        let (snapshot, warnings) = run(snapshot);

        assert_eq!(snapshot.networks()[0].host_id(), Some("node-10"));
        assert_eq!(snapshot.networks()[1].host_id(), None);
        assert_eq!(codes(&warnings), [ErrorCode::W301]);
        assert!(warnings[0].message().contains("`node-1`, `node-10`"));
    }

    #[test]
    fn test_explicit_host_id_wins_and_is_checked() {
        let snapshot = Snapshot::default()
            .with_host(host("h1"))
            .with_host(host("h2"))
            .with_network(
                NetworkRecord::new("gw-h1", "docker_gwbridge", NetworkDriver::Bridge).with_host_id("h2"),
            )
            .with_network(
                NetworkRecord::new("gw-x", "docker_gwbridge", NetworkDriver::Bridge).with_host_id("h9"),
            );
        let (snapshot, warnings) = run(snapshot);

        assert_eq!(snapshot.networks()[0].host_id(), Some("h2"));
        assert_eq!(codes(&warnings), [ErrorCode::W303]);
    }

    #[test]
    fn test_reports_second_gwbridge_of_a_host() {
        let snapshot = Snapshot::default()
            .with_host(host("h1"))
            .with_network(NetworkRecord::new("gw-h1", "docker_gwbridge", NetworkDriver::Bridge))
            .with_network(NetworkRecord::new("gw-h1-old", "docker_gwbridge", NetworkDriver::Gwbridge));
        let (_, warnings) = run(snapshot);

        assert_eq!(codes(&warnings), [ErrorCode::W302]);
    }

    #[test]
    fn test_reports_dangling_references() {
        let snapshot = Snapshot::default()
            .with_host(
                host("h1").with_container(
                    ContainerRecord::new("c1", "web")
                        .with_attachment(NetworkAttachment::new("frontend", NetworkDriver::Overlay))
                        .with_attachment(NetworkAttachment::new("nowhere", NetworkDriver::Overlay)),
                ),
            )
            .with_network(
                NetworkRecord::new("o1", "frontend", NetworkDriver::Overlay)
                    .with_host_handle("h1")
                    .with_host_handle("h7"),
            );
        let (_, warnings) = run(snapshot);

        assert_eq!(codes(&warnings), [ErrorCode::W304, ErrorCode::W305]);
        assert_eq!(
            warnings[0].path(),
            Some("hosts[0].containers[0].networkAttachments[1]")
        );
    }

    #[test]
    fn test_reports_extra_singular_networks_and_bad_ingress_handle() {
        let snapshot = Snapshot::default()
            .with_host(host("h1"))
            .with_network(NetworkRecord::new("i1", "ingress", NetworkDriver::Overlay))
            .with_network(NetworkRecord::new("i2", "ingress", NetworkDriver::Overlay))
            .with_network(
                NetworkRecord::new("e1", "uplink", NetworkDriver::Host).with_type(NetworkType::External),
            )
            .with_network(
                NetworkRecord::new("e2", "uplink", NetworkDriver::Host).with_type(NetworkType::External),
            )
            .with_network(
                NetworkRecord::new("gw-h1", "docker_gwbridge", NetworkDriver::Bridge).with_ingress_handle(1.5),
            );
        let (_, warnings) = run(snapshot);

        assert_eq!(
            codes(&warnings),
            [ErrorCode::W307, ErrorCode::W307, ErrorCode::W306]
        );
    }
}
