//! Reconciliation of a snapshot into a layout-ready view.
//!
//! A [`Snapshot`] carries three independently sourced collections. This module
//! validates the identity of every record, groups containers under their hosts,
//! classifies networks into their layers and resolves each host's gateway
//! bridge. Dangling references are dropped here and logged; missing identity
//! is fatal.

use std::collections::{HashMap, HashSet};

use log::debug;

use swarmmap_core::{
    gwbridge,
    identifier::Id,
    topology::{ContainerRecord, HostRecord, NetworkRecord, Snapshot},
};

use crate::error::{LayoutError, RecordKind};

/// A host together with everything placed relative to it.
#[derive(Debug)]
pub struct HostView<'a> {
    id: Id,
    record: &'a HostRecord,
    containers: Vec<&'a ContainerRecord>,
    gwbridge: Option<&'a NetworkRecord>,
}

impl<'a> HostView<'a> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn record(&self) -> &'a HostRecord {
        self.record
    }

    /// Embedded containers first, then flat containers in snapshot order.
    pub fn containers(&self) -> &[&'a ContainerRecord] {
        &self.containers
    }

    pub fn gwbridge(&self) -> Option<&'a NetworkRecord> {
        self.gwbridge
    }
}

/// The snapshot, reconciled.
#[derive(Debug)]
pub struct ClusterView<'a> {
    hosts: Vec<HostView<'a>>,
    networks: &'a [NetworkRecord],
    ingress: Option<&'a NetworkRecord>,
    overlays: Vec<&'a NetworkRecord>,
    external: Option<&'a NetworkRecord>,
}

impl<'a> ClusterView<'a> {
    /// Validates and reconciles `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRecord`] if any record lacks an
    /// identifier, a flat container has no host reference, or an identifier is
    /// used twice.
    pub fn build(snapshot: &'a Snapshot) -> Result<Self, LayoutError> {
        validate(snapshot)?;

        let hosts = snapshot.hosts();
        let networks = snapshot.networks();

        let mut grouped: Vec<Vec<&'a ContainerRecord>> = hosts
            .iter()
            .map(|host| host.containers().iter().collect())
            .collect();
        let host_index: HashMap<&str, usize> = hosts
            .iter()
            .enumerate()
            .map(|(idx, host)| (host.id(), idx))
            .collect();
        for container in snapshot.containers() {
            let owner = container
                .host_id()
                .and_then(|host_id| host_index.get(host_id));
            match owner {
                Some(&idx) => grouped[idx].push(container),
                None => debug!(
                    container = container.id(),
                    host_id:? = container.host_id();
                    "Skipping container of unknown host"
                ),
            }
        }

        let mut ingress = None;
        let mut overlays = Vec::new();
        let mut external = None;
        for network in networks {
            if network.is_ingress() {
                if ingress.is_none() {
                    ingress = Some(network);
                } else {
                    debug!(network = network.id(); "Skipping additional ingress network");
                }
            } else if network.is_overlay() {
                overlays.push(network);
            } else if network.is_external() {
                if external.is_none() {
                    external = Some(network);
                } else {
                    debug!(network = network.id(); "Skipping additional external network");
                }
            }
        }

        let candidates = networks
            .iter()
            .filter(|network| !network.is_ingress() && !network.is_external());
        let gwbridges = gwbridge::resolve(hosts, candidates);

        let hosts = hosts
            .iter()
            .zip(grouped)
            .zip(gwbridges)
            .map(|((record, containers), gwbridge)| HostView {
                id: Id::new(record.id()),
                record,
                containers,
                gwbridge,
            })
            .collect();

        Ok(Self {
            hosts,
            networks,
            ingress,
            overlays,
            external,
        })
    }

    pub fn hosts(&self) -> &[HostView<'a>] {
        &self.hosts
    }

    pub fn ingress(&self) -> Option<&'a NetworkRecord> {
        self.ingress
    }

    /// User overlay networks in snapshot order.
    pub fn overlays(&self) -> &[&'a NetworkRecord] {
        &self.overlays
    }

    pub fn external(&self) -> Option<&'a NetworkRecord> {
        self.external
    }

    /// Looks a network up by id, falling back to its name.
    pub fn resolve_network(&self, reference: &str) -> Option<&'a NetworkRecord> {
        self.networks
            .iter()
            .find(|network| network.id() == reference)
            .or_else(|| self.networks.iter().find(|network| network.name() == reference))
    }

    /// The distinct overlay networks `container` attaches to, in attachment order.
    ///
    /// Attachments naming no network, or a network outside the overlay layer,
    /// are dropped.
    pub fn container_overlays(&self, container: &ContainerRecord) -> Vec<&'a NetworkRecord> {
        let mut overlays: Vec<&'a NetworkRecord> = Vec::new();
        for attachment in container.network_attachments() {
            match self.resolve_network(attachment.network_ref()) {
                Some(network) if network.is_overlay() => {
                    if !overlays.iter().any(|seen| seen.id() == network.id()) {
                        overlays.push(network);
                    }
                }
                Some(_) => {}
                None => debug!(
                    container = container.id(),
                    network_ref = attachment.network_ref();
                    "Dropping attachment to unknown network"
                ),
            }
        }
        overlays
    }
}

/// Rejects records that cannot be given a stable identity.
fn validate(snapshot: &Snapshot) -> Result<(), LayoutError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, host) in snapshot.hosts().iter().enumerate() {
        if host.id().is_empty() {
            return Err(LayoutError::malformed(
                RecordKind::Host,
                format!("hosts[{idx}]"),
                "missing identifier",
            ));
        }
        if !seen.insert(host.id()) {
            return Err(LayoutError::malformed(
                RecordKind::Host,
                host.id(),
                "duplicate identifier",
            ));
        }
        for (container_idx, container) in host.containers().iter().enumerate() {
            check_container(&mut seen, container, || {
                format!("hosts[{idx}].containers[{container_idx}]")
            })?;
        }
    }

    for (idx, container) in snapshot.containers().iter().enumerate() {
        check_container(&mut seen, container, || format!("containers[{idx}]"))?;
        if container.host_id().is_none_or(str::is_empty) {
            return Err(LayoutError::malformed(
                RecordKind::Container,
                container.id(),
                "flat container without host reference",
            ));
        }
    }

    for (idx, network) in snapshot.networks().iter().enumerate() {
        if network.id().is_empty() {
            return Err(LayoutError::malformed(
                RecordKind::Network,
                format!("networks[{idx}]"),
                "missing identifier",
            ));
        }
        if network.name().is_empty() {
            return Err(LayoutError::malformed(
                RecordKind::Network,
                network.id(),
                "missing name",
            ));
        }
        if !seen.insert(network.id()) {
            return Err(LayoutError::malformed(
                RecordKind::Network,
                network.id(),
                "duplicate identifier",
            ));
        }
    }

    Ok(())
}

fn check_container<'s>(
    seen: &mut HashSet<&'s str>,
    container: &'s ContainerRecord,
    position: impl FnOnce() -> String,
) -> Result<(), LayoutError> {
    if container.id().is_empty() {
        return Err(LayoutError::malformed(
            RecordKind::Container,
            position(),
            "missing identifier",
        ));
    }
    if !seen.insert(container.id()) {
        return Err(LayoutError::malformed(
            RecordKind::Container,
            container.id(),
            "duplicate identifier",
        ));
    }
    Ok(())
}
