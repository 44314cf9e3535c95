//! Topology records describing a Swarm cluster snapshot.
//!
//! These are the inputs of the layout engine. They are plain data: hosts own
//! their containers, containers *reference* networks through
//! [`NetworkAttachment`]s, and networks are listed independently. Nothing here
//! guarantees referential consistency; the engine tolerates dangling
//! references and skips them.
//!
//! All records implement [`serde::Deserialize`] and [`serde::Serialize`] with
//! camelCase field names, which is the shape the snapshot JSON uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name the cluster gives its routing-mesh network.
pub const INGRESS_NETWORK_NAME: &str = "ingress";

/// Role of a host within the Swarm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostRole {
    Manager,
    #[default]
    Worker,
}

/// Network driver as reported by the cluster.
///
/// Drivers the layout has no use for (`macvlan`, `null`, plugins) collapse into
/// [`NetworkDriver::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkDriver {
    Overlay,
    Bridge,
    Gwbridge,
    Host,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NetworkDriver {
    /// Returns `true` for drivers that can back a per-host gateway bridge.
    pub fn is_bridge_like(self) -> bool {
        matches!(self, Self::Bridge | Self::Gwbridge)
    }
}

/// Origin of a network definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    External,
    Docker,
}

/// A reference from a container to a network.
///
/// `network_ref` may hold either the network id or its name, and may point at
/// nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachment {
    network_ref: String,
    #[serde(default)]
    driver: NetworkDriver,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ip_address: Option<String>,
}

impl NetworkAttachment {
    pub fn new(network_ref: impl Into<String>, driver: NetworkDriver) -> Self {
        Self {
            network_ref: network_ref.into(),
            driver,
            ip_address: None,
        }
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Id or name of the referenced network.
    pub fn network_ref(&self) -> &str {
        &self.network_ref
    }

    pub fn driver(&self) -> NetworkDriver {
        self.driver
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }
}

/// A running container (a Swarm task) on some host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    id: String,
    #[serde(default)]
    service_name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    network_attachments: Vec<NetworkAttachment>,
    /// Owning host, only consulted for containers supplied as a flat list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host_id: Option<String>,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_name: service_name.into(),
            image: String::new(),
            status: String::new(),
            network_attachments: Vec::new(),
            host_id: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_attachment(mut self, attachment: NetworkAttachment) -> Self {
        self.network_attachments.push(attachment);
        self
    }

    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn network_attachments(&self) -> &[NetworkAttachment] {
        &self.network_attachments
    }

    pub fn host_id(&self) -> Option<&str> {
        self.host_id.as_deref()
    }
}

/// A cluster member and the containers scheduled on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    id: String,
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    role: HostRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    containers: Vec<ContainerRecord>,
}

impl HostRecord {
    pub fn new(id: impl Into<String>, hostname: impl Into<String>, role: HostRole) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            role,
            status: None,
            labels: BTreeMap::new(),
            containers: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_container(mut self, container: ContainerRecord) -> Self {
        self.containers.push(container);
        self
    }

    /// Appends containers, keeping their order.
    pub fn extend_containers(&mut self, containers: impl IntoIterator<Item = ContainerRecord>) {
        self.containers.extend(containers);
    }

    /// Removes and returns the container with the given id, if present.
    pub fn remove_container(&mut self, id: &str) -> Option<ContainerRecord> {
        let index = self.containers.iter().position(|c| c.id == id)?;
        Some(self.containers.remove(index))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn role(&self) -> HostRole {
        self.role
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn containers(&self) -> &[ContainerRecord] {
        &self.containers
    }
}

/// A network known to the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    id: String,
    name: String,
    #[serde(default)]
    driver: NetworkDriver,
    #[serde(default)]
    scope: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    network_type: Option<NetworkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gateway: Option<String>,
    /// Explicit owning host of a gateway bridge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host_id: Option<String>,
    /// Offset along a gateway bridge where its ingress link attaches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ingress_handle: Option<f32>,
    /// Hosts an overlay network links to directly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    host_handles: Vec<String>,
}

impl NetworkRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, driver: NetworkDriver) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            driver,
            scope: String::new(),
            network_type: None,
            subnet: None,
            gateway: None,
            host_id: None,
            ingress_handle: None,
            host_handles: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_type(mut self, network_type: NetworkType) -> Self {
        self.network_type = Some(network_type);
        self
    }

    pub fn with_subnet(mut self, subnet: impl Into<String>, gateway: impl Into<String>) -> Self {
        self.subnet = Some(subnet.into());
        self.gateway = Some(gateway.into());
        self
    }

    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    pub fn with_ingress_handle(mut self, offset: f32) -> Self {
        self.ingress_handle = Some(offset);
        self
    }

    pub fn with_host_handle(mut self, host_id: impl Into<String>) -> Self {
        self.host_handles.push(host_id.into());
        self
    }

    /// Sets the explicit owning host in place.
    pub fn set_host_id(&mut self, host_id: impl Into<String>) {
        self.host_id = Some(host_id.into());
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn driver(&self) -> NetworkDriver {
        self.driver
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn network_type(&self) -> Option<NetworkType> {
        self.network_type
    }

    pub fn subnet(&self) -> Option<&str> {
        self.subnet.as_deref()
    }

    pub fn gateway(&self) -> Option<&str> {
        self.gateway.as_deref()
    }

    pub fn host_id(&self) -> Option<&str> {
        self.host_id.as_deref()
    }

    pub fn ingress_handle(&self) -> Option<f32> {
        self.ingress_handle
    }

    pub fn host_handles(&self) -> &[String] {
        &self.host_handles
    }

    /// The cluster's routing-mesh network.
    pub fn is_ingress(&self) -> bool {
        self.name == INGRESS_NETWORK_NAME
    }

    /// A user overlay network, i.e. any overlay other than ingress.
    pub fn is_overlay(&self) -> bool {
        self.driver == NetworkDriver::Overlay && !self.is_ingress()
    }

    pub fn is_external(&self) -> bool {
        self.network_type == Some(NetworkType::External)
    }

    /// Returns `true` if `reference` names this network by id or by name.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }
}

/// An immutable picture of the cluster at one point in time.
///
/// Containers may be embedded in their hosts, supplied in the flat
/// `containers` list with a `hostId`, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    hosts: Vec<HostRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    containers: Vec<ContainerRecord>,
    #[serde(default)]
    networks: Vec<NetworkRecord>,
}

impl Snapshot {
    pub fn new(hosts: Vec<HostRecord>, networks: Vec<NetworkRecord>) -> Self {
        Self {
            hosts,
            containers: Vec::new(),
            networks,
        }
    }

    pub fn with_host(mut self, host: HostRecord) -> Self {
        self.hosts.push(host);
        self
    }

    pub fn with_network(mut self, network: NetworkRecord) -> Self {
        self.networks.push(network);
        self
    }

    /// Adds a container to the flat list; it is grouped by its `hostId`.
    pub fn with_container(mut self, container: ContainerRecord) -> Self {
        self.containers.push(container);
        self
    }

    pub fn hosts(&self) -> &[HostRecord] {
        &self.hosts
    }

    pub fn hosts_mut(&mut self) -> &mut [HostRecord] {
        &mut self.hosts
    }

    /// Flat containers not yet grouped under a host.
    pub fn containers(&self) -> &[ContainerRecord] {
        &self.containers
    }

    pub fn networks(&self) -> &[NetworkRecord] {
        &self.networks
    }

    /// Splits the snapshot into its three collections.
    pub fn into_parts(self) -> (Vec<HostRecord>, Vec<ContainerRecord>, Vec<NetworkRecord>) {
        (self.hosts, self.containers, self.networks)
    }

    /// Reassembles a snapshot from its collections.
    pub fn from_parts(
        hosts: Vec<HostRecord>,
        containers: Vec<ContainerRecord>,
        networks: Vec<NetworkRecord>,
    ) -> Self {
        Self {
            hosts,
            containers,
            networks,
        }
    }

    /// Returns `true` if the snapshot holds no hosts and no networks.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.networks.is_empty()
    }
}
