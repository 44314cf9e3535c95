//! Association of per-host gateway bridge networks with their hosts.
//!
//! The cluster does not state which bridge network belongs to which host. Two
//! sources are consulted, in order:
//!
//! 1. An explicit `hostId` on the [`NetworkRecord`], normally filled in during
//!    snapshot ingestion.
//! 2. The naming convention: a bridge-like network belongs to a host when the
//!    network id contains the host id as a substring. When several hosts match,
//!    the host with the longest id wins, so `node-10` beats `node-1`.
//!
//! Each host keeps at most one gateway bridge; extra candidates are logged and
//! ignored.

use log::debug;

use crate::{
    identifier::Id,
    topology::{HostRecord, NetworkRecord},
};

/// Finds the host index owning `network`, if any.
///
/// Returns `None` for networks that cannot back a gateway bridge, for explicit
/// host ids that name no host, and for networks no host id matches.
pub fn owner_of(network: &NetworkRecord, hosts: &[HostRecord]) -> Option<usize> {
    if !network.driver().is_bridge_like() {
        return None;
    }

    if let Some(host_id) = network.host_id() {
        let owner = hosts.iter().position(|host| host.id() == host_id);
        if owner.is_none() {
            debug!(network = network.id(), host_id; "Gateway bridge names unknown host");
        }
        return owner;
    }

    let network_id = Id::new(network.id());
    hosts
        .iter()
        .enumerate()
        .filter(|(_, host)| network_id.contains(Id::new(host.id())))
        .fold(None, |best: Option<(usize, usize)>, (idx, host)| {
            let len = host.id().len();
            match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((idx, len)),
            }
        })
        .map(|(idx, _)| idx)
}

/// Resolves the gateway bridge of every host.
///
/// The returned vector is indexed like `hosts`; each entry holds that host's
/// gateway bridge. Candidates are considered in iteration order and the first
/// one claimed by a host is kept.
pub fn resolve<'n>(
    hosts: &[HostRecord],
    networks: impl IntoIterator<Item = &'n NetworkRecord>,
) -> Vec<Option<&'n NetworkRecord>> {
    let mut resolved: Vec<Option<&'n NetworkRecord>> = vec![None; hosts.len()];

    for network in networks {
        let Some(host_idx) = owner_of(network, hosts) else {
            continue;
        };

        match resolved[host_idx] {
            None => resolved[host_idx] = Some(network),
            Some(kept) => debug!(
                host = hosts[host_idx].id(),
                kept = kept.id(),
                ignored = network.id();
                "Host already has a gateway bridge"
            ),
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{HostRole, NetworkDriver};

    fn host(id: &str) -> HostRecord {
        HostRecord::new(id, id, HostRole::Worker)
    }

    #[test]
    fn test_substring_match() {
        let hosts = vec![host("abc"), host("def")];
        let networks = vec![
            NetworkRecord::new("gwbridge-def", "docker_gwbridge", NetworkDriver::Bridge),
            NetworkRecord::new("gwbridge-abc", "docker_gwbridge", NetworkDriver::Gwbridge),
        ];

        let resolved = resolve(&hosts, &networks);

        assert_eq!(resolved[0].map(NetworkRecord::id), Some("gwbridge-abc"));
        assert_eq!(resolved[1].map(NetworkRecord::id), Some("gwbridge-def"));
    }

    #[test]
    fn test_non_bridge_driver_never_matches() {
        let hosts = vec![host("abc")];
        let networks = vec![NetworkRecord::new(
            "overlay-abc",
            "backend",
            NetworkDriver::Overlay,
        )];

        assert_eq!(resolve(&hosts, &networks), vec![None]);
    }

    #[test]
    fn test_longest_host_id_wins() {
        let hosts = vec![host("node-1"), host("node-10")];
        let network = NetworkRecord::new("gw-node-10", "docker_gwbridge", NetworkDriver::Bridge);

        assert_eq!(owner_of(&network, &hosts), Some(1));
    }

    #[test]
    fn test_explicit_host_id_takes_precedence() {
        let hosts = vec![host("abc"), host("xyz")];
        let network = NetworkRecord::new("gw-abc", "docker_gwbridge", NetworkDriver::Bridge)
            .with_host_id("xyz");

        assert_eq!(owner_of(&network, &hosts), Some(1));
    }

    #[test]
    fn test_explicit_unknown_host_id_is_skipped() {
        let hosts = vec![host("abc")];
        let network = NetworkRecord::new("gw-abc", "docker_gwbridge", NetworkDriver::Bridge)
            .with_host_id("gone");

        assert_eq!(owner_of(&network, &hosts), None);
    }

    #[test]
    fn test_one_gateway_bridge_per_host() {
        let hosts = vec![host("abc")];
        let networks = vec![
            NetworkRecord::new("gw1-abc", "docker_gwbridge", NetworkDriver::Bridge),
            NetworkRecord::new("gw2-abc", "docker_gwbridge", NetworkDriver::Bridge),
        ];

        let resolved = resolve(&hosts, &networks);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].map(NetworkRecord::id), Some("gw1-abc"));
    }
}
