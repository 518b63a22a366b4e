//! Linux HAL implementation reading the real host.

use super::DiscoveryOps;
use crate::cgroup::cpuset;
use crate::config::HalConfig;
use crate::podinfo::{self, network_status::StatusEntry};
use crate::sriov;
use crate::types::{InterfaceFilter, NetworkInterface, NetworkStatus};
use crate::HalResult;
use std::collections::HashSet;
use std::env;

/// Real HAL implementation for Linux pods.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal {
    config: HalConfig,
}

impl LinuxHal {
    pub fn new(config: HalConfig) -> Self {
        Self { config }
    }

    fn status_entries(&self) -> HalResult<Vec<StatusEntry>> {
        let annotations = podinfo::read_annotations(&self.config.annotations_path)?;
        podinfo::network_status_from_annotations(&annotations)
    }
}

fn lossy_env() -> Vec<(String, String)> {
    env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Merges device-info interfaces with device plugin PCI addresses not already listed.
fn merge_interfaces(
    mut from_status: Vec<NetworkInterface>,
    from_env: Vec<NetworkInterface>,
) -> Vec<NetworkInterface> {
    let known: HashSet<String> = from_status
        .iter()
        .filter_map(|iface| iface.sriov().map(|s| s.pci_address.clone()))
        .collect();
    from_status.extend(from_env.into_iter().filter(|iface| {
        iface
            .sriov()
            .map_or(true, |s| !known.contains(&s.pci_address))
    }));
    from_status
}

impl DiscoveryOps for LinuxHal {
    fn cpu_set(&self) -> HalResult<String> {
        cpuset::read_cpuset(&self.config.cpuset_path, &self.config.cpuset_fallback_path)
    }

    fn env(&self) -> HalResult<Vec<(String, String)>> {
        Ok(lossy_env())
    }

    fn network_status(&self) -> HalResult<Vec<NetworkStatus>> {
        let entries = self.status_entries()?;
        Ok(entries.iter().map(NetworkStatus::from).collect())
    }

    fn network_interfaces(&self, filter: &InterfaceFilter) -> HalResult<Vec<NetworkInterface>> {
        if let InterfaceFilter::Unrecognized(_) = filter {
            return Ok(Vec::new());
        }

        let entries = self.status_entries()?;
        let envs = lossy_env();
        let from_env =
            sriov::pci_interfaces_from_env(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let merged = merge_interfaces(podinfo::interfaces_from_status(&entries), from_env);

        Ok(merged
            .into_iter()
            .filter(|iface| filter.matches(iface))
            .collect())
    }
}
