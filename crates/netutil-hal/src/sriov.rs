//! SR-IOV device plugin environment variables.
//!
//! The device plugin exports one variable per resource, e.g.
//! `PCIDEVICE_INTEL_COM_SRIOV_NETDEVICE=0000:03:02.1,0000:03:02.2`.

use crate::types::NetworkInterface;

pub const PCIDEVICE_PREFIX: &str = "PCIDEVICE_";

/// Extracts one PCI interface per address listed in `PCIDEVICE_*` variables.
///
/// The interface name is the resource part of the variable name, lowercased.
pub fn pci_interfaces_from_env<'a, I>(envs: I) -> Vec<NetworkInterface>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = Vec::new();
    for (key, value) in envs {
        let resource = match key.strip_prefix(PCIDEVICE_PREFIX) {
            Some(r) if !r.is_empty() => r.to_lowercase(),
            _ => continue,
        };
        for addr in value.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            out.push(NetworkInterface::pci(resource.clone(), addr));
        }
    }
    out
}
