//! Decoding the CNI `network-status` annotation, including NPWG `device-info`.

use crate::types::{InterfacePayload, NetworkInterface, NetworkStatus, SriovData, VhostData};
use crate::{HalError, HalResult};
use serde::Deserialize;
use std::collections::HashMap;

pub const NETWORK_STATUS_ANNOTATION: &str = "k8s.v1.cni.cncf.io/network-status";
pub const NETWORK_STATUS_ANNOTATION_LEGACY: &str = "k8s.v1.cni.cncf.io/networks-status";

#[derive(Debug, Clone, Deserialize)]
pub struct StatusEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub mac: String,
    #[serde(default, rename = "device-info")]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    #[serde(default, rename = "type")]
    pub kind: String,
    pub pci: Option<PciDevice>,
    #[serde(rename = "vhost-user")]
    pub vhost_user: Option<VhostUserDevice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PciDevice {
    #[serde(default, rename = "pci-address")]
    pub pci_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VhostUserDevice {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub path: String,
}

pub fn parse_status_entries(json: &str) -> HalResult<Vec<StatusEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Finds and decodes the network-status annotation.
pub fn network_status_from_annotations(
    annotations: &HashMap<String, String>,
) -> HalResult<Vec<StatusEntry>> {
    let json = annotations
        .get(NETWORK_STATUS_ANNOTATION)
        .or_else(|| annotations.get(NETWORK_STATUS_ANNOTATION_LEGACY))
        .ok_or_else(|| HalError::MissingAnnotation(NETWORK_STATUS_ANNOTATION.to_string()))?;
    parse_status_entries(json)
}

impl From<&StatusEntry> for NetworkStatus {
    fn from(entry: &StatusEntry) -> Self {
        NetworkStatus {
            name: entry.name.clone(),
            interface: entry.interface.clone(),
            ips: entry.ips.clone(),
            mac: entry.mac.clone(),
        }
    }
}

impl DeviceInfo {
    fn payload(&self) -> InterfacePayload {
        match self.kind.as_str() {
            "pci" => match &self.pci {
                Some(pci) => InterfacePayload::Pci(SriovData {
                    pci_address: pci.pci_address.clone(),
                }),
                None => InterfacePayload::Unspecified,
            },
            "vhost-user" | "vhost" => match &self.vhost_user {
                Some(vhost) => InterfacePayload::Vhost(VhostData {
                    socket_file: vhost.path.clone(),
                    master: vhost.mode == "server",
                }),
                None => InterfacePayload::Unspecified,
            },
            _ => InterfacePayload::Unspecified,
        }
    }
}

/// Interface descriptors for every status entry that carries device-info.
pub fn interfaces_from_status(entries: &[StatusEntry]) -> Vec<NetworkInterface> {
    entries
        .iter()
        .filter_map(|entry| {
            let info = entry.device_info.as_ref()?;
            Some(NetworkInterface {
                name: entry.name.clone(),
                payload: info.payload(),
            })
        })
        .collect()
}
