//! Provider-side data model.

/// One network attachment as reported by the CNI network-status annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStatus {
    pub name: String,
    pub interface: String,
    pub ips: Vec<String>,
    pub mac: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SriovData {
    pub pci_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VhostData {
    pub socket_file: String,
    /// This side owns the socket (vhost-user server mode).
    pub master: bool,
}

/// Type-specific part of an interface descriptor.
///
/// Only the variant matching the interface type exists, so a PCI interface
/// cannot carry a socket path and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfacePayload {
    Pci(SriovData),
    Vhost(VhostData),
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    Pci,
    Vhost,
    Unspecified,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Pci => "pci",
            InterfaceType::Vhost => "vhost",
            InterfaceType::Unspecified => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub payload: InterfacePayload,
}

impl NetworkInterface {
    pub fn pci(name: impl Into<String>, pci_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: InterfacePayload::Pci(SriovData {
                pci_address: pci_address.into(),
            }),
        }
    }

    pub fn vhost(name: impl Into<String>, socket_file: impl Into<String>, master: bool) -> Self {
        Self {
            name: name.into(),
            payload: InterfacePayload::Vhost(VhostData {
                socket_file: socket_file.into(),
                master,
            }),
        }
    }

    pub fn interface_type(&self) -> InterfaceType {
        match self.payload {
            InterfacePayload::Pci(_) => InterfaceType::Pci,
            InterfacePayload::Vhost(_) => InterfaceType::Vhost,
            InterfacePayload::Unspecified => InterfaceType::Unspecified,
        }
    }

    pub fn sriov(&self) -> Option<&SriovData> {
        match &self.payload {
            InterfacePayload::Pci(data) => Some(data),
            _ => None,
        }
    }

    pub fn vhost_data(&self) -> Option<&VhostData> {
        match &self.payload {
            InterfacePayload::Vhost(data) => Some(data),
            _ => None,
        }
    }
}

/// Interface type filter as passed across the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceFilter {
    Pci,
    Vhost,
    /// Empty filter string: both kinds.
    All,
    /// Anything else. Selects nothing.
    Unrecognized(String),
}

impl InterfaceFilter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pci" => InterfaceFilter::Pci,
            "vhost" => InterfaceFilter::Vhost,
            "" => InterfaceFilter::All,
            other => InterfaceFilter::Unrecognized(other.to_string()),
        }
    }

    pub fn includes_pci(&self) -> bool {
        matches!(self, InterfaceFilter::Pci | InterfaceFilter::All)
    }

    pub fn includes_vhost(&self) -> bool {
        matches!(self, InterfaceFilter::Vhost | InterfaceFilter::All)
    }

    pub fn matches(&self, iface: &NetworkInterface) -> bool {
        match iface.interface_type() {
            InterfaceType::Pci => self.includes_pci(),
            InterfaceType::Vhost => self.includes_vhost(),
            InterfaceType::Unspecified => false,
        }
    }
}
