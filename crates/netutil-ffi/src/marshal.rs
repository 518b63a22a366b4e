//! Copies provider results into caller-owned response buffers.
//!
//! Each function asks the provider first and only then touches the response,
//! so a provider failure leaves the buffer as the caller supplied it. Once
//! writing starts there is no rollback: on `SizeExceeded` the slots already
//! written stay written and their strings belong to the caller.

use crate::abi::{CPUResponse, EnvData, NetworkInterfaceResponse, NetworkStatusResponse};
use crate::slots::SlotWriter;
use crate::strings::alloc_c_string;
use netutil_error::MarshalResult;
use netutil_hal::{DiscoveryOps, InterfaceFilter};

pub fn marshal_cpu_info(hal: &dyn DiscoveryOps, resp: &mut CPUResponse) -> MarshalResult<()> {
    let cpus = hal.cpu_set()?;
    resp.cpu_set = alloc_c_string(&cpus)?;
    Ok(())
}

/// Fills `slots` with (name, value) pairs in provider order.
pub fn marshal_env(hal: &dyn DiscoveryOps, slots: &mut [EnvData]) -> MarshalResult<()> {
    let envs = hal.env()?;
    let mut writer = SlotWriter::new("EnvResponse", slots);
    for (name, value) in &envs {
        let slot = writer.next_slot()?;
        slot.index = alloc_c_string(name)?;
        slot.value = alloc_c_string(value)?;
    }
    log::debug!("GetEnv: wrote {} of {} slots", writer.len(), writer.capacity());
    Ok(())
}

pub fn marshal_network_status(
    hal: &dyn DiscoveryOps,
    resp: &mut NetworkStatusResponse,
) -> MarshalResult<()> {
    let statuses = hal.network_status()?;
    let mut writer = SlotWriter::new("NetworkStatusResponse", &mut resp.status[..]);
    for status in &statuses {
        let slot = writer.next_slot()?;
        slot.name = alloc_c_string(&status.name)?;
        slot.interface = alloc_c_string(&status.interface)?;
        slot.mac = alloc_c_string(&status.mac)?;

        let mut ips = SlotWriter::new("NetworkStatusResponse IPs", &mut slot.ips[..]);
        for ip in &status.ips {
            *ips.next_slot()? = alloc_c_string(ip)?;
        }
    }
    Ok(())
}

/// Writes name and type for every interface, plus the payload fields the
/// filter asks for. An unrecognized filter writes no payload at all.
pub fn marshal_network_interface(
    hal: &dyn DiscoveryOps,
    filter: &InterfaceFilter,
    resp: &mut NetworkInterfaceResponse,
) -> MarshalResult<()> {
    let interfaces = hal.network_interfaces(filter)?;
    if let InterfaceFilter::Unrecognized(raw) = filter {
        log::warn!(
            "GetNetworkInterface: unrecognized type filter {:?}, payload fields left unset",
            raw
        );
    }

    let mut writer = SlotWriter::new("NetworkInterfaceResponse", &mut resp.interface[..]);
    for iface in &interfaces {
        let slot = writer.next_slot()?;
        slot.name = alloc_c_string(&iface.name)?;
        slot.kind = alloc_c_string(iface.interface_type().as_str())?;

        if filter.includes_pci() {
            if let Some(sriov) = iface.sriov() {
                slot.sriov.pci_address = alloc_c_string(&sriov.pci_address)?;
            }
        }
        if filter.includes_vhost() {
            if let Some(vhost) = iface.vhost_data() {
                slot.vhost.socket_file = alloc_c_string(&vhost.socket_file)?;
                slot.vhost.master = vhost.master;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{NetworkStatus, NETUTIL_NUM_IPS};
    use netutil_error::MarshalError;
    use netutil_hal::{
        Fact, FakeHal, InterfacePayload, InterfaceType, NetworkInterface, NetworkStatus as Status,
        SriovData, VhostData,
    };

    fn status(n: usize, ips: usize) -> Status {
        Status {
            name: format!("net{n}"),
            interface: format!("eth{n}"),
            ips: (0..ips).map(|i| format!("10.0.{n}.{i}")).collect(),
            mac: format!("02:00:00:00:00:{n:02x}"),
        }
    }

    fn fully_null(entry: &NetworkStatus) -> bool {
        entry.name.is_null()
            && entry.interface.is_null()
            && entry.mac.is_null()
            && entry.ips.iter().all(|ip| ip.is_null())
    }

    #[test]
    fn cpu_info_copies_cpu_set() {
        let hal = FakeHal::new().with_cpu_set("0-3,7");
        let mut resp = CPUResponse::default();
        marshal_cpu_info(&hal, &mut resp).unwrap();
        assert_eq!(unsafe { resp.cpu_set() }.as_deref(), Some("0-3,7"));
        unsafe { resp.release() };
    }

    #[test]
    fn cpu_info_failure_leaves_response_untouched() {
        let hal = FakeHal::new().failing(Fact::CpuSet);
        let mut resp = CPUResponse::default();
        let err = marshal_cpu_info(&hal, &mut resp).unwrap_err();
        assert!(matches!(err, MarshalError::Hal(_)));
        assert!(resp.cpu_set.is_null());
    }

    #[test]
    fn env_within_capacity_fills_in_order() {
        let hal = FakeHal::new().with_env([("FOO", "bar"), ("BAZ", "qux")]);
        let mut slots = [EnvData::default(); 3];
        marshal_env(&hal, &mut slots).unwrap();
        unsafe {
            assert_eq!(slots[0].pair(), Some(("FOO".into(), "bar".into())));
            assert_eq!(slots[1].pair(), Some(("BAZ".into(), "qux".into())));
            assert!(slots[2].index.is_null() && slots[2].value.is_null());
            slots.iter_mut().for_each(|s| s.release());
        }
    }

    #[test]
    fn env_over_capacity_keeps_partial_write() {
        let hal = FakeHal::new().with_env([("FOO", "bar"), ("BAZ", "qux")]);
        let mut slots = [EnvData::default(); 2];
        let err = marshal_env(&hal, &mut slots[..1]).unwrap_err();
        assert!(err.is_size_error());
        unsafe {
            assert_eq!(slots[0].pair(), Some(("FOO".into(), "bar".into())));
            assert!(slots[1].index.is_null());
            slots[0].release();
        }
    }

    #[test]
    fn env_zero_capacity_with_no_envs_succeeds() {
        let hal = FakeHal::new();
        marshal_env(&hal, &mut []).unwrap();
    }

    #[test]
    fn env_failure_writes_nothing() {
        let hal = FakeHal::new()
            .with_env([("A", "1")])
            .failing(Fact::Env);
        let mut slots = [EnvData::default(); 1];
        assert!(!marshal_env(&hal, &mut slots).unwrap_err().is_size_error());
        assert!(slots[0].index.is_null());
    }

    #[test]
    fn network_status_writes_all_fields() {
        let hal = FakeHal::new().with_network_status(vec![status(0, 2), status(1, 0)]);
        let mut resp = NetworkStatusResponse::default();
        marshal_network_status(&hal, &mut resp).unwrap();
        unsafe {
            let first = &resp.status[0];
            assert_eq!(crate::strings::read_c_string(first.name).unwrap(), "net0");
            assert_eq!(crate::strings::read_c_string(first.interface).unwrap(), "eth0");
            assert_eq!(
                crate::strings::read_c_string(first.mac).unwrap(),
                "02:00:00:00:00:00"
            );
            assert_eq!(first.ips(), vec!["10.0.0.0", "10.0.0.1"]);
            assert!(resp.status[1].ips().is_empty());
            assert!(!resp.status[1].name.is_null());
            assert!(fully_null(&resp.status[2]));
            resp.release();
        }
    }

    #[test]
    fn network_status_ten_entries_fit() {
        let hal = FakeHal::new().with_network_status((0..10).map(|n| status(n, 10)).collect());
        let mut resp = NetworkStatusResponse::default();
        marshal_network_status(&hal, &mut resp).unwrap();
        assert!(resp.status.iter().all(|s| !s.ips[NETUTIL_NUM_IPS - 1].is_null()));
        unsafe { resp.release() };
    }

    #[test]
    fn network_status_eleventh_entry_is_size_error() {
        let hal = FakeHal::new().with_network_status((0..11).map(|n| status(n, 1)).collect());
        let mut resp = NetworkStatusResponse::default();
        let err = marshal_network_status(&hal, &mut resp).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::SizeExceeded {
                what: "NetworkStatusResponse",
                capacity: 10
            }
        ));
        assert!(resp.status.iter().all(|s| !s.name.is_null()));
        unsafe { resp.release() };
    }

    #[test]
    fn network_status_too_many_ips_is_size_error() {
        let hal = FakeHal::new().with_network_status(vec![status(0, 1), status(1, 11), status(2, 1)]);
        let mut resp = NetworkStatusResponse::default();
        let err = marshal_network_status(&hal, &mut resp).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::SizeExceeded {
                what: "NetworkStatusResponse IPs",
                ..
            }
        ));
        unsafe {
            assert_eq!(resp.status[1].ips().len(), NETUTIL_NUM_IPS);
            assert!(fully_null(&resp.status[2]));
            resp.release();
        }
    }

    #[test]
    fn network_status_failure_leaves_response_untouched() {
        let hal = FakeHal::new()
            .with_network_status(vec![status(0, 1)])
            .failing(Fact::NetworkStatus);
        let mut resp = NetworkStatusResponse::default();
        assert!(marshal_network_status(&hal, &mut resp).is_err());
        assert!(resp.status.iter().all(fully_null));
    }

    fn mixed_interfaces() -> Vec<NetworkInterface> {
        vec![
            NetworkInterface::pci("sriov-net", "0000:03:02.1"),
            NetworkInterface::vhost("vhost-net", "/run/vhu0.sock", true),
        ]
    }

    #[test]
    fn pci_filter_populates_pci_only() {
        let hal = FakeHal::new().with_interfaces(vec![
            NetworkInterface::pci("a", "0000:03:02.1"),
            NetworkInterface::pci("b", "0000:03:02.2"),
        ]);
        let mut resp = NetworkInterfaceResponse::default();
        marshal_network_interface(&hal, &InterfaceFilter::Pci, &mut resp).unwrap();
        unsafe {
            for iface in &resp.interface[..2] {
                assert_eq!(iface.interface_type(), Some(InterfaceType::Pci));
                assert!(!iface.sriov.pci_address.is_null());
                assert!(iface.vhost.socket_file.is_null());
                assert!(!iface.vhost.master);
            }
            assert!(resp.interface[2].name.is_null());
            resp.release();
        }
    }

    #[test]
    fn vhost_filter_populates_vhost_only() {
        let hal = FakeHal::new().with_interfaces(vec![NetworkInterface::vhost(
            "vhost-net",
            "/run/vhu0.sock",
            true,
        )]);
        let mut resp = NetworkInterfaceResponse::default();
        marshal_network_interface(&hal, &InterfaceFilter::Vhost, &mut resp).unwrap();
        let iface = &resp.interface[0];
        assert!(iface.sriov.pci_address.is_null());
        assert_eq!(
            unsafe { iface.payload() },
            Some(InterfacePayload::Vhost(VhostData {
                socket_file: "/run/vhu0.sock".into(),
                master: true,
            }))
        );
        unsafe { resp.release() };
    }

    #[test]
    fn empty_filter_populates_each_entry_from_its_own_kind() {
        let hal = FakeHal::new().with_interfaces(mixed_interfaces());
        let mut resp = NetworkInterfaceResponse::default();
        marshal_network_interface(&hal, &InterfaceFilter::All, &mut resp).unwrap();
        unsafe {
            assert_eq!(
                resp.interface[0].payload(),
                Some(InterfacePayload::Pci(SriovData {
                    pci_address: "0000:03:02.1".into()
                }))
            );
            assert!(resp.interface[0].vhost.socket_file.is_null());
            assert!(!resp.interface[1].vhost.socket_file.is_null());
            assert!(resp.interface[1].sriov.pci_address.is_null());
            resp.release();
        }
    }

    #[test]
    fn unrecognized_filter_copies_name_and_type_only() {
        let hal = FakeHal::new().with_interfaces(mixed_interfaces());
        let mut resp = NetworkInterfaceResponse::default();
        let filter = InterfaceFilter::parse("dpdk");
        marshal_network_interface(&hal, &filter, &mut resp).unwrap();
        unsafe {
            for iface in &resp.interface[..2] {
                assert!(!iface.name.is_null());
                assert!(!iface.kind.is_null());
                assert!(iface.sriov.pci_address.is_null());
                assert!(iface.vhost.socket_file.is_null());
                assert_eq!(iface.payload(), Some(InterfacePayload::Unspecified));
            }
            resp.release();
        }
    }

    #[test]
    fn too_many_interfaces_is_size_error() {
        let hal = FakeHal::new().with_interfaces(
            (0..11)
                .map(|n| NetworkInterface::pci(format!("vf{n}"), format!("0000:03:02.{n}")))
                .collect(),
        );
        let mut resp = NetworkInterfaceResponse::default();
        let err = marshal_network_interface(&hal, &InterfaceFilter::Pci, &mut resp).unwrap_err();
        assert!(err.is_size_error());
        assert!(resp.interface.iter().all(|i| !i.name.is_null()));
        unsafe { resp.release() };
    }

    #[test]
    fn ten_interfaces_fit() {
        let hal = FakeHal::new().with_interfaces(
            (0..10)
                .map(|n| {
                    NetworkInterface::vhost(format!("vhu{n}"), format!("/run/vhu{n}.sock"), n % 2 == 0)
                })
                .collect(),
        );
        let mut resp = NetworkInterfaceResponse::default();
        marshal_network_interface(&hal, &InterfaceFilter::All, &mut resp).unwrap();
        for (n, iface) in resp.interface.iter().enumerate() {
            assert!(!iface.name.is_null());
            assert!(!iface.vhost.socket_file.is_null());
            assert!(iface.sriov.pci_address.is_null());
            assert_eq!(iface.vhost.master, n % 2 == 0);
        }
        unsafe { resp.release() };
    }

    #[test]
    fn network_interface_failure_leaves_response_untouched() {
        let hal = FakeHal::new()
            .with_interfaces(mixed_interfaces())
            .failing(Fact::NetworkInterfaces);
        let mut resp = NetworkInterfaceResponse::default();
        let err = marshal_network_interface(&hal, &InterfaceFilter::All, &mut resp).unwrap_err();
        assert!(matches!(err, MarshalError::Hal(_)));
        assert!(!err.is_size_error());
        assert!(resp.interface.iter().all(|i| {
            i.name.is_null()
                && i.kind.is_null()
                && i.sriov.pci_address.is_null()
                && i.vhost.socket_file.is_null()
        }));
    }

    #[test]
    fn interface_filter_is_passed_to_provider() {
        let hal = FakeHal::new();
        let mut resp = NetworkInterfaceResponse::default();
        marshal_network_interface(&hal, &InterfaceFilter::Vhost, &mut resp).unwrap();
        assert_eq!(
            hal.operations(),
            vec![netutil_hal::Operation::NetworkInterfaces {
                filter: InterfaceFilter::Vhost
            }]
        );
    }
}
