//! `#[repr(C)]` response layouts shared with foreign callers.
//!
//! These mirror `include/netutil_c_api.h` field for field. Every `*mut c_char`
//! written by the library is a `malloc` allocation owned by the caller.

use crate::strings::{read_c_string, release};
use libc::{c_char, c_int};
use netutil_error::MarshalError;
use netutil_hal::{InterfacePayload, InterfaceType, SriovData, VhostData};
use std::ptr;

pub const NETUTIL_NUM_IPS: usize = 10;
pub const NETUTIL_NUM_NETWORKSTATUS: usize = 10;
pub const NETUTIL_NUM_NETWORKINTERFACE: usize = 10;

/// Status code returned by every entry point.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success = 0,
    /// Provider failure, bad pointer or allocation failure.
    Fail = 1,
    /// Caller buffer too small. For `GetEnv` the caller can retry with a
    /// larger `netutil_num_envs`; the network arrays are fixed at 10.
    SizeError = 2,
}

impl Status {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl From<&MarshalError> for Status {
    fn from(err: &MarshalError) -> Self {
        if err.is_size_error() {
            Status::SizeError
        } else {
            Status::Fail
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CPUResponse {
    pub cpu_set: *mut c_char,
}

impl Default for CPUResponse {
    fn default() -> Self {
        Self {
            cpu_set: ptr::null_mut(),
        }
    }
}

impl CPUResponse {
    /// # Safety
    /// `cpu_set` must be null or a valid NUL-terminated string.
    pub unsafe fn cpu_set(&self) -> Option<String> {
        read_c_string(self.cpu_set)
    }

    /// # Safety
    /// `cpu_set` must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        release(&mut self.cpu_set);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct EnvData {
    pub index: *mut c_char,
    pub value: *mut c_char,
}

impl Default for EnvData {
    fn default() -> Self {
        Self {
            index: ptr::null_mut(),
            value: ptr::null_mut(),
        }
    }
}

impl EnvData {
    /// # Safety
    /// Both fields must be null or valid NUL-terminated strings.
    pub unsafe fn pair(&self) -> Option<(String, String)> {
        Some((read_c_string(self.index)?, read_c_string(self.value)?))
    }

    /// # Safety
    /// Both fields must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        release(&mut self.index);
        release(&mut self.value);
    }
}

/// `p_envs` points at a caller-allocated array of `netutil_num_envs` slots.
#[repr(C)]
#[derive(Debug)]
pub struct EnvResponse {
    pub netutil_num_envs: c_int,
    pub p_envs: *mut EnvData,
}

impl EnvResponse {
    /// Declared capacity. Negative counts are treated as zero.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.netutil_num_envs).unwrap_or(0)
    }

    /// The caller's slot array.
    ///
    /// # Safety
    /// `p_envs` must point at `capacity()` writable `EnvData` slots.
    pub unsafe fn slots_mut(&mut self) -> Result<&mut [EnvData], MarshalError> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Ok(&mut []);
        }
        if self.p_envs.is_null() {
            return Err(MarshalError::NullPointer("EnvResponse.pEnvs"));
        }
        Ok(std::slice::from_raw_parts_mut(self.p_envs, capacity))
    }

    /// # Safety
    /// See [`EnvResponse::slots_mut`]; every string must be null or ours.
    pub unsafe fn release(&mut self) {
        if let Ok(slots) = self.slots_mut() {
            slots.iter_mut().for_each(|slot| slot.release());
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NetworkStatus {
    pub name: *mut c_char,
    pub interface: *mut c_char,
    pub ips: [*mut c_char; NETUTIL_NUM_IPS],
    pub mac: *mut c_char,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self {
            name: ptr::null_mut(),
            interface: ptr::null_mut(),
            ips: [ptr::null_mut(); NETUTIL_NUM_IPS],
            mac: ptr::null_mut(),
        }
    }
}

impl NetworkStatus {
    /// Populated IP slots, in order.
    ///
    /// # Safety
    /// Every non-null slot must be a valid NUL-terminated string.
    pub unsafe fn ips(&self) -> Vec<String> {
        self.ips.iter().filter_map(|ip| read_c_string(*ip)).collect()
    }

    /// # Safety
    /// Every string must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        release(&mut self.name);
        release(&mut self.interface);
        release(&mut self.mac);
        self.ips.iter_mut().for_each(|ip| release(ip));
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkStatusResponse {
    pub status: [NetworkStatus; NETUTIL_NUM_NETWORKSTATUS],
}

impl NetworkStatusResponse {
    /// # Safety
    /// Every string must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        self.status.iter_mut().for_each(|s| s.release());
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CSriovData {
    pub pci_address: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CVhostData {
    pub socket_file: *mut c_char,
    pub master: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NetworkInterface {
    pub name: *mut c_char,
    pub kind: *mut c_char,
    pub sriov: CSriovData,
    pub vhost: CVhostData,
}

impl Default for NetworkInterface {
    fn default() -> Self {
        Self {
            name: ptr::null_mut(),
            kind: ptr::null_mut(),
            sriov: CSriovData {
                pci_address: ptr::null_mut(),
            },
            vhost: CVhostData {
                socket_file: ptr::null_mut(),
                master: false,
            },
        }
    }
}

impl NetworkInterface {
    /// # Safety
    /// `kind` must be null or a valid NUL-terminated string.
    pub unsafe fn interface_type(&self) -> Option<InterfaceType> {
        match read_c_string(self.kind)?.as_str() {
            "pci" => Some(InterfaceType::Pci),
            "vhost" => Some(InterfaceType::Vhost),
            _ => Some(InterfaceType::Unspecified),
        }
    }

    /// Reads the payload selected by the type tag; the other variant's
    /// fields are never looked at. `Unspecified` if the matching field was
    /// not populated.
    ///
    /// # Safety
    /// All string fields must be null or valid NUL-terminated strings.
    pub unsafe fn payload(&self) -> Option<InterfacePayload> {
        let payload = match self.interface_type()? {
            InterfaceType::Pci => match read_c_string(self.sriov.pci_address) {
                Some(pci_address) => InterfacePayload::Pci(SriovData { pci_address }),
                None => InterfacePayload::Unspecified,
            },
            InterfaceType::Vhost => match read_c_string(self.vhost.socket_file) {
                Some(socket_file) => InterfacePayload::Vhost(VhostData {
                    socket_file,
                    master: self.vhost.master,
                }),
                None => InterfacePayload::Unspecified,
            },
            InterfaceType::Unspecified => InterfacePayload::Unspecified,
        };
        Some(payload)
    }

    /// # Safety
    /// Every string must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        release(&mut self.name);
        release(&mut self.kind);
        release(&mut self.sriov.pci_address);
        release(&mut self.vhost.socket_file);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkInterfaceResponse {
    pub interface: [NetworkInterface; NETUTIL_NUM_NETWORKINTERFACE],
}

impl NetworkInterfaceResponse {
    /// # Safety
    /// Every string must be null or allocated by this library.
    pub unsafe fn release(&mut self) {
        self.interface.iter_mut().for_each(|i| i.release());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::alloc_c_string;
    use std::mem::{align_of, size_of};

    #[test]
    fn layouts_match_c_declarations() {
        let p = size_of::<*mut c_char>();
        assert_eq!(size_of::<CPUResponse>(), p);
        assert_eq!(size_of::<EnvData>(), 2 * p);
        assert_eq!(size_of::<NetworkStatus>(), (3 + NETUTIL_NUM_IPS) * p);
        assert_eq!(
            size_of::<NetworkStatusResponse>(),
            NETUTIL_NUM_NETWORKSTATUS * size_of::<NetworkStatus>()
        );
        assert_eq!(size_of::<CVhostData>(), 2 * p);
        assert_eq!(size_of::<NetworkInterface>(), 5 * p);
        assert_eq!(align_of::<EnvResponse>(), p);
    }

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::Fail.code(), 1);
        assert_eq!(Status::SizeError.code(), 2);
    }

    #[test]
    fn negative_env_capacity_is_zero() {
        let mut resp = EnvResponse {
            netutil_num_envs: -4,
            p_envs: ptr::null_mut(),
        };
        assert_eq!(resp.capacity(), 0);
        assert!(unsafe { resp.slots_mut() }.unwrap().is_empty());
    }

    #[test]
    fn null_env_array_with_capacity_is_rejected() {
        let mut resp = EnvResponse {
            netutil_num_envs: 2,
            p_envs: ptr::null_mut(),
        };
        assert!(matches!(
            unsafe { resp.slots_mut() },
            Err(MarshalError::NullPointer(_))
        ));
    }

    #[test]
    fn payload_follows_type_tag() {
        let mut iface = NetworkInterface {
            kind: alloc_c_string("vhost").unwrap(),
            ..NetworkInterface::default()
        };
        iface.sriov.pci_address = alloc_c_string("0000:03:02.1").unwrap();
        iface.vhost.socket_file = alloc_c_string("/run/vhu.sock").unwrap();
        iface.vhost.master = true;

        let payload = unsafe { iface.payload() }.unwrap();
        assert_eq!(
            payload,
            InterfacePayload::Vhost(VhostData {
                socket_file: "/run/vhu.sock".to_string(),
                master: true,
            })
        );

        unsafe { iface.release() };
        assert!(iface.kind.is_null());
        assert!(iface.sriov.pci_address.is_null());
    }
}
