//! Exported C entry points.
//!
//! Every entry point returns a [`Status`] code; nothing unwinds across the
//! boundary. Response buffers are owned by the caller and should be
//! zero-initialised; strings written into them are released with `free()`,
//! `NetutilFreeString` or the matching `Free*Response` helper.

#![allow(non_snake_case)]

use crate::abi::{CPUResponse, EnvResponse, NetworkInterfaceResponse, NetworkStatusResponse, Status};
use crate::marshal;
use crate::runtime::runtime;
use crate::strings::{free_c_string, read_c_string};
use libc::c_char;
use netutil_error::{MarshalError, MarshalResult};
use netutil_hal::{DiscoveryOps, InterfaceFilter};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub(crate) fn status_of(entry: &str, result: MarshalResult<()>) -> Status {
    match result {
        Ok(()) => Status::Success,
        Err(err) => {
            let status = Status::from(&err);
            match status {
                Status::SizeError => log::error!("{}: {}", entry, err),
                _ => log::error!("{} err: {}", entry, err),
            }
            status
        }
    }
}

fn guard<F>(entry: &str, f: F) -> i64
where
    F: FnOnce(&dyn DiscoveryOps) -> MarshalResult<()>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(runtime().hal())));
    let result = outcome.unwrap_or_else(|payload| {
        Err(MarshalError::Panic(panic_message(payload.as_ref())))
    });
    status_of(entry, result).code()
}

/// Initialises logging and the discovery provider. Idempotent; calling it is
/// optional, the first entry point call does the same.
#[no_mangle]
pub extern "C" fn NetutilInit() -> i64 {
    guard("NetutilInit", |_| Ok(()))
}

/// # Safety
/// `resp` must be null or point at a writable `CPUResponse`.
#[no_mangle]
pub unsafe extern "C" fn GetCPUInfo(resp: *mut CPUResponse) -> i64 {
    guard("GetCPUInfo", |hal| {
        let resp = resp
            .as_mut()
            .ok_or(MarshalError::NullPointer("CPUResponse"))?;
        marshal::marshal_cpu_info(hal, resp)
    })
}

/// # Safety
/// `resp` must be null or point at an `EnvResponse` whose `pEnvs` holds
/// `netutil_num_envs` writable slots.
#[no_mangle]
pub unsafe extern "C" fn GetEnv(resp: *mut EnvResponse) -> i64 {
    guard("GetEnv", |hal| {
        let resp = resp
            .as_mut()
            .ok_or(MarshalError::NullPointer("EnvResponse"))?;
        let slots = resp.slots_mut()?;
        marshal::marshal_env(hal, slots)
    })
}

/// # Safety
/// `resp` must be null or point at a writable `NetworkStatusResponse`.
#[no_mangle]
pub unsafe extern "C" fn GetNetworkStatus(resp: *mut NetworkStatusResponse) -> i64 {
    guard("GetNetworkStatus", |hal| {
        let resp = resp
            .as_mut()
            .ok_or(MarshalError::NullPointer("NetworkStatusResponse"))?;
        marshal::marshal_network_status(hal, resp)
    })
}

/// `int_type` is `"pci"`, `"vhost"` or empty (both); null counts as empty.
///
/// # Safety
/// `int_type` must be null or NUL-terminated; `resp` must be null or point at
/// a writable `NetworkInterfaceResponse`.
#[no_mangle]
pub unsafe extern "C" fn GetNetworkInterface(
    int_type: *const c_char,
    resp: *mut NetworkInterfaceResponse,
) -> i64 {
    guard("GetNetworkInterface", |hal| {
        let resp = resp
            .as_mut()
            .ok_or(MarshalError::NullPointer("NetworkInterfaceResponse"))?;
        let filter = InterfaceFilter::parse(&read_c_string(int_type).unwrap_or_default());
        marshal::marshal_network_interface(hal, &filter, resp)
    })
}

/// # Safety
/// `s` must be null or a string returned by this library, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn NetutilFreeString(s: *mut c_char) {
    free_c_string(s);
}

/// # Safety
/// `resp` must be null or a response filled by `GetCPUInfo`.
#[no_mangle]
pub unsafe extern "C" fn FreeCPUResponse(resp: *mut CPUResponse) {
    if let Some(resp) = resp.as_mut() {
        resp.release();
    }
}

/// Frees the strings in the slots; the slot array itself stays with the caller.
///
/// # Safety
/// `resp` must be null or a response filled by `GetEnv`.
#[no_mangle]
pub unsafe extern "C" fn FreeEnvResponse(resp: *mut EnvResponse) {
    if let Some(resp) = resp.as_mut() {
        resp.release();
    }
}

/// # Safety
/// `resp` must be null or a response filled by `GetNetworkStatus`.
#[no_mangle]
pub unsafe extern "C" fn FreeNetworkStatusResponse(resp: *mut NetworkStatusResponse) {
    if let Some(resp) = resp.as_mut() {
        resp.release();
    }
}

/// # Safety
/// `resp` must be null or a response filled by `GetNetworkInterface`.
#[no_mangle]
pub unsafe extern "C" fn FreeNetworkInterfaceResponse(resp: *mut NetworkInterfaceResponse) {
    if let Some(resp) = resp.as_mut() {
        resp.release();
    }
}
