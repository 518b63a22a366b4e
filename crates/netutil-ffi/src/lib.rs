//! # netutil C API
//!
//! Exposes the allotted CPU set, the process environment, pod network status
//! and SR-IOV / vhost-user interface descriptors through a C ABI, for
//! dataplane applications that cannot link Rust directly.
//!
//! ```text
//! C caller ── GetXxx(resp*) ──► exports ──► DiscoveryOps (netutil-hal)
//!                                   │
//!                                   └─► marshal: SlotWriter ─► resp (caller-owned)
//! ```
//!
//! Status codes: `0` success, `1` failure, `2` caller buffer too small.
//! The network arrays hold at most [`NETUTIL_NUM_NETWORKSTATUS`] /
//! [`NETUTIL_NUM_NETWORKINTERFACE`] entries of at most [`NETUTIL_NUM_IPS`]
//! addresses; the env array has whatever capacity the caller declares.
//!
//! Concurrent calls are fine as long as each uses its own response buffer.
//! There is no timeout: a provider that blocks blocks the caller.

pub mod abi;
pub mod exports;
pub mod logging;
pub mod marshal;
pub mod runtime;
pub mod slots;
pub mod strings;

pub use abi::{
    CPUResponse, CSriovData, CVhostData, EnvData, EnvResponse, NetworkInterface,
    NetworkInterfaceResponse, NetworkStatus, NetworkStatusResponse, Status, NETUTIL_NUM_IPS,
    NETUTIL_NUM_NETWORKINTERFACE, NETUTIL_NUM_NETWORKSTATUS,
};
pub use runtime::install_provider;
