//! netutil Hardware Abstraction Layer (HAL).
//!
//! The discovery side of the netutil C API: CPU set, environment, network
//! status and network interface descriptors. Callers depend on
//! [`DiscoveryOps`]; [`LinuxHal`] reads the real host, [`FakeHal`] is scripted
//! for tests.

pub mod cgroup;
pub mod config;
pub mod hal;
pub mod podinfo;
pub mod sriov;
pub mod types;

pub use config::HalConfig;
pub use hal::{DiscoveryOps, Fact, FakeHal, LinuxHal, Operation};
pub use netutil_error::{HalError, HalResult};
pub use types::{
    InterfaceFilter, InterfacePayload, InterfaceType, NetworkInterface, NetworkStatus, SriovData,
    VhostData,
};
