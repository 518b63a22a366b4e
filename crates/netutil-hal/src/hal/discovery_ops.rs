//! Discovery operations (read-only).
//!
//! This is "world-touching" (reads `/sys`, the downward API, the process
//! environment) and belongs in the HAL.

use crate::types::{InterfaceFilter, NetworkInterface, NetworkStatus};
use crate::HalResult;

/// Source of host facts for the C API.
///
/// Implementations must be safe for concurrent reads; the C API calls them
/// from whatever thread the foreign caller uses.
pub trait DiscoveryOps: Send + Sync {
    /// Allotted CPU set in cpuset list format, e.g. `0-3,7`.
    fn cpu_set(&self) -> HalResult<String>;

    /// Environment as (name, value) pairs. Order is the provider's and is
    /// preserved by callers.
    fn env(&self) -> HalResult<Vec<(String, String)>>;

    fn network_status(&self) -> HalResult<Vec<NetworkStatus>>;

    fn network_interfaces(&self, filter: &InterfaceFilter) -> HalResult<Vec<NetworkInterface>>;
}
