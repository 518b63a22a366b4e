//! Fake HAL implementation for testing.
//!
//! Returns scripted results and records every call, allowing the C API to be
//! tested without a pod, cgroups or a downward API volume.

use super::DiscoveryOps;
use crate::types::{InterfaceFilter, NetworkInterface, NetworkStatus};
use crate::{HalError, HalResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// The four facts a provider can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact {
    CpuSet,
    Env,
    NetworkStatus,
    NetworkInterfaces,
}

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CpuSet,
    Env,
    NetworkStatus,
    NetworkInterfaces { filter: InterfaceFilter },
}

#[derive(Debug, Clone, Default)]
struct FakeHalState {
    operations: Vec<Operation>,
    cpu_set: String,
    env: Vec<(String, String)>,
    network_status: Vec<NetworkStatus>,
    interfaces: Vec<NetworkInterface>,
    failing: HashSet<Fact>,
}

/// Fake HAL that serves scripted facts.
///
/// Interfaces are returned exactly as scripted, whatever the filter, so tests
/// control what the marshaler sees.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cpu_set(self, cpus: impl Into<String>) -> Self {
        self.state.lock().unwrap().cpu_set = cpus.into();
        self
    }

    pub fn with_env<K, V>(self, envs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.state.lock().unwrap().env = envs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_network_status(self, status: Vec<NetworkStatus>) -> Self {
        self.state.lock().unwrap().network_status = status;
        self
    }

    pub fn with_interfaces(self, interfaces: Vec<NetworkInterface>) -> Self {
        self.state.lock().unwrap().interfaces = interfaces;
        self
    }

    /// Make the provider fail when asked for `fact`.
    pub fn failing(self, fact: Fact) -> Self {
        self.state.lock().unwrap().failing.insert(fact);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    fn record(&self, op: Operation, fact: Fact) -> HalResult<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(op);
        if state.failing.contains(&fact) {
            return Err(HalError::Other(format!("fake failure for {:?}", fact)));
        }
        Ok(())
    }
}

impl DiscoveryOps for FakeHal {
    fn cpu_set(&self) -> HalResult<String> {
        self.record(Operation::CpuSet, Fact::CpuSet)?;
        Ok(self.state.lock().unwrap().cpu_set.clone())
    }

    fn env(&self) -> HalResult<Vec<(String, String)>> {
        self.record(Operation::Env, Fact::Env)?;
        Ok(self.state.lock().unwrap().env.clone())
    }

    fn network_status(&self) -> HalResult<Vec<NetworkStatus>> {
        self.record(Operation::NetworkStatus, Fact::NetworkStatus)?;
        Ok(self.state.lock().unwrap().network_status.clone())
    }

    fn network_interfaces(&self, filter: &InterfaceFilter) -> HalResult<Vec<NetworkInterface>> {
        self.record(
            Operation::NetworkInterfaces {
                filter: filter.clone(),
            },
            Fact::NetworkInterfaces,
        )?;
        Ok(self.state.lock().unwrap().interfaces.clone())
    }
}
