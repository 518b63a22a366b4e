//! HAL trait definitions and implementations.
//!
//! This module defines the discovery trait consumed by the C API and provides
//! both real (LinuxHal) and fake (FakeHal) implementations.

pub mod discovery_ops;
pub mod fake_hal;
pub mod linux_hal;

pub use discovery_ops::DiscoveryOps;
pub use fake_hal::{Fact, FakeHal, Operation};
pub use linux_hal::LinuxHal;
