//! Process-wide state: logger and discovery provider, set up exactly once.

use crate::logging;
use netutil_hal::{DiscoveryOps, HalConfig, LinuxHal};
use once_cell::sync::OnceCell;

pub struct Runtime {
    hal: Box<dyn DiscoveryOps>,
}

impl Runtime {
    pub fn hal(&self) -> &dyn DiscoveryOps {
        self.hal.as_ref()
    }
}

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Returns the runtime, initialising it with a [`LinuxHal`] configured from
/// the environment on first use.
pub fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        logging::init();
        let config = HalConfig::from_env();
        log::debug!("netutil runtime initialised with {:?}", config);
        Runtime {
            hal: Box::new(LinuxHal::new(config)),
        }
    })
}

/// Installs `hal` as the provider for all entry points.
///
/// Only possible before the first call into the library; afterwards the
/// provider is handed back in `Err`.
pub fn install_provider(hal: Box<dyn DiscoveryOps>) -> Result<(), Box<dyn DiscoveryOps>> {
    logging::init();
    RUNTIME
        .set(Runtime { hal })
        .map_err(|runtime| runtime.hal)
}
