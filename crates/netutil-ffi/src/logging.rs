use env_logger::{Env, Target};

/// Filter variable for the library's logger.
pub const LOG_ENV: &str = "NETUTIL_LOG";

/// Installs an stderr logger filtered by `NETUTIL_LOG` (default `warn`).
///
/// Leaves an already-installed logger in place; a host application that
/// configures `log` itself keeps its own setup.
pub fn init() {
    let installed = env_logger::Builder::from_env(Env::new().filter_or(LOG_ENV, "warn"))
        .target(Target::Stderr)
        .try_init()
        .is_ok();
    if installed {
        log::debug!("netutil logger installed");
    }
}
