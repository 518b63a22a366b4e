use std::env;
use std::path::PathBuf;

pub const DEFAULT_CPUSET_PATH: &str = "/sys/fs/cgroup/cpuset/cpuset.cpus";
pub const DEFAULT_CPUSET_FALLBACK_PATH: &str = "/sys/fs/cgroup/cpuset.cpus.effective";
pub const DEFAULT_ANNOTATIONS_PATH: &str = "/etc/podnetinfo/annotations";

pub const CPUSET_PATH_ENV: &str = "NETUTIL_CPUSET_PATH";
pub const ANNOTATIONS_PATH_ENV: &str = "NETUTIL_ANNOTATIONS_PATH";

/// Where [`crate::LinuxHal`] looks for host facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalConfig {
    /// cgroup v1 cpuset file.
    pub cpuset_path: PathBuf,
    /// cgroup v2 file, consulted when `cpuset_path` does not exist.
    pub cpuset_fallback_path: PathBuf,
    /// Downward API annotations file.
    pub annotations_path: PathBuf,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            cpuset_path: PathBuf::from(DEFAULT_CPUSET_PATH),
            cpuset_fallback_path: PathBuf::from(DEFAULT_CPUSET_FALLBACK_PATH),
            annotations_path: PathBuf::from(DEFAULT_ANNOTATIONS_PATH),
        }
    }
}

impl HalConfig {
    /// Defaults, overridden by `NETUTIL_CPUSET_PATH` / `NETUTIL_ANNOTATIONS_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(CPUSET_PATH_ENV).filter(|p| !p.as_os_str().is_empty()) {
            config.cpuset_path = path;
        }
        if let Some(path) = lookup(ANNOTATIONS_PATH_ENV).filter(|p| !p.as_os_str().is_empty()) {
            config.annotations_path = path;
        }
        config
    }
}
