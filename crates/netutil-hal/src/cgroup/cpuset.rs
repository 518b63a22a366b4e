//! Reading the allotted CPU set from the cpuset controller.

use crate::{HalError, HalResult};
use std::fs;
use std::io;
use std::path::Path;

/// Reads a cpuset list file (e.g. `cpuset.cpus`) and returns its trimmed content.
pub fn read_cpuset_file(path: &Path) -> HalResult<String> {
    let content = fs::read_to_string(path).map_err(|source| HalError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cpus = content.trim();
    if cpus.is_empty() {
        return Err(HalError::Empty {
            what: "cpuset",
            path: path.to_path_buf(),
        });
    }
    Ok(cpus.to_string())
}

/// Reads `primary` (cgroup v1), or `fallback` (cgroup v2) when `primary` does not exist.
pub fn read_cpuset(primary: &Path, fallback: &Path) -> HalResult<String> {
    match read_cpuset_file(primary) {
        Err(HalError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::debug!(
                "{} not found, trying {}",
                primary.display(),
                fallback.display()
            );
            read_cpuset_file(fallback)
        }
        other => other,
    }
}
