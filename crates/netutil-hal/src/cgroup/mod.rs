//! cgroup filesystem helpers.

pub mod cpuset;
