//! Kubernetes downward API (podinfo) helpers.

pub mod annotations;
pub mod network_status;

pub use annotations::{parse_annotations, read_annotations};
pub use network_status::{
    interfaces_from_status, network_status_from_annotations, NETWORK_STATUS_ANNOTATION,
    NETWORK_STATUS_ANNOTATION_LEGACY,
};
