use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Failures of the discovery provider.
#[derive(Error, Debug)]
pub enum HalError {
    #[error("I/O error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what} is empty: {path}")]
    Empty { what: &'static str, path: PathBuf },

    #[error("annotation not found: {0}")]
    MissingAnnotation(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures while copying provider results into a caller-owned buffer.
#[derive(Error, Debug)]
pub enum MarshalError {
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("{what} not sized properly: capacity {capacity}")]
    SizeExceeded { what: &'static str, capacity: usize },

    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),

    #[error("failed to allocate {0} bytes for a boundary string")]
    Alloc(usize),

    #[error("panic at the boundary: {0}")]
    Panic(String),
}

impl MarshalError {
    /// True when the caller's buffer, not the provider, caused the failure.
    pub fn is_size_error(&self) -> bool {
        matches!(self, MarshalError::SizeExceeded { .. })
    }
}
