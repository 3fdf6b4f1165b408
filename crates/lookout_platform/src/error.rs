//! Host error types

use thiserror::Error;

use crate::host::ElementId;

/// Host-related errors
///
/// None of these are fatal for an observer: every caller degrades to a
/// well-defined default when a host facility is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The facility exists on this host but is not available right now
    /// (e.g. no window object)
    #[error("Host facility not available: {0}")]
    Unavailable(String),

    /// The facility does not exist on this host
    #[error("Host facility not supported: {0}")]
    Unsupported(String),

    /// The element handle does not refer to a live element
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementId),

    /// Generic host error
    #[error("Host error: {0}")]
    Other(String),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, PlatformError>;
