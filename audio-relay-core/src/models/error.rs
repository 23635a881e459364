use thiserror::Error;

/// Errors that can occur in the trailing-window pipeline.
///
/// All variants are local, synchronous, and non-retryable by this crate;
/// retry policy for transport failures belongs to the external client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("requested {requested} samples from a ring of capacity {capacity}")]
    OutOfRange { requested: usize, capacity: usize },

    #[error("invalid window duration {seconds}s: {reason}")]
    InvalidDuration { seconds: f64, reason: String },

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("transport error: {0}")]
    Transport(String),
}
