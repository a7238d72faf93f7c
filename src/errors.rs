use thiserror::Error;

/// Everything that can go wrong while building or driving a ring buffer.
///
/// `Full` and `Empty` are recoverable: a failed push or pop leaves the
/// buffer exactly as it was, so the caller can inspect it and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer is full")]
    Full,

    #[error("Buffer is empty")]
    Empty,

    #[error("Invalid capacity: must be positive (got {capacity})")]
    InvalidCapacity { capacity: usize },

    #[error("Invalid capacity: cannot allocate {capacity} slots")]
    TooLarge { capacity: usize },
}

impl BufferError {
    /// Stable short label, used as the `kind` field of JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            BufferError::Full                   => "full",
            BufferError::Empty                  => "empty",
            BufferError::InvalidCapacity { .. } => "invalid_capacity",
            BufferError::TooLarge { .. }        => "too_large",
        }
    }

    /// True for the two errors a caller is expected to handle and carry on from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BufferError::Full | BufferError::Empty)
    }
}
