// src/common/error.rs

/// Transport-level failure reported by a register bus or channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ChannelFault {
    /// The transaction did not complete within the channel's own bound.
    #[error("Channel timed out")]
    Timeout,

    /// The device rejected the transaction (negative acknowledgement).
    #[error("Device sent a negative acknowledgement")]
    Nack,

    /// Electrical or framing fault on the bus.
    #[error("Bus fault")]
    BusFault,

    /// Exclusive access to the channel could not be acquired.
    #[error("Channel session unavailable")]
    Busy,
}

/// Errors returned by property operations.
///
/// Every variant is returned to the immediate caller. A failed operation
/// leaves neither a partial register write nor a cache update behind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// The id is not recognized, or is not of the type the accessor asked for.
    #[error("Unknown property")]
    UnknownProperty,

    /// Write attempted on a constant property, or gated while streaming.
    #[error("Operation not permitted on this property")]
    NotPermitted,

    /// Array read buffer too small; `required` is the property's byte length.
    #[error("Buffer too small: needed {required}, got {got}")]
    InsufficientBuffer { required: usize, got: usize },

    /// Array write buffer length differs from the property's byte length.
    #[error("Array size mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// Register transaction failed on the channel.
    #[error("Device communication error: {0}")]
    DeviceCommunication(ChannelFault),

    /// Channel did not complete within its bound.
    #[error("Device communication timed out")]
    Timeout,
}

impl PropertyError {
    /// Byte length the caller should retry `get_array` with, if this error carries one.
    pub fn required_size(&self) -> Option<usize> {
        match self {
            PropertyError::InsufficientBuffer { required, .. } => Some(*required),
            _ => None,
        }
    }
}

impl From<ChannelFault> for PropertyError {
    fn from(fault: ChannelFault) -> Self {
        match fault {
            ChannelFault::Timeout => PropertyError::Timeout,
            other => PropertyError::DeviceCommunication(other),
        }
    }
}
