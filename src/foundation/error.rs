/// Crate-wide result alias.
pub type SpiralResult<T> = Result<T, SpiralError>;

/// Errors produced while synthesizing, rendering or encoding a spiral.
#[derive(thiserror::Error, Debug)]
pub enum SpiralError {
    /// Caller-supplied parameters or configuration are out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// The texture buffer could not be allocated.
    #[error("allocation error: failed to reserve {bytes} bytes for the spiral texture")]
    Allocation {
        /// Number of bytes requested.
        bytes: usize,
    },

    /// Frame rendering failed (thread pool construction, frame bookkeeping).
    #[error("render error: {0}")]
    Render(String),

    /// Writing frames to a sink failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration could not be parsed or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpiralError {
    /// Build a [`SpiralError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpiralError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SpiralError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SpiralError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
