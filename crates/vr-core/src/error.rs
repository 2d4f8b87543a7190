use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid stride")]
    InvalidStride,
    /// Unsupported geometry, channel count or method/element pairing.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// A caller-supplied buffer or view does not satisfy the resampler contract.
    #[error("precondition violation: {0}")]
    PreconditionViolation(String),
}
