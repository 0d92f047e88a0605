use thiserror::Error;

/// Errors raised by vector algebra on degenerate input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,

    #[error("reference direction is parallel to the primary direction")]
    ParallelReference,
}

pub type MathResult<T> = Result<T, MathError>;
