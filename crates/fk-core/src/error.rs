use thiserror::Error;

/// Errors reported by film-kit primitives.
///
/// Shape problems are detected at function boundaries so that callers see
/// which operand disagreed instead of an indexing failure deep in a kernel.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: [usize; 4],
        actual: [usize; 4],
    },

    #[error("pyramid level count mismatch: {left} vs {right}")]
    LevelCountMismatch { left: usize, right: usize },

    #[error("pyramid is empty")]
    EmptyPyramid,

    #[error("alignment must be positive")]
    InvalidAlign,

    #[error("pyramid level {level} would be empty ({height}x{width})")]
    LevelTooSmall {
        level: usize,
        height: usize,
        width: usize,
    },

    #[error("expected {expected} batch scalars (or 1), got {actual}")]
    ScalarCount { expected: usize, actual: usize },

    #[error("crop region {region:?} does not fit a {height}x{width} batch")]
    OutOfBounds {
        region: [usize; 4],
        height: usize,
        width: usize,
    },

    #[error("{what} must be positive")]
    NonPositive { what: &'static str },

    #[error("unknown activation '{0}'")]
    UnknownActivation(String),

    #[error(transparent)]
    Layout(#[from] ndarray::ShapeError),
}
