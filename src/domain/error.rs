/// Errors raised by the puzzle core (grid + shuffle).
///
/// All of them are synchronous and local: the caller that triggered the
/// failure gets it back and decides whether the game loop survives.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Bad construction parameters (side < 2, coordinates off the grid).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A move that is not a single step along one axis.
    #[error("invalid move: h={h}, v={v}")]
    InvalidMove { h: i32, v: i32 },

    /// Operation not valid in the grid's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A core invariant no longer holds. Not recoverable.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type PuzzleResult<T> = Result<T, PuzzleError>;
