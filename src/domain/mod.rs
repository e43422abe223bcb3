/// Puzzle core: grid model, moves and the solvable shuffle.

pub mod error;
pub mod grid;
pub mod motion;
pub mod shuffle;
