/// Solvable shuffle: a random walk of the empty cell starting from solved.
///
/// Every step is an ordinary grid move, so the resulting arrangement is
/// always reachable from solved and therefore always solvable. The walk
/// never undoes its previous step, which keeps short budgets from
/// bouncing between two states.
///
/// This is not a uniform sample over solvable permutations; it only
/// promises reachability.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{PuzzleError, PuzzleResult};
use super::grid::Grid;
use super::motion::{Direction, Pos};

pub struct Shuffler {
    rng: StdRng,
    remaining_steps: u32,
    last_direction: Option<Direction>,
    history: Vec<Direction>,
}

impl Shuffler {
    pub fn new(seed: u64, difficulty: u32) -> Self {
        Shuffler {
            rng: StdRng::seed_from_u64(seed),
            remaining_steps: difficulty,
            last_direction: None,
            history: Vec::with_capacity(difficulty as usize),
        }
    }

    /// Take one step of the walk and return the new empty position.
    pub fn step(&mut self, grid: &mut Grid, empty: Pos) -> PuzzleResult<Pos> {
        let side = grid.side();
        let back = self.last_direction.map(Direction::opposite);

        let mut candidates = [Direction::Up; 4];
        let mut ways = 0;
        for dir in Direction::ALL {
            if dir.fits(empty, side) && Some(dir) != back {
                candidates[ways] = dir;
                ways += 1;
            }
        }

        if ways == 0 {
            return Err(PuzzleError::InternalInvariant(format!(
                "no legal shuffle move from ({}, {}) on a {}x{} grid",
                empty.row, empty.col, side, side
            )));
        }

        let dir = candidates[self.rng.random_range(0..ways)];
        let (h, v) = dir.delta();
        let next = grid.apply_move(empty, h, v)?;

        self.last_direction = Some(dir);
        self.history.push(dir);
        self.remaining_steps = self.remaining_steps.saturating_sub(1);
        Ok(next)
    }

    /// Budget spent and the grid actually scrambled.
    ///
    /// A walk that lands back on solved keeps going past its budget.
    pub fn is_done(&self, grid: &Grid) -> bool {
        self.remaining_steps == 0 && !grid.is_solved()
    }

    /// Directions applied so far, oldest first.
    pub fn history(&self) -> &[Direction] {
        &self.history
    }
}
