/// The N×N tile arrangement.
///
/// Cells are stored row-major. A cell holds the identifier of the tile
/// currently sitting there, or `None` for the single empty slot.
/// Tile `k` belongs at index `k`; the grid is solved when every tile is
/// home, wherever the gap happens to be.
///
/// The grid does not track the gap itself. Callers keep the empty
/// position and feed it back into `apply_move`, which checks it against
/// the cells before touching anything.

use super::error::{PuzzleError, PuzzleResult};
use super::motion::Pos;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Grid {
    side: usize,
    cells: Vec<Option<usize>>,
}

impl Grid {
    /// A solved `side`×`side` grid with no gap yet.
    pub fn new(side: usize) -> PuzzleResult<Self> {
        let mut grid = Grid::default();
        grid.initialize(side)?;
        Ok(grid)
    }

    /// Reset to the solved configuration.
    pub fn initialize(&mut self, side: usize) -> PuzzleResult<()> {
        if side < 2 {
            return Err(PuzzleError::InvalidArgument(format!(
                "grid side must be at least 2, got {side}"
            )));
        }
        self.side = side;
        self.cells = (0..side * side).map(Some).collect();
        Ok(())
    }

    /// Remove the tile at `pos`, leaving the grid's one free slot.
    pub fn detach(&mut self, pos: Pos) -> PuzzleResult<()> {
        self.ensure_initialized()?;
        if !self.contains(pos) {
            return Err(PuzzleError::InvalidArgument(format!(
                "cannot detach ({}, {}) on a {}x{} grid",
                pos.row, pos.col, self.side, self.side
            )));
        }
        if self.cells.iter().any(Option::is_none) {
            return Err(PuzzleError::InvalidState("grid already has an empty cell".into()));
        }
        let idx = self.index(pos);
        self.cells[idx] = None;
        Ok(())
    }

    /// Move the empty cell at `empty` by `(h, v)` and return where it ends up.
    ///
    /// `(0, 0)` and moves clamped back onto the source are no-ops.
    /// Diagonal or multi-step deltas are rejected.
    pub fn apply_move(&mut self, empty: Pos, h: i32, v: i32) -> PuzzleResult<Pos> {
        self.ensure_initialized()?;

        if h == 0 && v == 0 {
            return Ok(empty);
        }
        if h != 0 && v != 0 {
            return Err(PuzzleError::InvalidMove { h, v });
        }
        if h.abs() > 1 || v.abs() > 1 {
            return Err(PuzzleError::InvalidMove { h, v });
        }
        if !self.contains(empty) || self.cells[self.index(empty)].is_some() {
            return Err(PuzzleError::InvalidState(format!(
                "({}, {}) is not the empty cell",
                empty.row, empty.col
            )));
        }

        let target = Pos {
            row: clamp_axis(empty.row, v, self.side),
            col: clamp_axis(empty.col, h, self.side),
        };
        if target == empty {
            return Ok(empty);
        }

        let (a, b) = (self.index(empty), self.index(target));
        self.cells.swap(a, b);
        Ok(target)
    }

    pub fn is_solved(&self) -> bool {
        if self.side == 0 {
            return false;
        }
        self.cells
            .iter()
            .enumerate()
            .all(|(k, cell)| cell.map_or(true, |tile| tile == k))
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Tile at `pos`, `None` for the gap (or outside the grid).
    pub fn cell_at(&self, pos: Pos) -> Option<usize> {
        if self.contains(pos) {
            self.cells[self.index(pos)]
        } else {
            None
        }
    }

    /// Where the gap currently is, if any.
    pub fn empty_position(&self) -> Option<Pos> {
        let side = self.side;
        self.cells
            .iter()
            .position(Option::is_none)
            .map(|k| Pos::new(k / side, k % side))
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    // ── Internal ──

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row * self.side + pos.col
    }

    #[inline]
    fn contains(&self, pos: Pos) -> bool {
        pos.row < self.side && pos.col < self.side
    }

    fn ensure_initialized(&self) -> PuzzleResult<()> {
        if self.side == 0 {
            Err(PuzzleError::InvalidState("grid is not initialized".into()))
        } else {
            Ok(())
        }
    }
}

fn clamp_axis(at: usize, delta: i32, side: usize) -> usize {
    (at as i64 + delta as i64).clamp(0, side as i64 - 1) as usize
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
