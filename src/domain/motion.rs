/// Positions, directions and per-tick move intents.
///
/// Deltas follow screen axes: `h` moves along columns (+1 = right),
/// `v` moves along rows (+1 = down).

/// A cell coordinate on the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

/// Direction the empty cell travels in one move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Candidate order used by the shuffle walk.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(h, v)` unit delta.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Would a unit step from `pos` stay on a `side`×`side` grid?
    pub fn fits(self, pos: Pos, side: usize) -> bool {
        match self {
            Direction::Up => pos.row > 0,
            Direction::Down => pos.row + 1 < side,
            Direction::Left => pos.col > 0,
            Direction::Right => pos.col + 1 < side,
        }
    }
}

/// What the player asked for: move the empty cell this way.
///
/// The tile in the target cell slides the opposite way, so `Up` pulls the
/// tile above the gap down into it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveIntent {
    Up,
    Down,
    Left,
    Right,
}

/// Intents accumulated between two ticks, reduced to one `(h, v)` pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PendingMove {
    h: i32,
    v: i32,
}

impl PendingMove {
    pub fn push(&mut self, intent: MoveIntent) {
        match intent {
            MoveIntent::Up => self.v -= 1,
            MoveIntent::Down => self.v += 1,
            MoveIntent::Left => self.h -= 1,
            MoveIntent::Right => self.h += 1,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.h == 0 && self.v == 0
    }

    /// Consume the pending pair. Each component is clamped to {-1, 0, 1}
    /// and horizontal wins when both axes are set, so the result is never
    /// diagonal.
    pub fn take(&mut self) -> (i32, i32) {
        let h = self.h.signum();
        let v = if h != 0 { 0 } else { self.v.signum() };
        *self = PendingMove::default();
        (h, v)
    }
}
