/// Fade transition driven by a padding value.
///
/// Tiles are drawn inset by `padding` render units on every side. A fade
/// in shrinks the padding from half a cell down to 1 (tiles grow until
/// they touch); a fade out grows it back to half a cell (tiles vanish).

/// Side of the square the board is laid out in, in render units.
pub const RENDER_EXTENT: u32 = 600;

const MIN_PADDING: u32 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fade {
    padding: u32,
    max_padding: u32,
    speed: u32,
}

impl Fade {
    /// A fade for a `side`×`side` board, starting fully hidden.
    pub fn for_side(side: usize) -> Self {
        let cell = RENDER_EXTENT / side.max(1) as u32;
        let max_padding = (cell / 2).max(MIN_PADDING);
        Fade {
            padding: max_padding,
            max_padding,
            speed: (cell / 50).max(1),
        }
    }

    #[inline]
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Advance toward fully shown. Returns true once there.
    pub fn tick_in(&mut self) -> bool {
        self.padding = self.padding.saturating_sub(self.speed).max(MIN_PADDING);
        self.padding <= MIN_PADDING
    }

    /// Advance toward fully hidden. Returns true once there.
    pub fn tick_out(&mut self) -> bool {
        self.padding = (self.padding + self.speed).min(self.max_padding);
        self.padding >= self.max_padding
    }

    pub fn show(&mut self) {
        self.padding = MIN_PADDING;
    }

    pub fn hide(&mut self) {
        self.padding = self.max_padding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_three_constants() {
        let f = Fade::for_side(3);
        assert_eq!(f.padding(), 100);
        assert_eq!(f.speed, 4);
    }

    #[test]
    fn fade_in_reaches_minimum() {
        let mut f = Fade::for_side(3);
        let mut ticks = 0;
        while !f.tick_in() {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(f.padding(), 1);
        // 100 -> 1 at 4 per tick
        assert_eq!(ticks + 1, 25);
    }

    #[test]
    fn fade_out_reaches_half_cell() {
        let mut f = Fade::for_side(4);
        f.show();
        let mut ticks = 0;
        while !f.tick_out() {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(f.padding(), 75);
    }

    #[test]
    fn large_boards_still_move() {
        let mut f = Fade::for_side(40);
        let before = f.padding();
        f.tick_in();
        assert!(f.padding() < before);
    }
}
