/// Render geometry for the board.
///
/// For each occupied cell the renderer gets a destination rectangle (where
/// the tile sits on the board) and a source rectangle (which part of the
/// level picture the tile shows). Both are in render units on a square of
/// side `extent`, inset by the current fade padding.

use crate::domain::grid::Grid;
use crate::domain::motion::Pos;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TileQuad {
    pub tile: usize,
    pub dst: Rect,
    pub src: Rect,
}

/// Inset square for cell `(row, col)`.
pub fn cell_rect(row: usize, col: usize, side: usize, extent: f32, padding: f32) -> Rect {
    let cell = extent / side as f32;
    Rect {
        x: col as f32 * cell + padding,
        y: row as f32 * cell + padding,
        w: cell - padding * 2.0,
        h: cell - padding * 2.0,
    }
}

/// One quad per non-empty cell, row-major.
pub fn tile_quads(grid: &Grid, extent: f32, padding: f32) -> Vec<TileQuad> {
    let side = grid.side();
    let mut quads = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let Some(tile) = grid.cell_at(Pos::new(row, col)) else {
                continue;
            };
            quads.push(TileQuad {
                tile,
                dst: cell_rect(row, col, side, extent, padding),
                src: cell_rect(tile / side, tile % side, side, extent, padding),
            });
        }
    }
    quads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_grid_maps_onto_itself() {
        let mut g = Grid::new(3).unwrap();
        g.detach(Pos::new(2, 2)).unwrap();
        let quads = tile_quads(&g, 600.0, 1.0);
        assert_eq!(quads.len(), 8);
        for q in &quads {
            assert_eq!(q.dst, q.src);
        }
        assert_eq!(quads[4].dst, Rect { x: 201.0, y: 201.0, w: 198.0, h: 198.0 });
    }

    #[test]
    fn moved_tile_samples_its_home() {
        let mut g = Grid::new(3).unwrap();
        g.detach(Pos::new(2, 2)).unwrap();
        g.apply_move(Pos::new(2, 2), 0, -1).unwrap();
        let quads = tile_quads(&g, 600.0, 0.0);
        let five = quads.iter().find(|q| q.tile == 5).unwrap();
        assert_eq!(five.dst, Rect { x: 400.0, y: 400.0, w: 200.0, h: 200.0 });
        assert_eq!(five.src, Rect { x: 400.0, y: 200.0, w: 200.0, h: 200.0 });
    }

    #[test]
    fn padding_shrinks_both_rects() {
        let r = cell_rect(0, 1, 2, 600.0, 150.0);
        assert_eq!(r, Rect { x: 450.0, y: 150.0, w: 0.0, h: 0.0 });
        assert!(!r.contains(450.0, 150.0));
    }

    #[test]
    fn empty_cell_gets_no_quad() {
        let mut g = Grid::new(2).unwrap();
        g.detach(Pos::new(0, 0)).unwrap();
        let quads = tile_quads(&g, 100.0, 0.0);
        assert!(quads.iter().all(|q| q.tile != 0));
        assert_eq!(quads.len(), 3);
    }
}
