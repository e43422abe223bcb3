/// Session: everything one play-through owns.
///
/// The session is the single context object the game loop passes to
/// `step::tick` every frame. It owns the grid, the empty-cell position,
/// the shuffle for the current level, the fade, the level sequence and
/// the pending player input. Nothing here is global.
///
/// ## Determinism
///
/// A master PRNG seeded once at startup hands out the seed for every
/// level's shuffle. Same startup seed + same input sequence = same run.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::{PuzzleError, PuzzleResult};
use crate::domain::grid::Grid;
use crate::domain::motion::{MoveIntent, PendingMove, Pos};
use crate::domain::shuffle::Shuffler;

use super::event::GameEvent;
use super::fade::{Fade, RENDER_EXTENT};
use super::layout::{self, TileQuad};
use super::level::{Level, LevelSequencer};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    FadeIn,
    Shuffling,
    InProgress,
    FadeOut,
    /// Transient: the level is over and advancement runs immediately.
    End,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionSettings {
    pub side: usize,
    pub difficulty: u32,
}

pub struct Session {
    pub(super) phase: Phase,
    pub(super) grid: Grid,
    pub(super) empty: Pos,
    pub(super) shuffler: Shuffler,
    pub(super) fade: Fade,
    pub(super) levels: LevelSequencer,
    pub(super) pending: PendingMove,
    pub(super) moves: u32,
    pub(super) tick: u64,
    rng: StdRng,
    settings: SessionSettings,
}

impl Session {
    /// Build a session and start the first playable level.
    pub fn new(levels: LevelSequencer, settings: SessionSettings, seed: u64) -> PuzzleResult<Self> {
        // Validates the side before anything else is set up.
        let grid = Grid::new(settings.side)?;
        let mut session = Session {
            phase: Phase::FadeIn,
            grid,
            empty: Pos::default(),
            shuffler: Shuffler::new(0, 0),
            fade: Fade::for_side(settings.side),
            levels,
            pending: PendingMove::default(),
            moves: 0,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
            settings,
        };
        session.start_level()?;
        Ok(session)
    }

    /// (Re)start whatever level the sequencer points at.
    ///
    /// Fresh solved grid with the bottom-right tile removed, fresh shuffle,
    /// fade from hidden.
    pub fn start_level(&mut self) -> PuzzleResult<GameEvent> {
        let side = self.settings.side;
        let mut grid = Grid::new(side)?;
        grid.detach(Pos::new(side - 1, side - 1))?;
        let empty = grid
            .empty_position()
            .ok_or_else(|| PuzzleError::InternalInvariant("detached grid has no gap".into()))?;

        self.grid = grid;
        self.empty = empty;
        self.shuffler = Shuffler::new(self.rng.random(), self.settings.difficulty);
        self.fade = Fade::for_side(side);
        self.phase = Phase::FadeIn;
        self.pending = PendingMove::default();
        self.moves = 0;

        let level = self.levels.current_level();
        info!("starting {} \"{}\"", level.index, level.name);
        Ok(GameEvent::LevelStarted { level: level.index })
    }

    /// Queue a player intent for the next tick.
    pub fn push_intent(&mut self, intent: MoveIntent) {
        self.pending.push(intent);
    }

    /// Finish the running fade on the next tick.
    pub fn skip_fade(&mut self) {
        match self.phase {
            Phase::FadeIn => self.fade.show(),
            Phase::FadeOut => self.fade.hide(),
            _ => {}
        }
    }

    /// Geometry for the renderer at the current fade padding.
    pub fn tile_quads(&self) -> Vec<TileQuad> {
        layout::tile_quads(&self.grid, RENDER_EXTENT as f32, self.fade.padding() as f32)
    }

    // ── Queries ──

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub fn empty(&self) -> Pos {
        self.empty
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn level(&self) -> &Level {
        self.levels.current_level()
    }

    pub fn levels(&self) -> &LevelSequencer {
        &self.levels
    }

    pub fn is_victory(&self) -> bool {
        self.levels.is_victory()
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Directions the current level's shuffle has applied, oldest first.
    #[cfg(test)]
    pub fn shuffle_history(&self) -> &[crate::domain::motion::Direction] {
        self.shuffler.history()
    }
}
