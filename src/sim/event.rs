/// Events emitted during a session tick.
/// The presentation layer consumes these for sound and window title.

use crate::domain::motion::Pos;

use super::level::LevelIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: LevelIndex },
    FadeInFinished,
    ShuffleFinished { steps: usize },
    TileMoved { from: Pos, to: Pos },
    LevelSolved { level: LevelIndex, moves: u32 },
    VictoryReached,
}
