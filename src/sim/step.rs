/// The tick function: advances a session by one frame.
///
/// Per phase:
///   FadeIn     → shrink padding; then Shuffling (or InProgress on the
///                victory screen, which is never shuffled)
///   Shuffling  → one shuffle step; InProgress once the shuffle is done
///   InProgress → apply at most one player move; FadeOut once solved
///                (the victory screen never fades out)
///   FadeOut    → grow padding; then End
///   End        → advance to the next level (or the victory screen)
///
/// Pending input is consumed every tick, whatever the phase.

use log::{debug, info};

use crate::domain::error::PuzzleResult;

use super::event::GameEvent;
use super::session::{Phase, Session};

pub fn tick(s: &mut Session) -> PuzzleResult<Vec<GameEvent>> {
    let mut events: Vec<GameEvent> = Vec::new();
    s.tick += 1;

    let (h, v) = s.pending.take();

    match s.phase {
        Phase::FadeIn => resolve_fade_in(s, &mut events),
        Phase::Shuffling => resolve_shuffle(s, &mut events)?,
        Phase::InProgress => {
            resolve_move(s, h, v, &mut events)?;
            resolve_solved(s, &mut events);
        }
        Phase::FadeOut => {
            if s.fade.tick_out() {
                s.phase = Phase::End;
                resolve_advance(s, &mut events)?;
            }
        }
        Phase::End => resolve_advance(s, &mut events)?,
    }

    Ok(events)
}

/// Start the current level over with a new shuffle.
pub fn restart_level(s: &mut Session) -> PuzzleResult<Vec<GameEvent>> {
    Ok(vec![s.start_level()?])
}

// ══════════════════════════════════════════════════════════════
// Phase handlers
// ══════════════════════════════════════════════════════════════

fn resolve_fade_in(s: &mut Session, events: &mut Vec<GameEvent>) {
    if !s.fade.tick_in() {
        return;
    }
    s.phase = if s.is_victory() {
        Phase::InProgress
    } else {
        Phase::Shuffling
    };
    events.push(GameEvent::FadeInFinished);
}

fn resolve_shuffle(s: &mut Session, events: &mut Vec<GameEvent>) -> PuzzleResult<()> {
    s.empty = s.shuffler.step(&mut s.grid, s.empty)?;

    if s.shuffler.is_done(&s.grid) {
        let steps = s.shuffler.history().len();
        debug!("shuffle done after {steps} step(s)");
        s.phase = Phase::InProgress;
        events.push(GameEvent::ShuffleFinished { steps });
    }
    Ok(())
}

fn resolve_move(s: &mut Session, h: i32, v: i32, events: &mut Vec<GameEvent>) -> PuzzleResult<()> {
    if h == 0 && v == 0 {
        return Ok(());
    }
    let from = s.empty;
    let to = s.grid.apply_move(from, h, v)?;
    if to != from {
        s.empty = to;
        s.moves += 1;
        events.push(GameEvent::TileMoved { from, to });
    }
    Ok(())
}

fn resolve_solved(s: &mut Session, events: &mut Vec<GameEvent>) {
    if s.is_victory() || !s.grid.is_solved() {
        return;
    }
    let level = s.levels.current();
    info!("{level} solved in {} move(s)", s.moves);
    s.phase = Phase::FadeOut;
    events.push(GameEvent::LevelSolved { level, moves: s.moves });
}

fn resolve_advance(s: &mut Session, events: &mut Vec<GameEvent>) -> PuzzleResult<()> {
    let next = s.levels.advance();
    if next.is_victory() {
        info!("all {} level(s) solved", s.levels.playable_count());
        events.push(GameEvent::VictoryReached);
    }
    events.push(s.start_level()?);
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::motion::{Direction, MoveIntent, Pos};
    use crate::sim::level::{DiscoveredLevel, LevelIndex, LevelSequencer};
    use crate::sim::session::SessionSettings;

    fn levels(k: usize) -> LevelSequencer {
        let mut entries: Vec<DiscoveredLevel> = (0..k)
            .map(|i| DiscoveredLevel { name: format!("l{i}"), asset: i, is_victory: false })
            .collect();
        entries.push(DiscoveredLevel { name: "winner".into(), asset: k, is_victory: true });
        LevelSequencer::new(entries).unwrap()
    }

    fn session(k: usize, side: usize, difficulty: u32, seed: u64) -> Session {
        Session::new(levels(k), SessionSettings { side, difficulty }, seed).unwrap()
    }

    /// Tick until the phase changes, collecting events.
    fn run_phase(s: &mut Session) -> Vec<GameEvent> {
        let start = s.phase();
        let mut all = vec![];
        for _ in 0..10_000 {
            all.extend(tick(s).unwrap());
            if s.phase() != start {
                return all;
            }
        }
        panic!("phase {start:?} never ended");
    }

    /// Intent that moves the empty cell by `dir`.
    fn intent_for(dir: Direction) -> MoveIntent {
        match dir {
            Direction::Up => MoveIntent::Up,
            Direction::Down => MoveIntent::Down,
            Direction::Left => MoveIntent::Left,
            Direction::Right => MoveIntent::Right,
        }
    }

    /// Undo the shuffle one tick at a time through player input.
    fn solve_by_input(s: &mut Session) -> Vec<GameEvent> {
        let undo: Vec<Direction> = s.shuffle_history().iter().rev().map(|d| d.opposite()).collect();
        let mut all = vec![];
        for dir in undo {
            if s.phase() != Phase::InProgress {
                break;
            }
            s.push_intent(intent_for(dir));
            all.extend(tick(s).unwrap());
        }
        all
    }

    #[test]
    fn level_goes_through_all_phases() {
        let mut s = session(2, 3, 10, 5);
        assert_eq!(s.phase(), Phase::FadeIn);

        let ev = run_phase(&mut s);
        assert_eq!(ev, vec![GameEvent::FadeInFinished]);
        assert_eq!(s.phase(), Phase::Shuffling);

        let ev = run_phase(&mut s);
        assert!(matches!(ev.last(), Some(GameEvent::ShuffleFinished { .. })));
        assert_eq!(s.phase(), Phase::InProgress);
        assert!(!s.grid().is_solved());

        let ev = solve_by_input(&mut s);
        assert!(s.grid().is_solved());
        assert_eq!(s.phase(), Phase::FadeOut);
        assert!(ev.iter().any(|e| matches!(
            e,
            GameEvent::LevelSolved { level: LevelIndex::Playable(0), .. }
        )));

        let ev = run_phase(&mut s);
        assert_eq!(ev, vec![GameEvent::LevelStarted { level: LevelIndex::Playable(1) }]);
        assert_eq!(s.phase(), Phase::FadeIn);
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn last_level_leads_to_unshuffled_victory() {
        let mut s = session(1, 3, 6, 11);
        run_phase(&mut s);
        run_phase(&mut s);
        solve_by_input(&mut s);
        let ev = run_phase(&mut s);
        assert_eq!(
            ev,
            vec![
                GameEvent::VictoryReached,
                GameEvent::LevelStarted { level: LevelIndex::Victory },
            ]
        );
        assert!(s.is_victory());

        // Victory screen skips shuffling.
        run_phase(&mut s);
        assert_eq!(s.phase(), Phase::InProgress);
        assert!(s.grid().is_solved());
        assert!(s.shuffle_history().is_empty());
    }

    #[test]
    fn victory_screen_never_fades_out() {
        let mut s = session(1, 3, 4, 2);
        run_phase(&mut s);
        run_phase(&mut s);
        solve_by_input(&mut s);
        run_phase(&mut s);
        run_phase(&mut s);
        assert!(s.is_victory());

        // Move away and back: solved again, still in progress.
        s.push_intent(MoveIntent::Up);
        tick(&mut s).unwrap();
        assert!(!s.grid().is_solved());
        s.push_intent(MoveIntent::Down);
        tick(&mut s).unwrap();
        assert!(s.grid().is_solved());
        for _ in 0..50 {
            tick(&mut s).unwrap();
        }
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn victory_flag_comes_from_the_sequencer() {
        let mut s = session(1, 3, 3, 4);
        assert!(!s.is_victory());
        assert!(!s.levels().is_victory());
        run_phase(&mut s);
        run_phase(&mut s);
        solve_by_input(&mut s);
        run_phase(&mut s);
        assert!(s.levels().is_victory());
        assert!(s.is_victory());
        assert_eq!(s.level().index, LevelIndex::Victory);
    }

    #[test]
    fn up_press_moves_gap_up() {
        let mut s = session(1, 3, 4, 2);
        run_phase(&mut s);
        run_phase(&mut s);
        solve_by_input(&mut s);
        run_phase(&mut s);
        run_phase(&mut s);
        assert!(s.is_victory());
        assert_eq!(s.empty(), Pos::new(2, 2));

        s.push_intent(MoveIntent::Up);
        tick(&mut s).unwrap();
        assert_eq!(s.empty(), Pos::new(1, 2));

        s.push_intent(MoveIntent::Left);
        tick(&mut s).unwrap();
        assert_eq!(s.empty(), Pos::new(1, 1));

        s.push_intent(MoveIntent::Right);
        tick(&mut s).unwrap();
        s.push_intent(MoveIntent::Down);
        tick(&mut s).unwrap();
        assert_eq!(s.empty(), Pos::new(2, 2));
        assert!(s.grid().is_solved());
    }

    #[test]
    fn input_outside_play_is_discarded() {
        let mut s = session(1, 3, 5, 9);
        s.push_intent(MoveIntent::Up);
        run_phase(&mut s);
        run_phase(&mut s);
        let before = s.grid().clone();
        tick(&mut s).unwrap();
        assert_eq!(s.grid(), &before);
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn both_axes_pressed_moves_horizontally() {
        let mut s = session(1, 3, 0, 1);
        run_phase(&mut s);
        run_phase(&mut s);
        let gap = s.empty();

        // Pick a horizontal direction that is legal from here.
        let (intent, expect_col) = if gap.col > 0 {
            (MoveIntent::Left, gap.col - 1)
        } else {
            (MoveIntent::Right, gap.col + 1)
        };
        s.push_intent(MoveIntent::Down);
        s.push_intent(intent);
        let ev = tick(&mut s).unwrap();
        assert_eq!(s.empty(), Pos::new(gap.row, expect_col));
        assert!(matches!(ev.first(), Some(GameEvent::TileMoved { .. })));
    }

    #[test]
    fn blocked_move_does_not_count() {
        let mut s = session(1, 3, 0, 3);
        run_phase(&mut s);
        run_phase(&mut s);

        // Walk the gap into the top-left corner.
        for _ in 0..3 {
            s.push_intent(MoveIntent::Up);
            tick(&mut s).unwrap();
            s.push_intent(MoveIntent::Left);
            tick(&mut s).unwrap();
        }
        assert_eq!(s.empty(), Pos::new(0, 0));

        let moves = s.moves();
        s.push_intent(MoveIntent::Up);
        let ev = tick(&mut s).unwrap();
        assert!(ev.is_empty());
        assert_eq!(s.empty(), Pos::new(0, 0));
        assert_eq!(s.moves(), moves);
    }

    #[test]
    fn zero_difficulty_still_shuffles_once() {
        let mut s = session(1, 3, 0, 77);
        run_phase(&mut s);
        assert_eq!(s.phase(), Phase::Shuffling);
        let ev = tick(&mut s).unwrap();
        assert_eq!(ev, vec![GameEvent::ShuffleFinished { steps: 1 }]);
        assert!(!s.grid().is_solved());
    }

    #[test]
    fn same_seed_and_input_give_same_run() {
        let script = [
            MoveIntent::Right,
            MoveIntent::Down,
            MoveIntent::Left,
            MoveIntent::Up,
            MoveIntent::Up,
            MoveIntent::Right,
        ];
        let mut runs = vec![];
        for _ in 0..2 {
            let mut s = session(3, 4, 40, 2024);
            for i in 0..400 {
                s.push_intent(script[i % script.len()]);
                tick(&mut s).unwrap();
            }
            runs.push((s.grid().clone(), s.empty(), s.phase(), s.levels().current(), s.moves()));
        }
        assert_eq!(runs[0], runs[1]);
    }

    #[test]
    fn different_levels_get_different_shuffles() {
        let mut s = session(2, 4, 30, 8);
        run_phase(&mut s);
        run_phase(&mut s);
        let first = s.shuffle_history().to_vec();
        solve_by_input(&mut s);
        run_phase(&mut s);
        run_phase(&mut s);
        run_phase(&mut s);
        assert_ne!(first, s.shuffle_history());
    }

    #[test]
    fn restart_reshuffles_same_level() {
        let mut s = session(2, 3, 8, 4);
        run_phase(&mut s);
        run_phase(&mut s);
        let ev = restart_level(&mut s).unwrap();
        assert_eq!(ev, vec![GameEvent::LevelStarted { level: LevelIndex::Playable(0) }]);
        assert_eq!(s.phase(), Phase::FadeIn);
        assert!(s.grid().is_solved());
        assert_eq!(s.empty(), Pos::new(2, 2));
    }

    #[test]
    fn skip_fade_finishes_next_tick() {
        let mut s = session(1, 3, 3, 6);
        s.skip_fade();
        let ev = tick(&mut s).unwrap();
        assert_eq!(ev, vec![GameEvent::FadeInFinished]);
    }

    #[test]
    fn quads_follow_fade_padding() {
        let s = session(1, 3, 3, 6);
        let quads = s.tile_quads();
        assert_eq!(quads.len(), 8);
        // Fully hidden at level start: tiles are inset by half a cell.
        assert!(quads.iter().all(|q| q.dst.w == 0.0));
    }

    #[test]
    fn side_below_two_fails_session() {
        let r = Session::new(levels(1), SessionSettings { side: 1, difficulty: 3 }, 0);
        assert!(r.is_err());
    }
}
