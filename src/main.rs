/// Entry point and game loop.

mod cli;
mod config;
mod domain;
mod sim;
mod ui;

use std::error::Error;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::KeyCode;
use log::{error, info, warn};

use cli::Args;
use config::GameConfig;
use domain::motion::MoveIntent;
use sim::event::GameEvent;
use sim::level::{self, LevelIndex, LevelSequencer};
use sim::session::{Session, SessionSettings};
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::picture::{self, PictureStore};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let args = Args::parse();
    cli::init_logging(&args);

    let mut config = GameConfig::load();
    args.apply(&mut config);

    let start = args.level.map(|n| n as usize - 1);
    if let Err(e) = run(&config, start) {
        error!("{e}");
        eprintln!("tileshift: {e}");
        std::process::exit(1);
    }
}

fn run(config: &GameConfig, start: Option<usize>) -> Result<(), Box<dyn Error>> {
    let seed = config.game.seed.unwrap_or_else(rand::random);
    info!(
        "side {} difficulty {} tick {}ms seed {seed}",
        config.game.side, config.game.difficulty, config.speed.tick_rate_ms
    );

    // ── Levels ──
    let files = level::discover(&config.levels_dir, &config.victory_name);
    let mut pictures = PictureStore::new();
    let entries = picture::build_catalog(&files, &config.victory_name, &mut pictures);
    info!("{} picture(s) ready", pictures.len());
    let mut levels = LevelSequencer::new(entries)?;
    if let Some(index) = start {
        let at = levels.start_at(index);
        info!("starting at {at}");
    }

    let settings = SessionSettings {
        side: config.game.side,
        difficulty: config.game.difficulty,
    };
    let mut session = Session::new(levels, settings, seed)?;

    // ── Terminal ──
    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        // Raw mode may already be on
        let _ = renderer.cleanup();
        return Err(format!("terminal init failed: {e}").into());
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &pictures, &mut renderer, sound.as_ref(), config);

    if let Err(e) = renderer.cleanup() {
        warn!("terminal cleanup failed: {e}");
    }

    result?;
    info!("quit after {} tick(s)", session.tick_count());

    let solved = match session.levels().current() {
        LevelIndex::Playable(i) => i,
        LevelIndex::Victory => session.levels().playable_count(),
    };
    println!();
    println!("Thanks for playing tileshift!");
    println!("Pictures completed: {solved}/{}", session.levels().playable_count());
    Ok(())
}

fn game_loop(
    session: &mut Session,
    pictures: &PictureStore,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
            break;
        }
        if kb.resized {
            renderer.invalidate();
        }

        for intent in detect_intents(&kb, &gp) {
            session.push_intent(intent);
        }
        if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
            session.skip_fade();
        }
        if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
            let events = step::restart_level(session)?;
            process_sound_events(sound, &events);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::tick(session)?;
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(session, pictures)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        sfx.react(event);
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Moves requested this frame. An arrow sends the empty cell that way;
/// the tile it lands on takes its old place.
fn detect_intents(kb: &InputState, gp: &GamepadState) -> Vec<MoveIntent> {
    let mut intents = gp.slide_intents();
    if kb.any_struck(KEYS_UP) { intents.push(MoveIntent::Up); }
    if kb.any_struck(KEYS_DOWN) { intents.push(MoveIntent::Down); }
    if kb.any_struck(KEYS_LEFT) { intents.push(MoveIntent::Left); }
    if kb.any_struck(KEYS_RIGHT) { intents.push(MoveIntent::Right); }
    intents
}
