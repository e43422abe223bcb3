/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Command-line flags are applied on top afterwards (see `cli.rs`).

use log::{debug, warn};
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub game: PuzzleConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
    pub victory_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub side: usize,
    pub difficulty: u32,
    /// Fixed startup seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
}

pub const MIN_SIDE: usize = 2;
pub const MAX_SIDE: usize = 16;

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_side")]
    side: usize,
    #[serde(default = "default_difficulty")]
    difficulty: u32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_victory_name")]
    victory_name: String,
}

// ── Defaults ──

fn default_side() -> usize { 3 }
fn default_difficulty() -> u32 { 60 }
fn default_tick_rate() -> u64 { 16 }    // ~60 ticks per second

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["Y".into()] }
fn default_levels_dir() -> String { "levels".into() }
fn default_victory_name() -> String { "winner".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            side: default_side(),
            difficulty: default_difficulty(),
            seed: None,
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            victory_name: default_victory_name(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly (no file search).
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve levels directory
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        let mut side = toml_cfg.game.side;
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            warn!(
                "config: side {side} outside {MIN_SIDE}..={MAX_SIDE}, using {}",
                default_side()
            );
            side = default_side();
        }

        let mut tick_rate_ms = toml_cfg.speed.tick_rate_ms;
        if tick_rate_ms == 0 {
            warn!("config: tick_rate_ms must be positive, using {}", default_tick_rate());
            tick_rate_ms = default_tick_rate();
        }

        GameConfig {
            game: PuzzleConfig {
                side,
                difficulty: toml_cfg.game.difficulty,
                seed: toml_cfg.game.seed,
            },
            speed: SpeedConfig { tick_rate_ms },
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                restart: toml_cfg.gamepad.restart,
            },
            levels_dir,
            victory_name: toml_cfg.general.victory_name,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/tileshift)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/tileshift");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    debug!("loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    warn!("config.toml parse error: {e}");
                    warn!("using default settings");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.game, PuzzleConfig { side: 3, difficulty: 60, seed: None });
        assert_eq!(cfg.speed.tick_rate_ms, 16);
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
        assert_eq!(cfg.victory_name, "winner");
        assert_eq!(cfg.gamepad.cancel, vec!["Select".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[game]\nside = 4\nseed = 1234\n\n[general]\nvictory_name = \"trophy\"\n",
        )
        .unwrap();
        assert_eq!(cfg.game.side, 4);
        assert_eq!(cfg.game.difficulty, 60);
        assert_eq!(cfg.game.seed, Some(1234));
        assert_eq!(cfg.victory_name, "trophy");
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
    }

    #[test]
    fn out_of_range_side_falls_back() {
        let cfg = GameConfig::parse("[game]\nside = 1\n").unwrap();
        assert_eq!(cfg.game.side, 3);
        let cfg = GameConfig::parse("[game]\nside = 99\n").unwrap();
        assert_eq!(cfg.game.side, 3);
    }

    #[test]
    fn zero_tick_rate_falls_back() {
        let cfg = GameConfig::parse("[speed]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 16);
    }

    #[test]
    fn absolute_levels_dir_is_kept() {
        let cfg = GameConfig::parse("[general]\nlevels_dir = \"/srv/pictures\"\n").unwrap();
        assert_eq!(cfg.levels_dir, PathBuf::from("/srv/pictures"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::parse("[game\nside = ").is_err());
    }
}
