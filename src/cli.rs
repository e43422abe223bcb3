/// Command-line options and logger setup.
///
/// Flags override the matching `config.toml` values; anything not given
/// on the command line keeps the configured value.

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{debug, warn};

use crate::config::{GameConfig, MAX_SIDE, MIN_SIDE};

/// Slide the tiles back into place, one picture after another.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub struct Args {
    /// Directory holding the level pictures
    pub levels_dir: Option<PathBuf>,

    /// Number of tiles per row and column
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(MIN_SIDE as i64..=MAX_SIDE as i64))]
    pub side: Option<u16>,

    /// Number of shuffle steps per level
    #[arg(short = 'f', long)]
    pub difficulty: Option<u32>,

    /// Seed for the shuffles (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Level to start from (1 = first picture)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub level: Option<u32>,

    /// File name of the victory picture, without extension
    #[arg(long)]
    pub victory: Option<String>,

    /// Write log messages to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Overlay the given flags on the loaded configuration.
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(dir) = &self.levels_dir {
            cfg.levels_dir = dir.clone();
        }
        if let Some(side) = self.side {
            cfg.game.side = side as usize;
        }
        if let Some(difficulty) = self.difficulty {
            cfg.game.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            cfg.game.seed = Some(seed);
        }
        if let Some(name) = &self.victory {
            cfg.victory_name = name.clone();
        }
        debug!("effective config: {cfg:?}");
    }
}

/// Start the logger. `RUST_LOG` wins over the default level; `--debug`
/// wins over both.
pub fn init_logging(args: &Args) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if args.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }

    let mut file_error = None;
    if let Some(path) = &args.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => file_error = Some(format!("cannot open log file {}: {e}", path.display())),
        }
    }

    builder.init();
    if let Some(msg) = file_error {
        warn!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "tileshift", "pics", "--side", "4", "-f", "12", "--seed", "7", "--victory", "done",
            "--level", "2",
        ])
        .unwrap();
        let mut cfg = GameConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.levels_dir, PathBuf::from("pics"));
        assert_eq!(cfg.game.side, 4);
        assert_eq!(cfg.game.difficulty, 12);
        assert_eq!(cfg.game.seed, Some(7));
        assert_eq!(cfg.victory_name, "done");
        assert_eq!(args.level, Some(2));
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = Args::try_parse_from(["tileshift"]).unwrap();
        let mut cfg = GameConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.game.side, 3);
        assert_eq!(cfg.game.difficulty, 60);
        assert_eq!(cfg.game.seed, None);
        assert!(!args.debug);
    }

    #[test]
    fn side_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["tileshift", "--side", "1"]).is_err());
        assert!(Args::try_parse_from(["tileshift", "--side", "17"]).is_err());
        assert!(Args::try_parse_from(["tileshift", "--side", "2"]).is_ok());
        assert!(Args::try_parse_from(["tileshift", "--level", "0"]).is_err());
    }
}
