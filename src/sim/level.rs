/// Levels, their order, and the victory screen.
///
/// ## Sources
///   Level pictures are image files in a directory (`levels/` by default).
///   Files are played in file-name order. The file whose stem matches the
///   victory name (`winner` by default) is not a playable level: it is the
///   screen shown after the last level is solved.
///
/// ## Indices
///   Playable levels are numbered 0..K-1 in discovery order, skipping the
///   victory entry, which gets `LevelIndex::Victory` instead.
///
/// Pictures themselves belong to the renderer; a level only carries an
/// `AssetId` pointing into the renderer's picture store.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Handle to a picture owned by the presentation layer.
pub type AssetId = usize;

/// Extensions recognised as level pictures.
pub const PICTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LevelIndex {
    Playable(usize),
    Victory,
}

impl LevelIndex {
    pub fn is_victory(self) -> bool {
        matches!(self, LevelIndex::Victory)
    }
}

impl fmt::Display for LevelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelIndex::Playable(i) => write!(f, "level {}", i + 1),
            LevelIndex::Victory => write!(f, "victory screen"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub index: LevelIndex,
    pub name: String,
    pub asset: AssetId,
}

/// One entry reported by asset discovery, in discovery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredLevel {
    pub name: String,
    pub asset: AssetId,
    pub is_victory: bool,
}

/// A picture file found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelFile {
    pub name: String,
    pub path: PathBuf,
    pub is_victory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no playable levels found")]
    NoPlayableLevels,
    #[error("no victory screen found")]
    MissingVictory,
    #[error("more than one victory screen: {0} and {1}")]
    DuplicateVictory(String, String),
}

// ══════════════════════════════════════════════════════════════
// Sequencer
// ══════════════════════════════════════════════════════════════

pub struct LevelSequencer {
    playable: Vec<Level>,
    victory: Level,
    current: LevelIndex,
    is_victory: bool,
}

impl LevelSequencer {
    pub fn new(entries: Vec<DiscoveredLevel>) -> Result<Self, CatalogError> {
        let mut playable = Vec::new();
        let mut victory: Option<Level> = None;

        for entry in entries {
            if entry.is_victory {
                if let Some(existing) = &victory {
                    return Err(CatalogError::DuplicateVictory(existing.name.clone(), entry.name));
                }
                victory = Some(Level {
                    index: LevelIndex::Victory,
                    name: entry.name,
                    asset: entry.asset,
                });
            } else {
                playable.push(Level {
                    index: LevelIndex::Playable(playable.len()),
                    name: entry.name,
                    asset: entry.asset,
                });
            }
        }

        if playable.is_empty() {
            return Err(CatalogError::NoPlayableLevels);
        }
        let victory = victory.ok_or(CatalogError::MissingVictory)?;

        Ok(LevelSequencer {
            playable,
            victory,
            current: LevelIndex::Playable(0),
            is_victory: false,
        })
    }

    /// Move to the level after the current one.
    ///
    /// After the last playable level comes the victory screen, which has
    /// no successor.
    pub fn advance(&mut self) -> LevelIndex {
        let next = match self.current {
            LevelIndex::Playable(i) if i + 1 < self.playable.len() => LevelIndex::Playable(i + 1),
            LevelIndex::Playable(_) | LevelIndex::Victory => LevelIndex::Victory,
        };
        self.current = next;
        self.is_victory = next.is_victory();
        next
    }

    /// Jump to a playable level. Out-of-range indices clamp to the last.
    pub fn start_at(&mut self, index: usize) -> LevelIndex {
        let idx = index.min(self.playable.len() - 1);
        self.current = LevelIndex::Playable(idx);
        self.is_victory = false;
        self.current
    }

    #[inline]
    pub fn current(&self) -> LevelIndex {
        self.current
    }

    pub fn current_level(&self) -> &Level {
        self.level(self.current)
    }

    pub fn level(&self, index: LevelIndex) -> &Level {
        match index {
            LevelIndex::Playable(i) => &self.playable[i.min(self.playable.len() - 1)],
            LevelIndex::Victory => &self.victory,
        }
    }

    #[inline]
    pub fn is_victory(&self) -> bool {
        self.is_victory
    }

    pub fn playable_count(&self) -> usize {
        self.playable.len()
    }
}

// ══════════════════════════════════════════════════════════════
// Discovery
// ══════════════════════════════════════════════════════════════

/// Scan `dir` for level pictures, sorted by file name.
///
/// A missing or unreadable directory yields an empty list; the caller
/// falls back to built-in pictures.
pub fn discover(dir: &Path, victory_name: &str) -> Vec<LevelFile> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!("levels dir {} not readable: {e}", dir.display());
            return vec![];
        }
    };

    let mut files: Vec<LevelFile> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_picture(path))
        .map(|path| {
            let name = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            let is_victory = name.eq_ignore_ascii_case(victory_name);
            LevelFile { name, path, is_victory }
        })
        .collect();

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!("discovered {} picture(s) in {}", files.len(), dir.display());
    files
}

fn is_picture(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| {
            PICTURE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
        })
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, asset: AssetId, is_victory: bool) -> DiscoveredLevel {
        DiscoveredLevel { name: name.into(), asset, is_victory }
    }

    fn three_levels() -> LevelSequencer {
        LevelSequencer::new(vec![
            entry("a", 0, false),
            entry("winner", 1, true),
            entry("b", 2, false),
            entry("c", 3, false),
        ])
        .unwrap()
    }

    // ── Sequencing ──

    #[test]
    fn indices_skip_victory_entry() {
        let seq = three_levels();
        assert_eq!(seq.playable_count(), 3);
        assert_eq!(seq.level(LevelIndex::Playable(1)).name, "b");
        assert_eq!(seq.level(LevelIndex::Playable(1)).asset, 2);
        assert_eq!(seq.level(LevelIndex::Victory).asset, 1);
    }

    #[test]
    fn advance_walks_to_victory() {
        let mut seq = three_levels();
        assert_eq!(seq.current(), LevelIndex::Playable(0));
        assert_eq!(seq.advance(), LevelIndex::Playable(1));
        assert!(!seq.is_victory());
        assert_eq!(seq.advance(), LevelIndex::Playable(2));
        assert!(!seq.is_victory());
        assert_eq!(seq.advance(), LevelIndex::Victory);
        assert!(seq.is_victory());
        assert_eq!(seq.current_level().name, "winner");
    }

    #[test]
    fn victory_has_no_successor() {
        let mut seq = three_levels();
        for _ in 0..3 {
            seq.advance();
        }
        assert_eq!(seq.advance(), LevelIndex::Victory);
        assert!(seq.is_victory());
    }

    #[test]
    fn start_at_resets_victory_flag() {
        let mut seq = three_levels();
        seq.start_at(2);
        seq.advance();
        assert!(seq.is_victory());
        assert_eq!(seq.start_at(0), LevelIndex::Playable(0));
        assert!(!seq.is_victory());
        assert_eq!(seq.start_at(99), LevelIndex::Playable(2));
    }

    #[test]
    fn single_level_goes_straight_to_victory() {
        let mut seq =
            LevelSequencer::new(vec![entry("only", 0, false), entry("w", 1, true)]).unwrap();
        assert_eq!(seq.advance(), LevelIndex::Victory);
    }

    // ── Catalog errors ──

    #[test]
    fn missing_victory_is_an_error() {
        let r = LevelSequencer::new(vec![entry("a", 0, false)]);
        assert_eq!(r.err(), Some(CatalogError::MissingVictory));
    }

    #[test]
    fn no_playable_is_an_error() {
        let r = LevelSequencer::new(vec![entry("winner", 0, true)]);
        assert_eq!(r.err(), Some(CatalogError::NoPlayableLevels));
    }

    #[test]
    fn two_victories_is_an_error() {
        let r = LevelSequencer::new(vec![
            entry("a", 0, false),
            entry("winner", 1, true),
            entry("Winner", 2, true),
        ]);
        assert!(matches!(r, Err(CatalogError::DuplicateVictory(_, _))));
    }

    // ── Discovery ──

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tileshift-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discover_sorts_and_flags_victory() {
        let dir = scratch_dir("discover");
        for name in ["02_cat.png", "winner.jpg", "01_dog.PNG", "notes.txt", "03_owl.jpeg"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        std::fs::create_dir_all(dir.join("sub.png")).unwrap();

        let files = discover(&dir, "winner");
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["01_dog", "02_cat", "03_owl", "winner"]);
        assert_eq!(files.iter().filter(|f| f.is_victory).count(), 1);
        assert!(files[3].is_victory);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_missing_dir_is_empty() {
        let dir = std::env::temp_dir().join("tileshift-does-not-exist-at-all");
        assert!(discover(&dir, "winner").is_empty());
    }
}
