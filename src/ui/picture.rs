/// Level pictures: loading, square cropping, sampling, built-in fallbacks.
///
/// Every picture is stored as a square RGB image of `PICTURE_SIZE` pixels
/// on a side, so render units (0..RENDER_EXTENT) map straight onto it.
/// Files that are not square keep their centre: the longer axis is cropped
/// before the resize.
///
/// When the levels directory yields nothing playable, a few procedurally
/// drawn pictures stand in, and a built-in trophy covers a missing
/// victory picture.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::{info, warn};
use thiserror::Error;

use crate::sim::fade::RENDER_EXTENT;
use crate::sim::level::{AssetId, DiscoveredLevel, LevelFile};

pub const PICTURE_SIZE: u32 = RENDER_EXTENT;

/// Number of procedural pictures used when no files are found.
pub const BUILTIN_LEVELS: usize = 3;

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid image dimensions")]
    Dimensions,
}

pub struct Picture {
    pixels: RgbImage,
}

impl Picture {
    /// Decode an image file and fit it into the picture square.
    pub fn load(path: &Path) -> Result<Self, PictureError> {
        let bytes = std::fs::read(path).map_err(|source| PictureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| PictureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(decoded.to_rgb8())
    }

    pub fn from_image(img: RgbImage) -> Result<Self, PictureError> {
        Ok(Picture {
            pixels: fit_into_square(img, PICTURE_SIZE)?,
        })
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Colour at a point given in render units. Out-of-range points clamp
    /// to the nearest edge pixel.
    pub fn sample(&self, x: f32, y: f32) -> Rgb<u8> {
        let scale = self.size() as f32 / RENDER_EXTENT as f32;
        let max = self.size().saturating_sub(1);
        let px = ((x * scale).max(0.0) as u32).min(max);
        let py = ((y * scale).max(0.0) as u32).min(max);
        *self.pixels.get_pixel(px, py)
    }
}

/// Centre-crop to a square, then resize to `size`×`size`.
pub fn fit_into_square(img: RgbImage, size: u32) -> Result<RgbImage, PictureError> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || size == 0 {
        return Err(PictureError::Dimensions);
    }
    let side = w.min(h);
    let x = (w - side) / 2;
    let y = (h - side) / 2;
    let square = imageops::crop_imm(&img, x, y, side, side).to_image();
    if side == size {
        return Ok(square);
    }
    Ok(imageops::resize(&square, size, size, FilterType::Triangle))
}

// ══════════════════════════════════════════════════════════════
// Built-in pictures
// ══════════════════════════════════════════════════════════════

fn hsv(h: f32, s: f32, v: f32) -> Rgb<u8> {
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor() as u32;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
}

/// Procedural level picture. Every region differs in both hue and
/// brightness so each tile has a recognisable home.
pub fn builtin_picture(variant: usize) -> Picture {
    let n = PICTURE_SIZE as f32;
    let pixels = RgbImage::from_fn(PICTURE_SIZE, PICTURE_SIZE, |x, y| {
        let u = x as f32 / n;
        let v = y as f32 / n;
        match variant % BUILTIN_LEVELS {
            // Diagonal rainbow with bands
            0 => {
                let band = if ((u + v) * 8.0).floor() as u32 % 2 == 0 { 0.95 } else { 0.75 };
                hsv(u * 0.6 + v * 0.4, 0.7, band)
            }
            // Concentric rings around the centre
            1 => {
                let (dx, dy) = (u - 0.5, v - 0.5);
                let r = (dx * dx + dy * dy).sqrt();
                let ring = if (r * 14.0).floor() as u32 % 2 == 0 { 0.9 } else { 0.55 };
                hsv(0.55 + r * 0.8 + dy.atan2(dx) / std::f32::consts::TAU * 0.2, 0.65, ring)
            }
            // Checkerboard over a vertical gradient
            _ => {
                let check = ((u * 6.0).floor() as u32 + (v * 6.0).floor() as u32) % 2 == 0;
                let value = if check { 0.9 } else { 0.6 };
                hsv(0.05 + v * 0.5, 0.35 + u * 0.5, value)
            }
        }
    });
    Picture { pixels }
}

/// Gold rays on a dark field, for the victory screen.
pub fn builtin_victory() -> Picture {
    let n = PICTURE_SIZE as f32;
    let pixels = RgbImage::from_fn(PICTURE_SIZE, PICTURE_SIZE, |x, y| {
        let dx = x as f32 / n - 0.5;
        let dy = y as f32 / n - 0.5;
        let r = (dx * dx + dy * dy).sqrt();
        let angle = dy.atan2(dx);
        let ray = (angle * 12.0).sin() > 0.0;
        if r < 0.18 {
            Rgb([250, 210, 60])
        } else if ray {
            let fade = (1.0 - r).clamp(0.3, 1.0);
            Rgb([(230.0 * fade) as u8, (170.0 * fade) as u8, (40.0 * fade) as u8])
        } else {
            Rgb([40, 24, 60])
        }
    });
    Picture { pixels }
}

// ══════════════════════════════════════════════════════════════
// Store
// ══════════════════════════════════════════════════════════════

/// Owns every loaded picture; levels refer to them by `AssetId`.
#[derive(Default)]
pub struct PictureStore {
    pictures: Vec<Picture>,
}

impl PictureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, picture: Picture) -> AssetId {
        self.pictures.push(picture);
        self.pictures.len() - 1
    }

    pub fn get(&self, id: AssetId) -> Option<&Picture> {
        self.pictures.get(id)
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }
}

/// Load every discovered file into `store`, skipping the ones that fail,
/// and fill in built-ins for whatever is missing.
///
/// The returned list is ready for `LevelSequencer::new`.
pub fn build_catalog(
    files: &[LevelFile],
    victory_name: &str,
    store: &mut PictureStore,
) -> Vec<DiscoveredLevel> {
    let mut levels = Vec::with_capacity(files.len() + 1);

    for file in files {
        match Picture::load(&file.path) {
            Ok(picture) => levels.push(DiscoveredLevel {
                name: file.name.clone(),
                asset: store.add(picture),
                is_victory: file.is_victory,
            }),
            Err(e) => warn!("skipping picture: {e}"),
        }
    }

    if !levels.iter().any(|l| !l.is_victory) {
        info!("no playable pictures found, using {BUILTIN_LEVELS} built-in levels");
        for i in 0..BUILTIN_LEVELS {
            levels.push(DiscoveredLevel {
                name: format!("built-in {}", i + 1),
                asset: store.add(builtin_picture(i)),
                is_victory: false,
            });
        }
    }

    if !levels.iter().any(|l| l.is_victory) {
        info!("no \"{victory_name}\" picture found, using the built-in victory screen");
        levels.push(DiscoveredLevel {
            name: victory_name.to_string(),
            asset: store.add(builtin_victory()),
            is_victory: true,
        });
    }

    levels
}
