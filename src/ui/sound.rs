/// Sound engine: procedural sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use log::debug;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_slide: Arc<Vec<u8>>,
        sfx_reveal: Arc<Vec<u8>>,
        sfx_solved: Arc<Vec<u8>>,
        sfx_victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    debug!("no audio output: {e}");
                    return None;
                }
            };

            // ── Generate all sound buffers ──
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_slide: Arc::new(make_wav(&gen_slide())),
                sfx_reveal: Arc::new(make_wav(&gen_reveal())),
                sfx_solved: Arc::new(make_wav(&gen_solved())),
                sfx_victory: Arc::new(make_wav(&gen_victory())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_slide(&self) { self.play(&self.sfx_slide); }
        pub fn play_reveal(&self) { self.play(&self.sfx_reveal); }
        pub fn play_solved(&self) { self.play(&self.sfx_solved); }
        pub fn play_victory(&self) { self.play(&self.sfx_victory); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, t: f32) -> f32 {
        (t * freq * 2.0 * std::f32::consts::PI).sin()
    }

    /// Slide: short wooden knock, a low tone with a noise click on top
    pub(super) fn gen_slide() -> Vec<f32> {
        let duration = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 4242;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let t = i as f32 / SAMPLE_RATE as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let click = if p < 0.15 { noise * 0.5 } else { 0.0 };
                let env = (1.0 - p).powf(1.5);
                (tone(180.0, t) * 0.6 + click) * env * 0.3
            })
            .collect()
    }

    /// Reveal: soft rising sweep when a picture has faded in
    pub(super) fn gen_reveal() -> Vec<f32> {
        let duration = 0.2;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 300.0 + p * 500.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (p * std::f32::consts::PI).sin();
                tone(freq, t) * env * 0.15
            })
            .collect()
    }

    /// Solved: ascending arpeggio C5→E5→G5→C6 with a held last note
    pub(super) fn gen_solved() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let note_dur = 0.09;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = tone(freq, t) * 0.6
                    + tone(freq * 2.0, t) * 0.3
                    + tone(freq * 3.0, t) * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            samples.push(tone(1047.0, t) * env * 0.3);
        }
        samples
    }

    /// Victory: two chords, then a long fading major triad
    pub(super) fn gen_victory() -> Vec<f32> {
        let chords: [(&[f32], f32); 3] = [
            (&[392.0, 494.0, 587.0], 0.15),        // G major
            (&[440.0, 554.0, 659.0], 0.15),        // A major
            (&[523.0, 659.0, 784.0, 1047.0], 0.6), // C major
        ];
        let mut samples = Vec::new();
        for (freqs, dur) in chords {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            let gain = 0.3 / freqs.len() as f32;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(2.0);
                let wave: f32 = freqs.iter().map(|&f| tone(f, t)).sum();
                samples.push(wave * env * gain * 2.0);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_slide(&self) {}
    pub fn play_reveal(&self) {}
    pub fn play_solved(&self) {}
    pub fn play_victory(&self) {}
}

impl SoundEngine {
    /// Play whatever a simulation event calls for.
    pub fn react(&self, event: &GameEvent) {
        match event {
            GameEvent::TileMoved { .. } => self.play_slide(),
            GameEvent::ShuffleFinished { .. } => self.play_reveal(),
            GameEvent::LevelSolved { .. } => self.play_solved(),
            GameEvent::VictoryReached => self.play_victory(),
            GameEvent::LevelStarted { .. } | GameEvent::FadeInFinished => {}
        }
    }
}
