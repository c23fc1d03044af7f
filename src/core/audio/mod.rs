//! core/audio/mod.rs
//! Decoded PCM in memory, plus the codec glue around it.
//!
//! - [`decode_file`] reads the whole source into a [`DecodedAudio`].
//! - [`DecodedAudio::slice_ms`] cuts a read-only view out of it.
//! - [`SegmentEncoder`] turns a cut into a file on disk ([`Mp3Encoder`] in production).

mod decoder;
mod encoder;

pub use decoder::{DecodeError, decode_file};
pub use encoder::{ExportError, Mp3Encoder, SegmentEncoder};

/// The entire source recording, decoded.
///
/// Samples are interleaved i16 (frame 0 ch 0, frame 0 ch 1, frame 1 ch 0, ...),
/// which is what LAME takes, so hours of audio stay at two bytes per sample.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: usize,
}

/// A borrowed cut of a [`DecodedAudio`].
#[derive(Debug, Clone, Copy)]
pub struct AudioSlice<'a> {
    pub samples: &'a [i16],
    pub sample_rate: u32,
    pub channels: usize,
}

impl AudioSlice<'_> {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

impl DecodedAudio {
    /// `samples.len()` is truncated to a whole number of frames.
    pub fn new(mut samples: Vec<i16>, sample_rate: u32, channels: usize) -> Self {
        if channels > 0 {
            let whole = samples.len() - samples.len() % channels;
            samples.truncate(whole);
        }
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Total length in milliseconds (rounded down).
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    /// Samples in `[start_ms, end_ms)`.
    ///
    /// Both ends are clamped to the buffer, so out-of-range or inverted
    /// ranges yield an empty slice instead of panicking.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> AudioSlice<'_> {
        let frames = self.frames();
        let start = self.ms_to_frame(start_ms).min(frames);
        let end = self.ms_to_frame(end_ms).clamp(start, frames);

        AudioSlice {
            samples: &self.samples[start * self.channels..end * self.channels],
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    fn ms_to_frame(&self, ms: u64) -> usize {
        let frame = ms as u128 * self.sample_rate as u128 / 1000;
        usize::try_from(frame).unwrap_or(usize::MAX)
    }
}
