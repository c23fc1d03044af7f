//! Test-only helpers.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Generate a 16-bit PCM WAV sine tone on the fly.
///
/// Keeps the repository free from committed binary fixtures.
pub(crate) fn write_test_tone(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let frames = sample_rate as u64 * duration_ms / 1_000;
    let mut data = Vec::with_capacity(frames as usize * channels as usize * 2);

    for n in 0..frames {
        let theta = (n as f32 / sample_rate as f32) * std::f32::consts::TAU * 440.0;
        let sample = (theta.sin() * 0.5 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            data.extend_from_slice(&sample.to_le_bytes());
        }
    }

    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;
    let data_len = data.len() as u32;

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(b"RIFF")?;
    file.write_all(&(36u32 + data_len).to_le_bytes())?;
    file.write_all(b"WAVE")?;
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?; // PCM header size
    file.write_all(&1u16.to_le_bytes())?; // audio format = PCM
    file.write_all(&channels.to_le_bytes())?;
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&block_align.to_le_bytes())?;
    file.write_all(&16u16.to_le_bytes())?; // bits per sample
    file.write_all(b"data")?;
    file.write_all(&data_len.to_le_bytes())?;
    file.write_all(&data)?;
    file.flush()?;
    Ok(())
}
