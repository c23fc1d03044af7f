//! core/audio/encoder.rs
//! Encode a cut of PCM into an MP3 file (LAME).

use std::fs;
use std::path::{Path, PathBuf};

use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, Quality, max_required_buffer_size};
use thiserror::Error;

use super::AudioSlice;

/// LAME needs this much headroom for the final flush.
const FLUSH_HEADROOM: usize = 7200;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("segment has no audio")]
    EmptySegment,

    #[error("unsupported bitrate: {0} kbps")]
    UnsupportedBitrate(u32),

    #[error("encoder setup failed: {0}")]
    Setup(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can turn an [`AudioSlice`] into a file.
///
/// The splitter only talks to this trait; tests plug in their own.
pub trait SegmentEncoder {
    fn encode_to_file(&mut self, segment: AudioSlice<'_>, path: &Path) -> Result<(), ExportError>;
}

/// Constant-bitrate MP3 via LAME.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp3Encoder {
    bitrate_kbps: u32,
}

impl Mp3Encoder {
    pub fn new(bitrate_kbps: u32) -> Result<Self, ExportError> {
        lame_bitrate(bitrate_kbps)?;
        Ok(Self { bitrate_kbps })
    }

    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
    }

    fn encode(&self, segment: AudioSlice<'_>) -> Result<Vec<u8>, ExportError> {
        let (left, right) = split_stereo(segment);
        if left.is_empty() {
            return Err(ExportError::EmptySegment);
        }

        let mut builder =
            Builder::new().ok_or_else(|| ExportError::Setup("could not allocate LAME".into()))?;
        builder
            .set_num_channels(2)
            .map_err(|e| ExportError::Setup(format!("channels: {e:?}")))?;
        builder
            .set_sample_rate(segment.sample_rate)
            .map_err(|e| ExportError::Setup(format!("sample rate {}: {e:?}", segment.sample_rate)))?;
        builder
            .set_brate(lame_bitrate(self.bitrate_kbps)?)
            .map_err(|e| ExportError::Setup(format!("bitrate: {e:?}")))?;
        builder
            .set_quality(Quality::Good)
            .map_err(|e| ExportError::Setup(format!("quality: {e:?}")))?;
        let mut lame = builder
            .build()
            .map_err(|e| ExportError::Setup(format!("{e:?}")))?;

        let mut out: Vec<u8> = Vec::new();
        out.reserve(max_required_buffer_size(left.len()) + FLUSH_HEADROOM);

        lame.encode_to_vec(
            DualPcm {
                left: &left,
                right: &right,
            },
            &mut out,
        )
        .map_err(|e| ExportError::Encode(format!("{e:?}")))?;
        lame.flush_to_vec::<FlushNoGap>(&mut out)
            .map_err(|e| ExportError::Encode(format!("flush: {e:?}")))?;

        Ok(out)
    }
}

impl SegmentEncoder for Mp3Encoder {
    fn encode_to_file(&mut self, segment: AudioSlice<'_>, path: &Path) -> Result<(), ExportError> {
        let bytes = self.encode(segment)?;
        fs::write(path, bytes).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Map kbps onto the CBR rates LAME accepts.
pub(crate) fn lame_bitrate(kbps: u32) -> Result<Bitrate, ExportError> {
    let b = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => return Err(ExportError::UnsupportedBitrate(other)),
    };
    Ok(b)
}

/// Deinterleave into two i16 planes.
///
/// - mono is duplicated into both channels
/// - more than two channels keeps the first two (front L/R)
fn split_stereo(segment: AudioSlice<'_>) -> (Vec<i16>, Vec<i16>) {
    let frames = segment.frames();
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);

    if segment.channels == 0 {
        return (left, right);
    }

    for frame in segment.samples.chunks_exact(segment.channels) {
        let l = frame[0];
        let r = frame.get(1).copied().unwrap_or(l);
        left.push(l);
        right.push(r);
    }

    (left, right)
}
