//! core/audio/decoder.rs
//! Decode a whole file (Symphonia) into one interleaved i16 buffer.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::DecodedAudio;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("format probe failed: {0}")]
    Probe(#[source] SymphoniaError),

    #[error("no supported audio track found")]
    NoTrack,

    #[error("decoder init failed: {0}")]
    DecoderInit(#[source] SymphoniaError),

    #[error("decode error: {0}")]
    Decode(#[source] SymphoniaError),

    #[error("input contains no audio samples")]
    Empty,

    #[error(
        "stream format changed mid-file: {from_rate} Hz/{from_channels} ch -> {to_rate} Hz/{to_channels} ch"
    )]
    FormatChanged {
        from_rate: u32,
        from_channels: usize,
        to_rate: u32,
        to_channels: usize,
    },
}

/// Decode every packet of the default track of `path`.
///
/// Corrupt packets are skipped. The stream ends on the first IO error
/// (Symphonia reports end-of-file that way).
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(DecodeError::Probe)?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(DecodeError::DecoderInit)?;

    // Set by the first decoded buffer; every later buffer must match it.
    let mut format_spec: Option<(u32, usize)> = None;

    let mut samples: Vec<i16> = Vec::new();
    let mut skipped_packets: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(DecodeError::Decode(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupt packet; skip.
                debug!("skipping undecodable packet: {msg}");
                skipped_packets += 1;
                continue;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(DecodeError::Decode(e)),
        };

        let spec = SignalSpec::new(decoded.spec().rate, decoded.spec().channels);
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        check_format(&mut format_spec, spec.rate, spec.channels.count())?;

        let mut sbuf = SampleBuffer::<i16>::new(frames as u64, spec);
        sbuf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sbuf.samples());
    }

    if skipped_packets > 0 {
        debug!("{skipped_packets} packet(s) could not be decoded and were skipped");
    }

    let Some((sample_rate, channels)) = format_spec else {
        return Err(DecodeError::Empty);
    };
    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(DecodeError::Empty);
    }

    Ok(DecodedAudio::new(samples, sample_rate, channels))
}

/// Samples from every packet land in one interleaved buffer, so the rate
/// and channel count must stay what the first packet said.
fn check_format(
    expected: &mut Option<(u32, usize)>,
    rate: u32,
    channels: usize,
) -> Result<(), DecodeError> {
    match *expected {
        None => {
            *expected = Some((rate, channels));
            Ok(())
        }
        Some(first) if first == (rate, channels) => Ok(()),
        Some((from_rate, from_channels)) => Err(DecodeError::FormatChanged {
            from_rate,
            from_channels,
            to_rate: rate,
            to_channels: channels,
        }),
    }
}
