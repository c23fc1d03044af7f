//! core/mod.rs
//!
//! The brain of the tool:
//! - Read the tracklist (text -> records)
//! - Decode the source recording (file -> PCM in memory)
//! - Cut, encode and tag one file per record
//!
//! The pipeline is explicit and linear:
//!   (A) ensure output dir
//!   (B) decode audio -> DecodedAudio
//!   (C) parse tracklist -> Vec<TrackRecord>
//!   (D) plan -> Vec<PlannedTrack>
//!   (E) per track: slice -> encode -> tag
//!
//! (A)-(C) are fatal when they fail. Per-track failures in (E) are logged,
//! counted in the report, and the loop moves on.

pub mod audio;
pub mod plan;
pub mod tags;
pub mod tracklist;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use thiserror::Error;

use audio::{DecodeError, DecodedAudio, Mp3Encoder, SegmentEncoder, decode_file};
use tags::{TagVersion, write_artist_title};
use tracklist::{TracklistError, read_tracklist};
use types::{PlannedTrack, SplitReport};

/// Fatal errors. Anything in here stops the run.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("failed to create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error loading audio file '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Tracklist(#[from] TracklistError),

    #[error(transparent)]
    Encoder(#[from] audio::ExportError),
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub input_path: PathBuf,
    pub tracklist_path: PathBuf,
    pub output_dir: PathBuf,
    pub bitrate_kbps: u32,
    pub tag_version: TagVersion,
}

/// Split with the production MP3 encoder.
pub fn split_audio(config: &SplitConfig) -> Result<SplitReport, SplitError> {
    let mut encoder = Mp3Encoder::new(config.bitrate_kbps)?;
    info!("Encoding MP3 at {} kbps", encoder.bitrate_kbps());
    split_audio_with(config, &mut encoder)
}

/// Split using any [`SegmentEncoder`].
pub fn split_audio_with<E: SegmentEncoder>(
    config: &SplitConfig,
    encoder: &mut E,
) -> Result<SplitReport, SplitError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| SplitError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let (audio, plan) = load_and_plan(config)?;

    let mut report = SplitReport {
        output_dir: config.output_dir.clone(),
        ..SplitReport::default()
    };

    for track in &plan {
        export_track(config, &audio, track, encoder, &mut report);
    }

    info!(
        "Audio splitting completed! Tracks saved in: {}",
        config.output_dir.display()
    );
    if report.export_failures + report.tag_failures + report.skipped > 0 {
        warn!(
            "{} exported, {} export failure(s), {} tag failure(s), {} skipped",
            report.exported, report.export_failures, report.tag_failures, report.skipped
        );
    }

    Ok(report)
}

/// Decode + parse + plan, without writing anything.
pub fn plan_split(config: &SplitConfig) -> Result<Vec<PlannedTrack>, SplitError> {
    let (_, plan) = load_and_plan(config)?;
    Ok(plan)
}

fn load_and_plan(config: &SplitConfig) -> Result<(DecodedAudio, Vec<PlannedTrack>), SplitError> {
    info!("Loading audio file: {}", config.input_path.display());
    let audio = decode_file(&config.input_path).map_err(|source| SplitError::Decode {
        path: config.input_path.clone(),
        source,
    })?;
    info!(
        "Audio length: {:.2} seconds ({} Hz, {} channel(s))",
        audio.duration_ms() as f64 / 1000.0,
        audio.sample_rate(),
        audio.channels()
    );

    let records = read_tracklist(&config.tracklist_path)?;
    let plan = plan::plan_tracks(&records, audio.duration_ms());
    Ok((audio, plan))
}

fn export_track<E: SegmentEncoder>(
    config: &SplitConfig,
    audio: &DecodedAudio,
    track: &PlannedTrack,
    encoder: &mut E,
    report: &mut SplitReport,
) {
    let PlannedTrack {
        number,
        record,
        start_ms,
        end_ms,
        file_name,
    } = track;

    info!("Processing Track {number}: {} - {}", record.artist, record.title);
    info!(
        "  Start: {:.2}s | End: {:.2}s",
        *start_ms as f64 / 1000.0,
        *end_ms as f64 / 1000.0
    );

    if track.is_empty() {
        warn!("  Skipping {file_name}: no audio between start and end");
        report.skipped += 1;
        return;
    }

    let output_path = config.output_dir.join(file_name);
    info!(
        "  Exporting: {} ({:.2}s)",
        output_path.display(),
        track.len_ms() as f64 / 1000.0
    );

    let segment = audio.slice_ms(*start_ms, *end_ms);
    if let Err(e) = encoder.encode_to_file(segment, &output_path) {
        error!("  Error exporting {file_name}: {e}");
        report.export_failures += 1;
        return;
    }

    if let Err(e) = tag_track(&output_path, &record.artist, &record.title, config.tag_version) {
        error!("  Error adding metadata: {e}");
        report.tag_failures += 1;
        return;
    }

    info!("  Successfully saved: {file_name}");
    report.exported += 1;
}

fn tag_track(
    path: &Path,
    artist: &str,
    title: &str,
    version: TagVersion,
) -> Result<(), tags::TagError> {
    write_artist_title(path, artist, title, version)?;
    info!("  Metadata added: {artist} - {title}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::{AudioSlice, ExportError};
    use crate::core::test_support::write_test_tone;
    use id3::{Tag, TagLike};

    /// Writes a few raw bytes per segment and remembers what it was asked to encode.
    /// Fails on the track numbers listed in `fail_on`. Reports success without
    /// writing anything for those in `no_file_on`.
    #[derive(Default)]
    struct RecordingEncoder {
        fail_on: Vec<usize>,
        no_file_on: Vec<usize>,
        calls: usize,
        frames: Vec<usize>,
    }

    impl SegmentEncoder for RecordingEncoder {
        fn encode_to_file(
            &mut self,
            segment: AudioSlice<'_>,
            path: &Path,
        ) -> Result<(), ExportError> {
            self.calls += 1;
            self.frames.push(segment.frames());
            if self.fail_on.contains(&self.calls) {
                return Err(ExportError::Encode("simulated failure".into()));
            }
            if self.no_file_on.contains(&self.calls) {
                return Ok(());
            }
            fs::write(path, [0xFF, 0xFB, 0x90, 0x00]).map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: SplitConfig,
    }

    fn fixture(tracklist: &str, duration_ms: u64) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("mix.wav");
        write_test_tone(&input_path, 8_000, 1, duration_ms).unwrap();

        let tracklist_path = dir.path().join("tracklist.txt");
        fs::write(&tracklist_path, tracklist).unwrap();

        let config = SplitConfig {
            input_path,
            tracklist_path,
            output_dir: dir.path().join("out").join("tracks"),
            bitrate_kbps: 128,
            tag_version: TagVersion::Id3v24,
        };
        Fixture { _dir: dir, config }
    }

    fn five_tracks() -> String {
        (0..5)
            .map(|i| format!("0:0{i}\nArtist {i}\nTitle {i}\n\n"))
            .collect()
    }

    #[test]
    fn one_failed_export_does_not_stop_the_rest() {
        let fx = fixture(&five_tracks(), 6_000);
        let mut encoder = RecordingEncoder {
            fail_on: vec![3],
            ..RecordingEncoder::default()
        };

        let report = split_audio_with(&fx.config, &mut encoder).unwrap();

        assert_eq!(encoder.calls, 5);
        assert_eq!(report.exported, 4);
        assert_eq!(report.export_failures, 1);
        for name in ["01.mp3", "02.mp3", "04.mp3", "05.mp3"] {
            assert!(fx.config.output_dir.join(name).exists(), "{name} missing");
        }
        assert!(!fx.config.output_dir.join("03.mp3").exists());
    }

    #[test]
    fn one_failed_tag_write_does_not_stop_the_rest() {
        let fx = fixture("0:00\nA\nOne\n0:01\nB\nTwo\n0:02\nC\nThree\n", 3_000);
        let mut encoder = RecordingEncoder {
            no_file_on: vec![2],
            ..RecordingEncoder::default()
        };

        let report = split_audio_with(&fx.config, &mut encoder).unwrap();

        assert_eq!(encoder.calls, 3);
        assert_eq!(report.tag_failures, 1);
        assert_eq!(report.exported, 2);
        assert_eq!(report.export_failures, 0);
        assert!(!fx.config.output_dir.join("02.mp3").exists());

        let third = Tag::read_from_path(fx.config.output_dir.join("03.mp3")).unwrap();
        assert_eq!(third.artist(), Some("C"));
        assert_eq!(third.title(), Some("Three"));
    }

    #[test]
    fn segments_follow_tracklist_boundaries() {
        let fx = fixture("0:00\nA\nOne\n0:01\nB\nTwo\n0:03\nC\nThree\n", 4_000);
        let mut encoder = RecordingEncoder::default();

        split_audio_with(&fx.config, &mut encoder).unwrap();

        // 8 kHz mono: 1 s, 2 s, 1 s.
        assert_eq!(encoder.frames, vec![8_000, 16_000, 8_000]);
    }

    #[test]
    fn exported_files_are_tagged() {
        let fx = fixture("0:00\nArtist A\nSong One\n0:01\nArtist B\nSong Two\n", 2_000);
        let mut encoder = RecordingEncoder::default();

        let report = split_audio_with(&fx.config, &mut encoder).unwrap();
        assert_eq!(report.exported, 2);
        assert_eq!(report.output_dir, fx.config.output_dir);

        let first = Tag::read_from_path(fx.config.output_dir.join("01.mp3")).unwrap();
        assert_eq!(first.artist(), Some("Artist A"));
        assert_eq!(first.title(), Some("Song One"));

        let second = Tag::read_from_path(fx.config.output_dir.join("02.mp3")).unwrap();
        assert_eq!(second.artist(), Some("Artist B"));
        assert_eq!(second.title(), Some("Song Two"));
    }

    #[test]
    fn tracks_past_the_end_are_skipped() {
        let fx = fixture("0:00\nA\nOne\n0:05\nB\nTwo\n", 2_000);
        let mut encoder = RecordingEncoder::default();

        let report = split_audio_with(&fx.config, &mut encoder).unwrap();

        assert_eq!(encoder.calls, 1);
        assert_eq!(report.exported, 1);
        assert_eq!(report.skipped, 1);
        assert!(!fx.config.output_dir.join("02.mp3").exists());
    }

    #[test]
    fn existing_output_directory_is_fine() {
        let fx = fixture("0:00\nA\nOne\n", 1_000);
        fs::create_dir_all(&fx.config.output_dir).unwrap();

        let report = split_audio_with(&fx.config, &mut RecordingEncoder::default()).unwrap();
        assert_eq!(report.exported, 1);
    }

    #[test]
    fn malformed_tracklist_is_fatal() {
        let fx = fixture("0:00\nA\nOne\n1:2:3:4\nB\nTwo\n", 1_000);
        let err = split_audio_with(&fx.config, &mut RecordingEncoder::default()).unwrap_err();
        assert!(matches!(err, SplitError::Tracklist(_)));
    }

    #[test]
    fn undecodable_input_is_fatal() {
        let fx = fixture("0:00\nA\nOne\n", 1_000);
        fs::write(&fx.config.input_path, b"not audio").unwrap();

        let mut encoder = RecordingEncoder::default();
        let err = split_audio_with(&fx.config, &mut encoder).unwrap_err();
        assert!(matches!(err, SplitError::Decode { .. }));
        assert_eq!(encoder.calls, 0);
    }

    #[test]
    fn plan_split_writes_nothing() {
        let fx = fixture("0:00\nA\nOne\n0:01\nB\nTwo\n", 3_000);

        let plan = plan_split(&fx.config).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!((plan[1].start_ms, plan[1].end_ms), (1_000, 3_000));
        assert!(!fx.config.output_dir.exists());
    }

    #[test]
    fn real_mp3_output_has_expected_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("mix.wav");
        write_test_tone(&input_path, 44_100, 2, 3_000).unwrap();
        let tracklist_path = dir.path().join("tracklist.txt");
        fs::write(&tracklist_path, "0:00\nArtist A\nSong One\n0:02\nArtist B\nSong Two\n")
            .unwrap();

        let config = SplitConfig {
            input_path,
            tracklist_path,
            output_dir: dir.path().join("output_tracks"),
            bitrate_kbps: 128,
            tag_version: TagVersion::Id3v24,
        };

        let report = split_audio(&config).unwrap();
        assert_eq!(report.exported, 2);

        // Encoder delay and padding add a little; allow a couple of frames.
        let first = decode_file(&config.output_dir.join("01.mp3")).unwrap();
        let second = decode_file(&config.output_dir.join("02.mp3")).unwrap();
        assert!((1_950..2_300).contains(&first.duration_ms()), "{}", first.duration_ms());
        assert!((950..1_300).contains(&second.duration_ms()), "{}", second.duration_ms());

        let tag = Tag::read_from_path(config.output_dir.join("02.mp3")).unwrap();
        assert_eq!(tag.artist(), Some("Artist B"));
        assert_eq!(tag.title(), Some("Song Two"));
    }
}
