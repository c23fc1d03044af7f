//! Core data types shared between the parser, the planner and the exporter.
//!
//! Rule of thumb:
//! - These structs are "boring bags of data"
//! - No filesystem code
//! - No codec code
//!
//! 'TrackRecord' represents ONE entry of the tracklist: where it starts and what to tag it with.

use std::path::PathBuf;

/// One "time / artist / title" group from the tracklist.
///
/// Records come out of the parser in file order. Order matters:
/// a track ends where the next one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Offset into the source recording, in milliseconds.
    pub start_ms: u64,

    /// ID3 Artist (TPE1)
    pub artist: String,

    /// ID3 Title (TIT2)
    pub title: String,
}

/// A record after boundary computation: what will be cut, and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTrack {
    /// 1-based position in the tracklist.
    pub number: usize,

    pub record: TrackRecord,

    /// Segment start (ms). Equal to `record.start_ms`.
    pub start_ms: u64,

    /// Segment end (ms), exclusive, already clamped to the audio length.
    pub end_ms: u64,

    /// Output file name, e.g. "01.mp3".
    pub file_name: String,
}

impl PlannedTrack {
    /// True when there is no audio between start and end.
    pub fn is_empty(&self) -> bool {
        self.start_ms >= self.end_ms
    }

    pub fn len_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Summary of one run.
///
/// Per-track failures are counted here instead of aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub output_dir: PathBuf,

    /// Files written AND tagged.
    pub exported: usize,

    /// Tracks whose encode/write step failed (no file, or a partial one).
    pub export_failures: usize,

    /// Tracks that were written but could not be tagged.
    pub tag_failures: usize,

    /// Tracks with an empty segment (start >= end after clamping).
    pub skipped: usize,
}
