//! core/tracklist.rs
//! Parse a hand-written tracklist into `TrackRecord`s.
//!
//! Expected layout (blank lines anywhere are fine):
//!
//! ```text
//! 0:00
//! Artist A
//! Song One
//! 1:02:30
//! Artist B
//! Song Two
//! ```
//!
//! Any line starting with a digit is a time line. Everything else is
//! either the artist or the title, depending on what came before.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use super::types::TrackRecord;

#[derive(Debug, Error)]
pub enum TracklistError {
    #[error("failed to read tracklist '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not `mm:ss` / `hh:mm:ss`, or a part is not a number.
    #[error("invalid time format: '{0}' (expected mm:ss or hh:mm:ss)")]
    InvalidTime(String),

    #[error("time '{0}' is too large")]
    TimeOverflow(String),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<TracklistError>,
    },
}

/// Where the parser is inside a "time / artist / title" group.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    AwaitingTime,
    AwaitingArtist { start_ms: u64 },
    /// A group just finished; its time still applies to a following artist line.
    GroupDone { start_ms: u64 },
    AwaitingTitle { start_ms: u64, artist: String },
}

/// Read and parse a tracklist file.
pub fn read_tracklist(path: &Path) -> Result<Vec<TrackRecord>, TracklistError> {
    let text = fs::read_to_string(path).map_err(|source| TracklistError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_tracklist(&text)?;
    info!("Parsed {} tracks from {}", records.len(), path.display());
    Ok(records)
}

/// Parse tracklist text. Records are returned in file order.
pub fn parse_tracklist(text: &str) -> Result<Vec<TrackRecord>, TracklistError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut state = ParseState::AwaitingTime;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let line_no = idx + 1;

        if line.starts_with(|c: char| c.is_ascii_digit()) {
            let start_ms = parse_time(line).map_err(|e| TracklistError::Line {
                line: line_no,
                source: Box::new(e),
            })?;

            state = match state {
                ParseState::AwaitingTitle { artist, .. } => {
                    warn!(
                        "line {line_no}: new time '{line}' before a title for '{artist}'; \
                         keeping the artist and using the new time"
                    );
                    ParseState::AwaitingTitle { start_ms, artist }
                }
                ParseState::AwaitingTime
                | ParseState::AwaitingArtist { .. }
                | ParseState::GroupDone { .. } => {
                    ParseState::AwaitingArtist { start_ms }
                }
            };
            continue;
        }

        state = match state {
            // Text before the first time line is ignored.
            ParseState::AwaitingTime => ParseState::AwaitingTime,
            ParseState::AwaitingArtist { start_ms } => ParseState::AwaitingTitle {
                start_ms,
                artist: line.to_string(),
            },
            ParseState::AwaitingTitle { start_ms, artist } => {
                records.push(TrackRecord {
                    start_ms,
                    artist,
                    title: line.to_string(),
                });
                ParseState::GroupDone { start_ms }
            }
            ParseState::GroupDone { start_ms } => {
                warn!(
                    "line {line_no}: artist '{line}' has no time of its own; \
                     reusing the previous time"
                );
                ParseState::AwaitingTitle {
                    start_ms,
                    artist: line.to_string(),
                }
            }
        };
    }

    if matches!(
        state,
        ParseState::AwaitingArtist { .. } | ParseState::AwaitingTitle { .. }
    ) {
        warn!("tracklist ends with an incomplete entry; ignoring it");
    }

    Ok(records)
}

/// Convert `mm:ss` or `hh:mm:ss` into milliseconds.
pub fn parse_time(s: &str) -> Result<u64, TracklistError> {
    let invalid = || TracklistError::InvalidTime(s.to_string());

    let parts = s
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<u64>, _>>()?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => (0, *m, *sec),
        [h, m, sec] => (*h, *m, *sec),
        _ => return Err(invalid()),
    };

    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .and_then(|total| total.checked_mul(1000))
        .ok_or_else(|| TracklistError::TimeOverflow(s.to_string()))
}
