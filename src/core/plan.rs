//! core/plan.rs
//! Turn parsed records into concrete `[start, end)` cuts and file names.

use super::types::{PlannedTrack, TrackRecord};

/// Compute the boundaries for every record.
///
/// - A track ends where the next one starts; the last one ends at `total_ms`.
/// - `end` never exceeds `total_ms`.
/// - Empty segments (start >= end) are still returned; callers check
///   [`PlannedTrack::is_empty`] and skip them.
pub fn plan_tracks(records: &[TrackRecord], total_ms: u64) -> Vec<PlannedTrack> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let next_start = records.get(i + 1).map(|next| next.start_ms);
            let end_ms = next_start.unwrap_or(total_ms).min(total_ms);
            let number = i + 1;

            PlannedTrack {
                number,
                record: record.clone(),
                start_ms: record.start_ms,
                end_ms,
                file_name: track_file_name(number),
            }
        })
        .collect()
}

/// "01.mp3", "02.mp3", ... padded to two digits, wider when needed ("100.mp3").
pub fn track_file_name(number: usize) -> String {
    format!("{number:02}.mp3")
}
