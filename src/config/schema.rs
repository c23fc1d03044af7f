use std::path::PathBuf;

use serde::Deserialize;

use crate::core::tags::TagVersion;

/// Default folder for exported tracks, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output_tracks";

/// Default constant bitrate for exported MP3s (kbps).
pub const DEFAULT_BITRATE_KBPS: u32 = 192;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tracksplit/config.toml` or `~/.config/tracksplit/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKSPLIT__`)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// Example:
///
/// ```toml
/// output_dir = "tracks"
/// bitrate_kbps = 320
/// tag_version = "id3v23"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the numbered MP3s go. Created if missing.
    pub output_dir: PathBuf,

    /// Constant MP3 bitrate. Must be one LAME supports (8..=320 in the usual steps).
    pub bitrate_kbps: u32,

    /// ID3v2 revision used for the artist/title tag.
    pub tag_version: TagVersion,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            tag_version: TagVersion::default(),
        }
    }
}
