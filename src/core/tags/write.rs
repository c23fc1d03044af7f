//! Write artist/title ID3 tags onto a freshly exported MP3.

use std::path::Path;

use id3::{Tag, TagLike, Version};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to tag '{}': {source}", path.display())]
pub struct TagError {
    path: std::path::PathBuf,
    #[source]
    source: id3::Error,
}

/// Which ID3v2 revision to write.
///
/// - v2.4 stores text as UTF-8
/// - v2.3 stores non-Latin-1 text as UTF-16
///
/// Both keep non-ASCII artist/title text intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagVersion {
    Id3v23,
    #[default]
    Id3v24,
}

impl From<TagVersion> for Version {
    fn from(v: TagVersion) -> Self {
        match v {
            TagVersion::Id3v23 => Version::Id3v23,
            TagVersion::Id3v24 => Version::Id3v24,
        }
    }
}

/// Write TPE1 (artist) and TIT2 (title) to `path`.
///
/// A brand-new tag is built every time: whatever tag the file had before is
/// replaced, not merged.
pub fn write_artist_title(
    path: &Path,
    artist: &str,
    title: &str,
    version: TagVersion,
) -> Result<(), TagError> {
    let mut tag = Tag::new();

    tag.set_artist(artist);
    tag.set_title(title);

    tag.write_to_path(path, version.into())
        .map_err(|source| TagError {
            path: path.to_path_buf(),
            source,
        })
}
