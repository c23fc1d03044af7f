//! core/tags/mod.rs
//!
//! ID3 tag writing.
//! Public API:
//! - [`write_artist_title`] stamps TPE1/TIT2 onto an exported MP3.

mod write;

pub use write::{TagError, TagVersion, write_artist_title};
