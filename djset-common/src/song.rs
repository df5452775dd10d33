//! Song and track types
//!
//! `SongEntry` is the normalized unit the response parser produces and the
//! track matcher consumes. `CandidateTrack` is a catalog track the matcher
//! reconciles entries against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between artist and title in a rendered entry
pub const ENTRY_SEPARATOR: &str = " - ";

/// Normalized "Artist - Title" song entry
///
/// Both parts are trimmed on construction. Equality ignores case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongEntry {
    pub artist: String,
    pub title: String,
}

impl SongEntry {
    /// Create an entry, trimming both parts
    pub fn new(artist: impl AsRef<str>, title: impl AsRef<str>) -> Self {
        Self {
            artist: artist.as_ref().trim().to_string(),
            title: title.as_ref().trim().to_string(),
        }
    }

    /// Split a rendered entry back into artist and title
    ///
    /// Returns `None` unless the entry splits on `" - "` into exactly two
    /// non-empty parts.
    pub fn parse(entry: &str) -> Option<Self> {
        let parts: Vec<&str> = entry.split(ENTRY_SEPARATOR).collect();
        if parts.len() != 2 {
            return None;
        }

        let song = Self::new(parts[0], parts[1]);
        if song.artist.is_empty() || song.title.is_empty() {
            return None;
        }
        Some(song)
    }
}

impl PartialEq for SongEntry {
    fn eq(&self, other: &Self) -> bool {
        self.artist.to_lowercase() == other.artist.to_lowercase()
            && self.title.to_lowercase() == other.title.to_lowercase()
    }
}

impl Eq for SongEntry {}

impl fmt::Display for SongEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.artist, ENTRY_SEPARATOR, self.title)
    }
}

/// Catalog track available for matching
///
/// Owned by the catalog; treated as read-only during a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTrack {
    /// Catalog track ID
    pub id: String,
    /// Track name (title)
    pub name: String,
    /// Artist names in catalog order
    pub artists: Vec<String>,
    /// Playable URI (e.g. `spotify:track:...`)
    pub uri: String,
    /// Album name
    pub album: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CandidateTrack {
    /// Render as a corpus line: `"Artist A, Artist B - Name"`
    pub fn corpus_line(&self) -> String {
        format!("{}{}{}", self.artists.join(", "), ENTRY_SEPARATOR, self.name)
    }
}
