//! Artifact naming and the published artifact map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed local name of the unmodified playlist.
pub const OUTPUT_PLAYLIST: &str = "output.m3u8";

/// Fixed local name of the redacted playlist.
pub const BLACKOUT_PLAYLIST: &str = "blackout.m3u8";

/// Local chunk name for the real-content variant of timeline slot `index`.
pub fn segment_chunk_name(index: usize) -> String {
    format!("segment_{:03}.ts", index)
}

/// Local chunk name for the filler variant of timeline slot `index`.
pub fn blackout_chunk_name(index: usize) -> String {
    format!("blackout_{:03}.ts", index)
}

/// Kind of a published artifact, used to pick the upload content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An HLS playlist document.
    Playlist,
    /// A media chunk (MPEG-TS).
    Chunk,
    /// Anything else.
    Other,
}

impl ArtifactKind {
    /// Classify an artifact by its local file name.
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(".m3u8") {
            Self::Playlist
        } else if name.ends_with(".ts") {
            Self::Chunk
        } else {
            Self::Other
        }
    }

    /// MIME type used when uploading this artifact.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Playlist => "application/vnd.apple.mpegurl",
            Self::Chunk => "video/mp2t",
            Self::Other => "application/octet-stream",
        }
    }
}

/// Mapping from local artifact name to its durable URL.
///
/// Produced once per publish pass and consumed by the playlist rewrite step.
/// Ordered so that iteration (and logs) are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedArtifactMap {
    entries: BTreeMap<String, String>,
}

impl PublishedArtifactMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.entries.insert(name.into(), url.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
