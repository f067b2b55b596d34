//! Gallery persistence: shared latest drawing, artwork list and rotation.
//!
//! Backends implement [`Gallery`]; the server talks to them only through a
//! [`StoreHandle`], which owns the backend on a dedicated thread.

pub mod file;
pub mod memory;
pub mod rotation;
pub mod worker;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use worker::StoreHandle;

use crate::drawing::Drawing;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Longest accepted artist name, in characters
pub const MAX_ARTIST_LEN: usize = 64;
/// Name shown when the artist left the field empty
pub const ANONYMOUS: &str = "Anonymous";

/// A submitted artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    pub artist: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    #[serde(default)]
    pub display_count: u64,
    pub drawing: Drawing,
}

/// Gallery listing entry (no drawing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSummary {
    pub id: String,
    pub artist: String,
    pub created_at: u64,
    pub display_count: u64,
}

impl From<&Artwork> for ArtworkSummary {
    fn from(a: &Artwork) -> Self {
        Self {
            id: a.id.clone(),
            artist: a.artist.clone(),
            created_at: a.created_at,
            display_count: a.display_count,
        }
    }
}

/// Which artwork is "now playing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub current_id: Option<String>,
    pub advanced_at: Option<u64>,
}

/// Storage backend for the gallery.
///
/// Secret checking is not a backend concern; see [`StoreHandle::advance`].
pub trait Gallery: Send {
    /// The shared latest drawing.
    fn latest(&self) -> Result<Drawing>;

    /// Overwrite the shared latest drawing (last writer wins).
    fn put_latest(&mut self, drawing: &Drawing) -> Result<()>;

    /// Summaries of all artworks, newest first.
    fn list(&self) -> Result<Vec<ArtworkSummary>>;

    fn artwork(&self, id: &str) -> Result<Artwork>;

    /// Store a new artwork and return its id.
    fn submit(&mut self, artist: &str, drawing: Drawing) -> Result<String>;

    /// The artwork most recently selected by [`Gallery::advance`].
    fn current(&self) -> Result<Artwork>;

    /// Select the least-shown artwork, bump its count and make it current.
    fn advance(&mut self) -> Result<Artwork>;
}

/// Trim the artist name and strip control characters.
pub fn sanitize_artist(artist: &str) -> Result<String> {
    let cleaned: String = artist.trim().chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(ANONYMOUS.to_string());
    }
    if cleaned.chars().count() > MAX_ARTIST_LEN {
        return Err(Error::InvalidInput(format!(
            "artist name longer than {} characters",
            MAX_ARTIST_LEN
        )));
    }
    Ok(cleaned.to_string())
}

/// Build a new artwork record; `seq` disambiguates ids minted in the same instant.
pub(crate) fn new_artwork(artist: &str, drawing: Drawing, seq: u64) -> Result<Artwork> {
    let artist = sanitize_artist(artist)?;
    let drawing = drawing.normalized();
    let created_at = now_ms();
    let id = artwork_id(&artist, created_at, seq, &drawing);
    Ok(Artwork {
        id,
        artist,
        created_at,
        display_count: 0,
        drawing,
    })
}

fn artwork_id(artist: &str, created_at: u64, seq: u64, drawing: &Drawing) -> String {
    let mut hasher = Sha256::new();
    hasher.update(artist.as_bytes());
    hasher.update(created_at.to_le_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(crate::codec::encode_bytes(drawing));
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Newest-first summaries of an oldest-first list.
pub(crate) fn summaries(artworks: &[Artwork]) -> Vec<ArtworkSummary> {
    let mut out: Vec<ArtworkSummary> = artworks.iter().map(ArtworkSummary::from).collect();
    // stable sort keeps list order for equal timestamps, so reverse first
    out.reverse();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// Drop the oldest artworks beyond `max`.
pub(crate) fn enforce_retention(artworks: &mut Vec<Artwork>, max: usize) {
    if artworks.len() > max {
        let excess = artworks.len() - max;
        log::info!("gallery over {} artworks, evicting {} oldest", max, excess);
        artworks.drain(..excess);
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
