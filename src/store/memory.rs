//! In-memory gallery, for tests and `serve --ephemeral`.

use super::{enforce_retention, new_artwork, rotation, summaries, Artwork, ArtworkSummary, Gallery, RotationState};
use crate::drawing::Drawing;
use crate::{Error, Result};

pub struct MemoryStore {
    latest: Option<Drawing>,
    /// Oldest first
    artworks: Vec<Artwork>,
    rotation: RotationState,
    max_artworks: usize,
    seq: u64,
}

impl MemoryStore {
    pub fn new(max_artworks: usize) -> Self {
        Self {
            latest: None,
            artworks: Vec::new(),
            rotation: RotationState::default(),
            max_artworks: max_artworks.max(1),
            seq: 0,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(crate::ServerConfig::default().max_artworks)
    }
}

impl Gallery for MemoryStore {
    fn latest(&self) -> Result<Drawing> {
        self.latest
            .clone()
            .ok_or_else(|| Error::NotFound("no latest yet".into()))
    }

    fn put_latest(&mut self, drawing: &Drawing) -> Result<()> {
        self.latest = Some(drawing.normalized());
        Ok(())
    }

    fn list(&self) -> Result<Vec<ArtworkSummary>> {
        Ok(summaries(&self.artworks))
    }

    fn artwork(&self, id: &str) -> Result<Artwork> {
        self.artworks
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("artwork {}", id)))
    }

    fn submit(&mut self, artist: &str, drawing: Drawing) -> Result<String> {
        let mut artwork = new_artwork(artist, drawing.clone(), self.seq)?;
        self.seq += 1;
        while self.artworks.iter().any(|a| a.id == artwork.id) {
            artwork = new_artwork(artist, drawing.clone(), self.seq)?;
            self.seq += 1;
        }
        let id = artwork.id.clone();
        self.artworks.push(artwork);
        enforce_retention(&mut self.artworks, self.max_artworks);
        Ok(id)
    }

    fn current(&self) -> Result<Artwork> {
        let id = self
            .rotation
            .current_id
            .as_deref()
            .ok_or_else(|| Error::NotFound("nothing playing yet".into()))?;
        self.artwork(id)
    }

    fn advance(&mut self) -> Result<Artwork> {
        let picked = rotation::advance(&mut self.artworks)
            .cloned()
            .ok_or(Error::NoArtworks)?;
        self.rotation = RotationState {
            current_id: Some(picked.id.clone()),
            advanced_at: Some(super::now_ms()),
        };
        Ok(picked)
    }
}
