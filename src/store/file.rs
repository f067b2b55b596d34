//! Flat-file gallery.
//!
//! Layout under the data directory:
//!
//! - `latest.json`: the shared latest drawing
//! - `artworks.json`: all artworks, oldest first
//! - `rotation.json`: the current "now playing" id
//!
//! Every operation reads the files it needs and rewrites them whole (temp
//! file + rename). There is no locking across processes.

use super::{enforce_retention, new_artwork, rotation, summaries, Artwork, ArtworkSummary, Gallery, RotationState};
use crate::drawing::Drawing;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const LATEST_FILE: &str = "latest.json";
const ARTWORKS_FILE: &str = "artworks.json";
const ROTATION_FILE: &str = "rotation.json";

pub struct FileStore {
    dir: PathBuf,
    max_artworks: usize,
    seq: u64,
}

impl FileStore {
    /// Open a store rooted at `dir`; the directory is created on first write.
    pub fn open(dir: impl Into<PathBuf>, max_artworks: usize) -> Self {
        let dir = dir.into();
        log::info!("file store at {}", dir.display());
        Self {
            dir,
            max_artworks: max_artworks.max(1),
            seq: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::error!("failed to read {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(name);
        let tmp = self.path(&format!("{}.tmp", name));
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path).map_err(|e| {
            log::error!("failed to replace {}: {}", path.display(), e);
            Error::from(e)
        })
    }

    fn load_artworks(&self) -> Result<Vec<Artwork>> {
        Ok(self.read_json(ARTWORKS_FILE)?.unwrap_or_default())
    }

    fn load_rotation(&self) -> Result<RotationState> {
        Ok(self.read_json(ROTATION_FILE)?.unwrap_or_default())
    }
}

impl Gallery for FileStore {
    fn latest(&self) -> Result<Drawing> {
        self.read_json::<Drawing>(LATEST_FILE)?
            .ok_or_else(|| Error::NotFound("no latest yet".into()))
    }

    fn put_latest(&mut self, drawing: &Drawing) -> Result<()> {
        self.write_json(LATEST_FILE, &drawing.normalized())
    }

    fn list(&self) -> Result<Vec<ArtworkSummary>> {
        Ok(summaries(&self.load_artworks()?))
    }

    fn artwork(&self, id: &str) -> Result<Artwork> {
        self.load_artworks()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("artwork {}", id)))
    }

    fn submit(&mut self, artist: &str, drawing: Drawing) -> Result<String> {
        let mut artworks = self.load_artworks()?;
        let mut artwork = new_artwork(artist, drawing.clone(), self.seq)?;
        self.seq += 1;
        while artworks.iter().any(|a| a.id == artwork.id) {
            artwork = new_artwork(artist, drawing.clone(), self.seq)?;
            self.seq += 1;
        }
        let id = artwork.id.clone();
        log::info!("new artwork {} by {:?}", id, artwork.artist);
        artworks.push(artwork);
        enforce_retention(&mut artworks, self.max_artworks);
        self.write_json(ARTWORKS_FILE, &artworks)?;
        Ok(id)
    }

    fn current(&self) -> Result<Artwork> {
        let state = self.load_rotation()?;
        let id = state
            .current_id
            .ok_or_else(|| Error::NotFound("nothing playing yet".into()))?;
        self.artwork(&id)
    }

    fn advance(&mut self) -> Result<Artwork> {
        let mut artworks = self.load_artworks()?;
        let picked = rotation::advance(&mut artworks)
            .cloned()
            .ok_or(Error::NoArtworks)?;
        // current first: a failed count bump can only repeat an artwork later
        self.write_json(
            ROTATION_FILE,
            &RotationState {
                current_id: Some(picked.id.clone()),
                advanced_at: Some(super::now_ms()),
            },
        )?;
        if let Err(e) = self.write_json(ARTWORKS_FILE, &artworks) {
            log::error!(
                "now playing {} but its display count was not saved: {}",
                picked.id,
                e
            );
            return Err(e);
        }
        log::debug!("now playing {} (shown {} times)", picked.id, picked.display_count);
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_mean_empty_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data"), 10);
        assert!(matches!(store.latest(), Err(Error::NotFound(_))));
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.current(), Err(Error::NotFound(_))));
    }

    #[test]
    fn corrupt_artwork_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ARTWORKS_FILE), "{ nope").unwrap();
        let store = FileStore::open(dir.path(), 10);
        assert!(matches!(store.list(), Err(Error::Serialization(_))));
    }

    #[test]
    fn malformed_latest_file_normalizes_to_blank() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LATEST_FILE), r#"{"w": 8, "h": 8}"#).unwrap();
        let store = FileStore::open(dir.path(), 10);
        assert_eq!(store.latest().unwrap(), Drawing::blank());
    }

    #[test]
    fn failed_count_write_still_moves_current() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path(), 10);
        let id = store.submit("a", Drawing::blank()).unwrap();
        // a directory in the way of the temp file makes the artworks write fail
        fs::create_dir(dir.path().join(format!("{}.tmp", ARTWORKS_FILE))).unwrap();

        assert!(matches!(store.advance(), Err(Error::Storage(_))));
        let current = store.current().unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.display_count, 0);
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path(), 10);
        store.put_latest(&Drawing::blank()).unwrap();
        store.submit("a", Drawing::blank()).unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
        assert!(names.contains(&LATEST_FILE.to_string()));
        assert!(names.contains(&ARTWORKS_FILE.to_string()));
    }
}
