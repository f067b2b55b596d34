//! unicorn-draw
//!
//! A 32×32 pixel-art editor core with shareable link payloads, plus a small
//! gallery server that keeps submitted artworks in flat JSON files and serves
//! a fair "now playing" rotation to an LED display.
//!
//! # Features
//!
//! - **Codec**: compact versioned binary payload, carried as base64url in a
//!   `#p=` link fragment; fail-soft normalization of untrusted drawing JSON
//! - **Editor**: point paint, 4-connected flood fill, stroke-level undo/redo
//! - **Gallery**: file-backed store behind a single-owner worker thread
//! - **Server** (`server` feature, default): HTTP API and static files
//!
//! # Example
//!
//! ```
//! use unicorn_draw::{codec, Editor};
//!
//! let mut editor = Editor::new();
//! editor.set_color("#ff0000");
//! editor.pointer_down(Some(0));
//! editor.pointer_move(Some(1));
//! editor.pointer_up();
//!
//! let token = editor.share_token();
//! assert_eq!(&codec::decode(&token), editor.drawing());
//!
//! editor.undo();
//! assert!(editor.drawing().pixels.iter().all(|&p| p == 0));
//! ```

use std::path::PathBuf;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod codec;
pub mod drawing;
pub mod editor;
pub mod history;
pub mod paint;
pub mod palette;
pub mod ratelimit;
pub mod rendering;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

pub use drawing::{Drawing, Rgb, ShapeError, CELLS, HEIGHT, WIDTH};
pub use editor::{Editor, StrokeState, Tool};
pub use history::History;
pub use store::{Artwork, ArtworkSummary, FileStore, Gallery, MemoryStore, StoreHandle};

/// Configuration for the gallery server
///
/// Defaults match a small single-host deployment:
/// - data lives in `./data`
/// - no rotation secret, so `/api/next` refuses every request until one is set
/// - no public root, so only the API is served
///
/// # Examples
///
/// ```
/// let cfg = unicorn_draw::ServerConfig::default();
/// assert_eq!(cfg.port, 8080);
/// assert!(cfg.secret.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub bind: String,
    /// TCP port
    pub port: u16,
    /// Directory holding the JSON files
    pub data_dir: PathBuf,
    /// Directory served as static files (editor, viewer, gallery pages)
    pub public_root: Option<PathBuf>,
    /// Shared secret for `/api/next`
    pub secret: Option<String>,
    /// Keep everything in memory instead of `data_dir`
    pub ephemeral: bool,
    /// Largest accepted request body in bytes
    pub body_limit: usize,
    /// Artworks kept before the oldest are evicted
    pub max_artworks: usize,
    /// Submissions allowed per client per window (0 disables limiting)
    pub submit_limit: u32,
    /// Length of the rate limiting window
    pub submit_window: Duration,
    /// HTTP worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            public_root: None,
            secret: None,
            ephemeral: false,
            body_limit: 200_000,
            max_artworks: 500,
            submit_limit: 10,
            submit_window: Duration::from_secs(60),
            workers: num_cpus::get().max(2),
        }
    }
}

impl ServerConfig {
    /// `bind:port` string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::ConfigError("workers must be at least 1".into()));
        }
        if self.body_limit == 0 {
            return Err(Error::ConfigError("body limit must be positive".into()));
        }
        if self.secret.as_deref().is_some_and(str::is_empty) {
            return Err(Error::ConfigError("secret must not be empty".into()));
        }
        Ok(())
    }

    /// Build the configured gallery backend.
    pub fn open_store(&self) -> Box<dyn Gallery> {
        if self.ephemeral {
            Box::new(MemoryStore::new(self.max_artworks))
        } else {
            Box::new(FileStore::open(&self.data_dir, self.max_artworks))
        }
    }
}
