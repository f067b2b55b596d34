use super::{Artwork, ArtworkSummary, Gallery};
use crate::drawing::Drawing;
use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Latest(oneshot::Sender<Result<Drawing>>),
    PutLatest(Drawing, oneshot::Sender<Result<()>>),
    List(oneshot::Sender<Result<Vec<ArtworkSummary>>>),
    Artwork(String, oneshot::Sender<Result<Artwork>>),
    Submit(String, Drawing, oneshot::Sender<Result<String>>),
    Current(oneshot::Sender<Result<Artwork>>),
    Advance(oneshot::Sender<Result<Artwork>>),
}

/// A cloneable handle to a gallery owned by a dedicated worker thread.
///
/// Every request is queued to the worker and answered over a oneshot
/// channel, so store operations never interleave even when many server
/// threads share the handle. Each operation comes in an `async` flavour and
/// a `blocking_` flavour for callers outside a runtime.
#[derive(Clone)]
pub struct StoreHandle {
    cmd_tx: Sender<Command>,
    secret: Option<[u8; 32]>,
}

impl StoreHandle {
    /// Spawn the worker thread that owns `store`.
    ///
    /// `secret` gates [`StoreHandle::advance`]; with `None` every advance is
    /// refused.
    pub fn spawn(mut store: Box<dyn Gallery>, secret: Option<&str>) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::Builder::new()
            .name("store-worker".into())
            .spawn(move || {
                // Command loop; ends when the last handle is dropped
                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        Command::Latest(resp) => {
                            let _ = resp.send(store.latest());
                        }
                        Command::PutLatest(drawing, resp) => {
                            let _ = resp.send(store.put_latest(&drawing));
                        }
                        Command::List(resp) => {
                            let _ = resp.send(store.list());
                        }
                        Command::Artwork(id, resp) => {
                            let _ = resp.send(store.artwork(&id));
                        }
                        Command::Submit(artist, drawing, resp) => {
                            let _ = resp.send(store.submit(&artist, drawing));
                        }
                        Command::Current(resp) => {
                            let _ = resp.send(store.current());
                        }
                        Command::Advance(resp) => {
                            let _ = resp.send(store.advance());
                        }
                    }
                }
                log::debug!("store worker exiting");
            })
            .map_err(|e| Error::Other(format!("Failed to spawn store worker: {}", e)))?;

        Ok(Self {
            cmd_tx,
            secret: secret.map(digest),
        })
    }

    fn send<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<oneshot::Receiver<Result<T>>> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| Error::WorkerGone("request channel closed".into()))?;
        Ok(rx)
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let rx = self.send(make)?;
        rx.await
            .map_err(|e| Error::WorkerGone(format!("request canceled: {}", e)))?
    }

    fn call_blocking<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let rx = self.send(make)?;
        rx.blocking_recv()
            .map_err(|e| Error::WorkerGone(format!("request canceled: {}", e)))?
    }

    fn check_secret(&self, secret: &str) -> Result<()> {
        match &self.secret {
            Some(expected) if *expected == digest(secret) => Ok(()),
            _ => {
                log::warn!("rotation advance refused: bad secret");
                Err(Error::Unauthorized)
            }
        }
    }

    pub async fn latest(&self) -> Result<Drawing> {
        self.call(Command::Latest).await
    }

    pub async fn put_latest(&self, drawing: Drawing) -> Result<()> {
        self.call(|tx| Command::PutLatest(drawing, tx)).await
    }

    pub async fn list(&self) -> Result<Vec<ArtworkSummary>> {
        self.call(Command::List).await
    }

    pub async fn artwork(&self, id: &str) -> Result<Artwork> {
        self.call(|tx| Command::Artwork(id.to_string(), tx)).await
    }

    pub async fn submit(&self, artist: &str, drawing: Drawing) -> Result<String> {
        self.call(|tx| Command::Submit(artist.to_string(), drawing, tx)).await
    }

    pub async fn current(&self) -> Result<Artwork> {
        self.call(Command::Current).await
    }

    /// Advance the rotation if `secret` matches the configured one.
    pub async fn advance(&self, secret: &str) -> Result<Artwork> {
        self.check_secret(secret)?;
        self.call(Command::Advance).await
    }

    pub fn blocking_latest(&self) -> Result<Drawing> {
        self.call_blocking(Command::Latest)
    }

    pub fn blocking_put_latest(&self, drawing: Drawing) -> Result<()> {
        self.call_blocking(|tx| Command::PutLatest(drawing, tx))
    }

    pub fn blocking_list(&self) -> Result<Vec<ArtworkSummary>> {
        self.call_blocking(Command::List)
    }

    pub fn blocking_artwork(&self, id: &str) -> Result<Artwork> {
        self.call_blocking(|tx| Command::Artwork(id.to_string(), tx))
    }

    pub fn blocking_submit(&self, artist: &str, drawing: Drawing) -> Result<String> {
        self.call_blocking(|tx| Command::Submit(artist.to_string(), drawing, tx))
    }

    pub fn blocking_current(&self) -> Result<Artwork> {
        self.call_blocking(Command::Current)
    }

    pub fn blocking_advance(&self, secret: &str) -> Result<Artwork> {
        self.check_secret(secret)?;
        self.call_blocking(Command::Advance)
    }
}

fn digest(secret: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn handle(secret: Option<&str>) -> StoreHandle {
        StoreHandle::spawn(Box::new(MemoryStore::new(10)), secret).unwrap()
    }

    #[tokio::test]
    async fn async_calls_reach_the_store() {
        let h = handle(Some("s3cret"));
        assert!(matches!(h.latest().await, Err(Error::NotFound(_))));
        h.put_latest(Drawing::blank()).await.unwrap();
        assert_eq!(h.latest().await.unwrap(), Drawing::blank());

        let id = h.submit("ann", Drawing::blank()).await.unwrap();
        assert_eq!(h.list().await.unwrap()[0].id, id);
        assert_eq!(h.advance("s3cret").await.unwrap().id, id);
        assert_eq!(h.current().await.unwrap().display_count, 1);
    }

    #[tokio::test]
    async fn wrong_or_missing_secret_is_unauthorized() {
        let h = handle(Some("s3cret"));
        h.submit("ann", Drawing::blank()).await.unwrap();
        assert!(matches!(h.advance("guess").await, Err(Error::Unauthorized)));
        assert!(matches!(h.advance("").await, Err(Error::Unauthorized)));

        let open = handle(None);
        open.submit("ann", Drawing::blank()).await.unwrap();
        assert!(matches!(open.advance("").await, Err(Error::Unauthorized)));
    }

    #[test]
    fn blocking_calls_from_many_threads_serialize() {
        let h = handle(Some("k"));
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let h = h.clone();
                std::thread::spawn(move || h.blocking_submit(&format!("t{}", i), Drawing::blank()).unwrap())
            })
            .collect();
        let mut ids: Vec<String> = threads.into_iter().map(|t| t.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(h.blocking_list().unwrap().len(), 8);
        assert!(matches!(h.blocking_advance("k"), Ok(_)));
        assert!(matches!(h.blocking_artwork("missing"), Err(Error::NotFound(_))));
    }
}
