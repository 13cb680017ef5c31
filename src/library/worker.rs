//! Background catalog loading.
//!
//! Album metadata is read on a worker thread so the event loop never blocks.
//! Every request carries a generation; only the reply to the newest request
//! is handed out, older ones are superseded.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::debug;

use super::loader::{CatalogLoader, load_or_empty};
use super::model::Track;

struct CatalogRequest {
    generation: u64,
    album_id: String,
}

/// A finished catalog load.
#[derive(Debug)]
pub struct CatalogReply {
    pub generation: u64,
    pub album_id: String,
    pub tracks: Vec<Track>,
}

pub struct CatalogWorker {
    tx: Sender<CatalogRequest>,
    replies: Receiver<CatalogReply>,
    generation: u64,
}

impl CatalogWorker {
    pub fn spawn(loader: Arc<dyn CatalogLoader>) -> Self {
        let (tx, rx) = mpsc::channel::<CatalogRequest>();
        let (reply_tx, replies) = mpsc::channel::<CatalogReply>();

        thread::spawn(move || {
            for req in rx {
                let tracks = load_or_empty(loader.as_ref(), &req.album_id);
                let reply = CatalogReply {
                    generation: req.generation,
                    album_id: req.album_id,
                    tracks,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            replies,
            generation: 0,
        }
    }

    /// Ask for `album_id`'s catalog, superseding any request still in flight.
    pub fn request(&mut self, album_id: &str) -> u64 {
        self.generation += 1;
        let _ = self.tx.send(CatalogRequest {
            generation: self.generation,
            album_id: album_id.to_string(),
        });
        self.generation
    }

    /// Drain finished loads and return the reply to the newest request, if it
    /// has arrived.
    pub fn poll(&mut self) -> Option<CatalogReply> {
        let mut latest = None;
        for reply in self.replies.try_iter() {
            if reply.generation == self.generation {
                latest = Some(reply);
            } else {
                debug!(
                    album = %reply.album_id,
                    generation = reply.generation,
                    "library: dropping superseded catalog"
                );
            }
        }
        latest
    }
}
