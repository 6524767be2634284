use crate::devices::Client;
use crate::library::LibraryKind;
use crate::media::Media;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read access to the media server's library.
///
/// Resolution calls these synchronously; implementations that talk to a
/// server are expected to answer from their own cache or block briefly.
pub trait LibraryProvider: Send + Sync {
    /// Every item of one category
    fn search(&self, kind: LibraryKind) -> Result<Vec<Media>>;

    /// Items in progress, for one library section or the whole server
    fn on_deck(&self, section: Option<u32>) -> Result<Vec<Media>>;

    /// Recently added items, newest first
    fn recently_added(&self) -> Result<Vec<Media>>;

    /// When the newest item was added
    fn newest_added_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .recently_added()?
            .iter()
            .filter_map(|m| m.info().added_at)
            .max())
    }
}

/// Source of the playback clients registered with the server
#[async_trait]
pub trait ClientSource: Send + Sync {
    async fn clients(&self) -> Result<Vec<Client>>;
}

pub mod snapshot;

pub use snapshot::{LibrarySnapshot, SnapshotProvider};
