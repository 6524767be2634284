//! Library provider backed by a JSON snapshot of the server

use crate::devices::Client;
use crate::error::{AssistError, AssistResult};
use crate::library::LibraryKind;
use crate::media::{Media, Track};
use crate::providers::{ClientSource, LibraryProvider};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the assistant reads from a server, in one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub on_deck: Vec<Media>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl LibrarySnapshot {
    pub fn from_file(path: &Path) -> AssistResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| AssistError::Library(format!("{}: {}", path.display(), e)))
    }
}

pub struct SnapshotProvider {
    snapshot: LibrarySnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: LibrarySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: &Path) -> AssistResult<Self> {
        LibrarySnapshot::from_file(path).map(Self::new)
    }

    /// Tracks stored on their own plus every album's tracks
    fn all_tracks(&self) -> Vec<Media> {
        let mut tracks = Vec::new();
        for media in &self.snapshot.media {
            match media {
                Media::Track(_) => tracks.push(media.clone()),
                Media::Album(album) => {
                    tracks.extend(album.tracks.iter().map(|t| {
                        Media::Track(Track {
                            album_title: t
                                .album_title
                                .clone()
                                .or_else(|| Some(album.info.title.clone())),
                            ..t.clone()
                        })
                    }));
                }
                _ => {}
            }
        }
        tracks
    }
}

impl LibraryProvider for SnapshotProvider {
    fn search(&self, kind: LibraryKind) -> Result<Vec<Media>> {
        if kind == LibraryKind::Tracks {
            return Ok(self.all_tracks());
        }
        Ok(self
            .snapshot
            .media
            .iter()
            .filter(|m| m.media_type() == kind.media_type())
            .cloned()
            .collect())
    }

    fn on_deck(&self, section: Option<u32>) -> Result<Vec<Media>> {
        Ok(self
            .snapshot
            .on_deck
            .iter()
            .filter(|m| section.is_none() || m.info().section_id == section)
            .cloned()
            .collect())
    }

    fn recently_added(&self) -> Result<Vec<Media>> {
        let mut recent = self.snapshot.media.clone();
        recent.sort_by_key(|m| std::cmp::Reverse(m.recency()));
        Ok(recent)
    }
}

#[async_trait]
impl ClientSource for SnapshotProvider {
    async fn clients(&self) -> Result<Vec<Client>> {
        Ok(self.snapshot.clients.clone())
    }
}
