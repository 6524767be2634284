//! Library Index
//!
//! Per-category media lists with their titles, as fetched from the server.
//! An index is never patched: refreshes build a new one and swap it in.

use crate::error::{AssistError, AssistResult};
use crate::media::{sort_by_recency, Media, MediaType};
use crate::providers::LibraryProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// The four library categories a command can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    Movies,
    Shows,
    Albums,
    Tracks,
}

impl LibraryKind {
    pub const ALL: [LibraryKind; 4] = [
        LibraryKind::Movies,
        LibraryKind::Shows,
        LibraryKind::Albums,
        LibraryKind::Tracks,
    ];

    /// Type of the items stored in this category
    pub fn media_type(&self) -> MediaType {
        match self {
            LibraryKind::Movies => MediaType::Movie,
            LibraryKind::Shows => MediaType::Show,
            LibraryKind::Albums => MediaType::Album,
            LibraryKind::Tracks => MediaType::Track,
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LibraryKind::Movies => "movies",
            LibraryKind::Shows => "shows",
            LibraryKind::Albums => "albums",
            LibraryKind::Tracks => "tracks",
        };
        f.write_str(name)
    }
}

/// Media of one category and their titles, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LibrarySection {
    media: Vec<Media>,
    titles: Vec<String>,
}

impl LibrarySection {
    /// Sorts the media oldest first and records their titles
    pub fn new(mut media: Vec<Media>) -> Self {
        sort_by_recency(&mut media);
        let titles = media.iter().map(|m| m.title().to_string()).collect();
        Self { media, titles }
    }

    pub fn media(&self) -> &[Media] {
        &self.media
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryIndex {
    movies: LibrarySection,
    shows: LibrarySection,
    albums: LibrarySection,
    tracks: LibrarySection,
    updated: DateTime<Utc>,
}

impl Default for LibraryIndex {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

impl LibraryIndex {
    pub fn new(movies: Vec<Media>, shows: Vec<Media>, albums: Vec<Media>, tracks: Vec<Media>) -> Self {
        Self {
            movies: LibrarySection::new(movies),
            shows: LibrarySection::new(shows),
            albums: LibrarySection::new(albums),
            tracks: LibrarySection::new(tracks),
            updated: Utc::now(),
        }
    }

    /// Build a fresh index from every category the provider serves
    pub fn fetch(provider: &dyn LibraryProvider) -> AssistResult<Self> {
        let search = |kind: LibraryKind| {
            provider
                .search(kind)
                .map_err(|e| AssistError::Library(format!("searching {}: {}", kind, e)))
        };

        let index = Self::new(
            search(LibraryKind::Movies)?,
            search(LibraryKind::Shows)?,
            search(LibraryKind::Albums)?,
            search(LibraryKind::Tracks)?,
        );
        info!(
            "📚 Library loaded: {} movies, {} shows, {} albums, {} tracks",
            index.movies.len(),
            index.shows.len(),
            index.albums.len(),
            index.tracks.len()
        );
        Ok(index)
    }

    pub fn section(&self, kind: LibraryKind) -> &LibrarySection {
        match kind {
            LibraryKind::Movies => &self.movies,
            LibraryKind::Shows => &self.shows,
            LibraryKind::Albums => &self.albums,
            LibraryKind::Tracks => &self.tracks,
        }
    }

    /// Titles of every category: movies, shows, albums, then tracks
    pub fn all_titles(&self) -> Vec<String> {
        LibraryKind::ALL
            .iter()
            .flat_map(|kind| self.section(*kind).titles().iter().cloned())
            .collect()
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = updated;
        self
    }
}

/// Holds the current index; readers get a consistent snapshot
#[derive(Debug, Default)]
pub struct LibraryStore {
    current: RwLock<Arc<LibraryIndex>>,
}

impl LibraryStore {
    pub fn new(index: LibraryIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    pub fn snapshot(&self) -> Arc<LibraryIndex> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new index
    pub fn replace(&self, index: LibraryIndex) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(index);
    }

    pub fn refresh(&self, provider: &dyn LibraryProvider) -> AssistResult<Arc<LibraryIndex>> {
        let index = LibraryIndex::fetch(provider)?;
        self.replace(index);
        Ok(self.snapshot())
    }

    /// Refresh when the server holds media added after the index was built.
    /// Returns whether a refresh happened.
    pub fn refresh_if_stale(&self, provider: &dyn LibraryProvider) -> AssistResult<bool> {
        let updated = self.snapshot().updated();
        let newest = provider
            .newest_added_at()
            .map_err(|e| AssistError::Library(e.to_string()))?;

        match newest {
            Some(added) if added > updated => {
                debug!("Library stale: newest item {} > index {}", added, updated);
                self.refresh(provider)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
