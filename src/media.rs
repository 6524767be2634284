//! Media model
//!
//! The subset of a Plex library item that command resolution reads:
//! titles, timestamps, watch state and navigation to children.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Season,
    Episode,
    Album,
    Track,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Season => "season",
            MediaType::Episode => "episode",
            MediaType::Album => "album",
            MediaType::Track => "track",
        };
        f.write_str(name)
    }
}

/// Attributes shared by every media item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub view_count: u32,
    /// Milliseconds since the last saved playback checkpoint
    #[serde(default)]
    pub view_offset: u64,
    /// Library section the item lives in
    #[serde(default)]
    pub section_id: Option<u32>,
}

impl MediaInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sort key used everywhere items are ordered by age: added, else updated
    pub fn recency(&self) -> Option<DateTime<Utc>> {
        self.added_at.or(self.updated_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(flatten)]
    pub info: MediaInfo,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    #[serde(flatten)]
    pub info: MediaInfo,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    #[serde(flatten)]
    pub info: MediaInfo,
    pub index: u32,
    pub show_title: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(flatten)]
    pub info: MediaInfo,
    pub season_index: u32,
    pub index: u32,
    pub show_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(flatten)]
    pub info: MediaInfo,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(flatten)]
    pub info: MediaInfo,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub album_title: Option<String>,
}

impl Show {
    pub fn season(&self, index: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.index == index)
    }

    pub fn episode(&self, season: u32, episode: u32) -> Option<&Episode> {
        self.season(season)?
            .episodes
            .iter()
            .find(|e| e.index == episode)
    }

    /// All episodes in season order
    pub fn episodes(&self) -> Vec<Episode> {
        self.seasons
            .iter()
            .flat_map(|s| s.episodes.iter().cloned())
            .collect()
    }
}

impl Album {
    pub fn is_audiobook(&self) -> bool {
        self.genres
            .iter()
            .any(|g| g.eq_ignore_ascii_case("audiobook"))
    }
}

/// A library item the assistant can resolve and play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Movie(Movie),
    Show(Show),
    Season(Season),
    Episode(Episode),
    Album(Album),
    Track(Track),
}

impl Media {
    pub fn info(&self) -> &MediaInfo {
        match self {
            Media::Movie(m) => &m.info,
            Media::Show(s) => &s.info,
            Media::Season(s) => &s.info,
            Media::Episode(e) => &e.info,
            Media::Album(a) => &a.info,
            Media::Track(t) => &t.info,
        }
    }

    pub fn title(&self) -> &str {
        &self.info().title
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Media::Movie(_) => MediaType::Movie,
            Media::Show(_) => MediaType::Show,
            Media::Season(_) => MediaType::Season,
            Media::Episode(_) => MediaType::Episode,
            Media::Album(_) => MediaType::Album,
            Media::Track(_) => MediaType::Track,
        }
    }

    pub fn is_watched(&self) -> bool {
        self.info().watched
    }

    pub fn recency(&self) -> Option<DateTime<Utc>> {
        self.info().recency()
    }

    /// Title of the show a season or episode belongs to
    pub fn show_title(&self) -> Option<&str> {
        match self {
            Media::Season(s) => Some(&s.show_title),
            Media::Episode(e) => Some(&e.show_title),
            _ => None,
        }
    }

    /// Episodes of a show or season, empty for anything else
    pub fn episodes(&self) -> Vec<Episode> {
        match self {
            Media::Show(s) => s.episodes(),
            Media::Season(s) => s.episodes.clone(),
            _ => Vec::new(),
        }
    }

    /// Playable children: episodes of shows/seasons, tracks of albums,
    /// the item itself otherwise.
    pub fn into_leaves(self) -> Vec<Media> {
        match self {
            Media::Show(s) => s.episodes().into_iter().map(Media::Episode).collect(),
            Media::Season(s) => s.episodes.into_iter().map(Media::Episode).collect(),
            Media::Album(a) => a.tracks.into_iter().map(Media::Track).collect(),
            leaf => vec![leaf],
        }
    }
}

/// Sort ascending by added date, falling back to the updated date.
/// Items with neither sort first.
pub fn sort_by_recency(items: &mut [Media]) {
    items.sort_by_key(|m| m.recency());
}
