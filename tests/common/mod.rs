#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use plexassist::config::Config;
use plexassist::devices::{run_discovery, Client, DeviceHandle, DeviceRegistry, DiscoveryEvent};
use plexassist::i18n::Localization;
use plexassist::library::{LibraryIndex, LibraryStore};
use plexassist::media::{Album, Episode, Media, MediaInfo, Movie, Season, Show, Track};
use plexassist::processor::Processor;
use plexassist::providers::{ClientSource, LibraryProvider, LibrarySnapshot, SnapshotProvider};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

pub const DEVICES: &[&str] = &["Living Room TV", "Kitchen"];

pub fn day(n: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).single()
}

fn info(title: &str, added: u32) -> MediaInfo {
    MediaInfo {
        title: title.to_string(),
        added_at: day(added),
        section_id: Some(1),
        ..Default::default()
    }
}

pub fn movie(title: &str, added: u32, watched: bool) -> Media {
    let mut info = info(title, added);
    info.watched = watched;
    Media::Movie(Movie {
        info,
        genres: Vec::new(),
    })
}

pub fn episode(show: &str, season: u32, index: u32, watched: bool) -> Episode {
    let mut info = info(&format!("{} {}x{:02}", show, season, index), season * 10 + index);
    info.watched = watched;
    info.section_id = Some(2);
    Episode {
        info,
        season_index: season,
        index,
        show_title: show.to_string(),
    }
}

/// Episode `(s, e)` is added on day `s * 10 + e`; `watched` lists watched episodes
pub fn show(title: &str, seasons: u32, per_season: u32, watched: &[(u32, u32)]) -> Media {
    let mut info = info(title, 1);
    info.section_id = Some(2);
    Media::Show(Show {
        info,
        seasons: (1..=seasons)
            .map(|s| Season {
                info: MediaInfo {
                    section_id: Some(2),
                    ..MediaInfo::new(format!("Season {}", s))
                },
                index: s,
                show_title: title.to_string(),
                episodes: (1..=per_season)
                    .map(|e| episode(title, s, e, watched.contains(&(s, e))))
                    .collect(),
            })
            .collect(),
    })
}

pub fn track(title: &str, index: u32, view_count: u32, view_offset: u64) -> Track {
    let mut info = info(title, 2);
    info.view_count = view_count;
    info.view_offset = view_offset;
    Track {
        info,
        index,
        album_title: None,
    }
}

pub fn album(title: &str, genres: &[&str], tracks: Vec<Track>) -> Media {
    Media::Album(Album {
        info: info(title, 2),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        tracks,
    })
}

/// A small household library with an on-deck episode and one client
pub fn household_snapshot() -> LibrarySnapshot {
    LibrarySnapshot {
        media: vec![
            movie("Alien", 3, false),
            movie("Aliens", 5, false),
            movie("The Matrix", 4, true),
            show("Friends", 2, 3, &[(2, 3)]),
            show("The Office", 1, 2, &[]),
            album(
                "Abbey Road",
                &["Rock"],
                vec![track("Come Together", 1, 3, 0), track("Something", 2, 1, 0)],
            ),
            album(
                "Dune",
                &["Audiobook"],
                vec![
                    track("Part One", 1, 1, 0),
                    track("Part Two", 2, 0, 0),
                    track("Part Three", 3, 0, 12_000),
                ],
            ),
        ],
        on_deck: vec![Media::Episode(episode("Friends", 1, 2, false))],
        clients: vec![Client {
            title: "Bedroom Shield".into(),
            machine_id: "shield-1".into(),
        }],
    }
}

pub struct TestContext {
    pub temp_dir: TempDir,
    pub library_path: PathBuf,
    pub provider: Arc<SnapshotProvider>,
    pub store: Arc<LibraryStore>,
    pub registry: Arc<DeviceRegistry>,
    pub processor: Processor,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_index(None).await
    }

    /// Start from `index` instead of a fresh fetch
    pub async fn with_index(index: Option<LibraryIndex>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library_path = temp_dir.path().join("library.json");
        let json = serde_json::to_string_pretty(&household_snapshot()).expect("Failed to serialize library");
        std::fs::write(&library_path, json).expect("Failed to write library");

        let provider = Arc::new(SnapshotProvider::from_file(&library_path).expect("Failed to load library"));
        let index = match index {
            Some(index) => index,
            None => LibraryIndex::fetch(provider.as_ref() as &dyn LibraryProvider).expect("Failed to index library"),
        };
        let store = Arc::new(LibraryStore::new(index));

        let aliases = HashMap::from([("telly".to_string(), "Living Room TV".to_string())]);
        let registry = Arc::new(DeviceRegistry::new(aliases));
        let (tx, rx) = mpsc::channel(8);
        let source: Arc<dyn ClientSource> = provider.clone();
        let discovery = tokio::spawn(run_discovery(registry.clone(), rx, source));
        for name in DEVICES {
            tx.send(DiscoveryEvent::Device(DeviceHandle::new(*name)))
                .await
                .expect("Failed to send discovery event");
        }
        drop(tx);
        discovery.await.expect("Discovery task failed");

        let config = Config {
            default_device: Some("Kitchen".to_string()),
            ..Default::default()
        };
        let processor = Processor::new(
            Arc::new(Localization::english()),
            store.clone(),
            registry.clone(),
            provider.clone(),
            config,
        );

        Self {
            temp_dir,
            library_path,
            provider,
            store,
            registry,
            processor,
        }
    }
}
