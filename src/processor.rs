//! Command Processor
//!
//! Runs a spoken command through every stage: flag detection, library
//! classification, qualifier extraction, device split, title match and
//! media resolution.

use crate::config::Config;
use crate::core::{
    collapse_whitespace, contains_any, get_command_num, get_library, get_media_and_device,
    remove_category_words, remove_keywords, strip_leading_phrase,
};
use crate::devices::{DeviceRegistry, DeviceTarget};
use crate::error::{AssistError, AssistResult, ResolveError};
use crate::i18n::Localization;
use crate::library::{LibraryKind, LibraryStore};
use crate::media::Media;
use crate::providers::LibraryProvider;
use crate::resolver::{find_title, MediaResolver, TitleMatch};
use crate::selection::{media_error, Selection};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

lazy_static! {
    static ref PUNCTUATION: Option<Regex> = Regex::new(r"[^\w\s']+").ok();
}

/// What a command asked for, before anything is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub selection: Selection,
    /// Spoken device name, or the configured default
    pub device: Option<String>,
}

/// A command resolved to something playable and somewhere to play it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub media: Media,
    pub device: DeviceTarget,
    pub selection: Selection,
    pub title: TitleMatch,
}

pub struct Processor {
    localization: Arc<Localization>,
    library: Arc<LibraryStore>,
    devices: Arc<DeviceRegistry>,
    provider: Arc<dyn LibraryProvider>,
    config: Config,
}

impl Processor {
    pub fn new(
        localization: Arc<Localization>,
        library: Arc<LibraryStore>,
        devices: Arc<DeviceRegistry>,
        provider: Arc<dyn LibraryProvider>,
        config: Config,
    ) -> Self {
        Self {
            localization,
            library,
            devices,
            provider,
            config,
        }
    }

    /// Lowercase, drop punctuation, collapse whitespace
    fn preprocess_text(text: &str) -> String {
        let lower = text.to_lowercase();
        let cleaned = match PUNCTUATION.as_ref() {
            Some(re) => re.replace_all(&lower, " ").into_owned(),
            None => lower,
        };
        collapse_whitespace(&cleaned)
    }

    /// Drop the classified library's category words. A phrase made only of
    /// them ("tv shows") leaves the whole library as the target.
    fn strip_category(&self, media: &str, library: Option<LibraryKind>) -> String {
        let loc = &self.localization;
        match library {
            Some(LibraryKind::Movies) => remove_category_words(&loc.movies, media),
            Some(LibraryKind::Shows) => remove_category_words(&loc.shows, media),
            Some(LibraryKind::Albums) => remove_category_words(&loc.albums, media),
            Some(LibraryKind::Tracks) => remove_category_words(&loc.tracks, media),
            None => media.to_string(),
        }
    }

    /// Parse a command into Selection Options and a device name
    pub fn interpret(&self, command: &str) -> Interpretation {
        let loc = &self.localization;
        let index = self.library.snapshot();
        let device_names = self.devices.snapshot().all_names();

        let command = Self::preprocess_text(command);
        let mut command = strip_leading_phrase(&command, &loc.play_start);
        debug!("Processing command: '{}'", command);

        let ondeck = contains_any(&loc.ondeck, &command);
        let unwatched = contains_any(&loc.unwatched, &command);
        let latest = contains_any(&loc.latest, &command);

        let library = get_library(&command, loc, &device_names);

        let mut numbers = [None; 3];
        for (slot, item) in numbers.iter_mut().zip([&loc.season, &loc.episode, &loc.track]) {
            let found = get_command_num(&command, item, &loc.ordinals);
            *slot = found.number;
            command = found.command;
        }
        let [season, episode, track] = numbers;

        for (set, item) in [(ondeck, &loc.ondeck), (unwatched, &loc.unwatched), (latest, &loc.latest)] {
            if set {
                command = remove_keywords(item, &command, "");
            }
        }

        let split = get_media_and_device(
            loc,
            &command,
            &index,
            library,
            self.config.default_device.as_deref(),
            &device_names,
        );
        let media = self.strip_category(&split.media, library);

        let selection = Selection {
            season,
            episode,
            track,
            ondeck,
            unwatched,
            latest,
            library,
            media: (!media.is_empty()).then_some(media),
        };
        debug!("🧭 {:?} on {:?}", selection, split.device);

        Interpretation {
            selection,
            device: split.device,
        }
    }

    /// Resolve a command to media and a playback device
    pub fn process(&self, command: &str) -> AssistResult<Resolution> {
        if let Err(e) = self.library.refresh_if_stale(self.provider.as_ref()) {
            warn!("⚠️ Library refresh failed, using previous index: {}", e);
        }

        let Interpretation { selection, device } = self.interpret(command);
        let index = self.library.snapshot();

        let title = find_title(&selection, &index);
        let media = MediaResolver::new(self.provider.as_ref())
            .resolve(&selection, &title, &index)
            .map_err(|e| match e {
                ResolveError::EntityNotFound { .. } | ResolveError::Provider(_) => AssistError::from(e),
                other => {
                    debug!("Resolution failed: {}", other);
                    AssistError::MediaNotFound(media_error(&selection, &self.localization))
                }
            })?;

        let device_name = device
            .ok_or_else(|| AssistError::DeviceNotFound("no device named and no default set".to_string()))?;
        let device = self.devices.resolve(&device_name, self.config.device_cutoff)?;

        info!("▶️ {} '{}' on {}", media.media_type(), media.title(), device.name);
        Ok(Resolution {
            media,
            device,
            selection,
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{DeviceHandle, DiscoveryEvent};
    use crate::library::LibraryIndex;
    use crate::media::fixtures::*;
    use crate::providers::snapshot::{LibrarySnapshot, SnapshotProvider};

    async fn processor(media: Vec<Media>, devices: &[&str], default_device: Option<&str>) -> Processor {
        let provider = Arc::new(SnapshotProvider::new(LibrarySnapshot {
            media,
            ..Default::default()
        }));
        let library = Arc::new(LibraryStore::new(LibraryIndex::fetch(provider.as_ref()).expect("index")));
        let registry = Arc::new(DeviceRegistry::default());
        for name in devices {
            registry
                .apply(DiscoveryEvent::Device(DeviceHandle::new(*name)), provider.as_ref())
                .await;
        }
        let config = Config {
            default_device: default_device.map(str::to_string),
            ..Default::default()
        };
        Processor::new(Arc::new(Localization::english()), library, registry, provider, config)
    }

    #[test]
    fn test_preprocess_text() {
        assert_eq!(Processor::preprocess_text("  Play Spider-Man, NOW! "), "play spider man now");
        assert_eq!(Processor::preprocess_text("Grey's Anatomy"), "grey's anatomy");
    }

    #[tokio::test]
    async fn test_interpret_season_and_device() {
        let p = processor(vec![show("Friends", 3, 2)], &["Living Room TV"], None).await;
        let result = p.interpret("Play the third season of Friends on the Living Room TV");

        assert_eq!(result.selection.season, Some(3));
        assert_eq!(result.selection.library, Some(LibraryKind::Shows));
        assert_eq!(result.selection.media.as_deref(), Some("friends"));
        assert_eq!(result.device.as_deref(), Some("living room tv"));
    }

    #[tokio::test]
    async fn test_interpret_flags_removed() {
        let p = processor(vec![show("The Office", 1, 2)], &[], Some("Kitchen")).await;
        let result = p.interpret("play the latest episode of the office");

        assert!(result.selection.latest);
        assert_eq!(result.selection.episode, None);
        assert_eq!(result.selection.media.as_deref(), Some("the office"));
        assert_eq!(result.device.as_deref(), Some("Kitchen"));
    }

    #[tokio::test]
    async fn test_interpret_on_deck_only() {
        let p = processor(vec![], &[], None).await;
        let result = p.interpret("play on deck");
        assert!(result.selection.ondeck);
        assert_eq!(result.selection.media, None);
        assert_eq!(result.device, None);
    }

    #[tokio::test]
    async fn test_category_word_stripped() {
        let p = processor(vec![movie("Alien", 1)], &[], None).await;
        let result = p.interpret("watch the movie alien");
        assert_eq!(result.selection.library, Some(LibraryKind::Movies));
        assert_eq!(result.selection.media.as_deref(), Some("the alien"));

        // Only category words left: the whole library is the target
        let result = p.interpret("play the latest movies");
        assert!(result.selection.latest);
        assert_eq!(result.selection.library, Some(LibraryKind::Movies));
        assert_eq!(result.selection.media, None);

        let result = p.interpret("play on deck tv shows");
        assert_eq!(result.selection.library, Some(LibraryKind::Shows));
        assert_eq!(result.selection.media, None);
    }

    #[tokio::test]
    async fn test_process_not_found_message() {
        let p = processor(vec![show("Friends", 1, 2)], &["Kitchen"], Some("Kitchen")).await;
        let err = p.process("play friends season 4").expect_err("no fourth season");
        match err {
            AssistError::MediaNotFound(message) => assert_eq!(message, "Friends season 4 not found."),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_process_without_device() {
        let p = processor(vec![movie("Alien", 1)], &[], None).await;
        assert!(matches!(p.process("play alien"), Err(AssistError::DeviceNotFound(_))));
    }
}
