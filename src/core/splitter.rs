//! Device/media splitting
//!
//! "play inception on living room tv" names a device after the separator,
//! but "play dinner on the lake" may just be a title. Fuzzy scores against
//! titles and device names decide which reading wins.

use super::keywords::remove_keywords;
use crate::i18n::Localization;
use crate::library::{LibraryIndex, LibraryKind};
use crate::utils::fuzzy::{fuzzy, Scorer};
use tracing::debug;

/// Media phrase and target device name of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAndDevice {
    pub media: String,
    pub device: Option<String>,
}

/// Scores deciding whether the text after the last separator is a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitScores {
    /// Whole command against titles
    pub full: u8,
    /// Command minus the trailing segment against titles
    pub split: u8,
    /// Trailing segment against device names
    pub cast: u8,
}

impl SplitScores {
    pub fn compute<S: AsRef<str>>(command: &str, trailing: &str, titles: &[S], device_names: &[String]) -> Self {
        let without_trailing = command.strip_suffix(trailing).unwrap_or(command);
        Self {
            full: fuzzy(command, titles, Scorer::Quick).score,
            split: fuzzy(without_trailing, titles, Scorer::Quick).score,
            cast: fuzzy(trailing, device_names, Scorer::Quick).score,
        }
    }

    /// The split stands unless the whole command beats both readings
    pub fn is_device(&self) -> bool {
        !(self.full > self.split && self.full > self.cast)
    }
}

/// Separate the media phrase from a trailing "on <device>".
///
/// `library` narrows the titles used for scoring; `device_names` holds every
/// device, client and alias name.
pub fn get_media_and_device(
    localization: &Localization,
    command: &str,
    index: &LibraryIndex,
    library: Option<LibraryKind>,
    default_device: Option<&str>,
    device_names: &[String],
) -> MediaAndDevice {
    let default_device = default_device.map(str::to_string);
    let separator = localization.separator.primary();
    if separator.is_empty() {
        return MediaAndDevice {
            media: command.trim().to_string(),
            device: default_device,
        };
    }

    let command = remove_keywords(&localization.separator, command, separator);

    if let Some(rest) = command.trim().strip_prefix(&format!("{} ", separator)) {
        return MediaAndDevice {
            media: String::new(),
            device: Some(rest.trim().to_string()),
        };
    }

    if let Some((media, device)) = command.rsplit_once(&format!(" {} ", separator)) {
        let titles = match library {
            Some(kind) => index.section(kind).titles().to_vec(),
            None => index.all_titles(),
        };
        let scores = SplitScores::compute(&command, device, &titles, device_names);
        debug!("✂️ Split '{}' | '{}': {:?}", media, device, scores);

        if scores.is_device() {
            return MediaAndDevice {
                media: media.trim().to_string(),
                device: Some(device.trim().to_string()),
            };
        }
    }

    MediaAndDevice {
        media: command,
        device: default_device,
    }
}
