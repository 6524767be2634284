//! Library classification
//!
//! Decides which library a command targets from category keywords.

use crate::i18n::Localization;
use crate::library::LibraryKind;
use tracing::debug;

fn mentions(phrase: &str, words: &[String]) -> bool {
    words
        .iter()
        .any(|w| !w.is_empty() && phrase.contains(w.as_str()))
}

/// Return the library a phrase points at, if any.
///
/// Known device names are cut out first so a device called "TV" can't make
/// the command look like a show request. TV is checked before movies so
/// season and episode cues win.
pub fn get_library(phrase: &str, localization: &Localization, device_names: &[String]) -> Option<LibraryKind> {
    let mut phrase = phrase.to_lowercase();
    for device in device_names {
        let device = device.to_lowercase();
        if !device.is_empty() && phrase.contains(&device) {
            phrase = phrase.replace(&device, "");
        }
    }

    let tv_keywords: Vec<String> = localization
        .shows
        .iter()
        .chain(&localization.season.keywords)
        .chain(&localization.episode.keywords)
        .cloned()
        .collect();

    let kind = if mentions(&phrase, &tv_keywords) {
        Some(LibraryKind::Shows)
    } else if mentions(&phrase, &localization.movies) {
        Some(LibraryKind::Movies)
    } else if mentions(&phrase, &localization.albums) {
        Some(LibraryKind::Albums)
    } else if mentions(&phrase, &localization.tracks) {
        Some(LibraryKind::Tracks)
    } else {
        None
    };

    debug!("📂 Library for '{}': {:?}", phrase.trim(), kind);
    kind
}
