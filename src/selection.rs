//! Selection Options
//!
//! The parsed intent of one command: which title, which library, which
//! season/episode/track and which narrowing flags. Built once per command
//! and handed to the resolver.

use crate::i18n::Localization;
use crate::library::LibraryKind;
use serde::{Deserialize, Serialize};

/// What a command asked for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub track: Option<u32>,
    pub ondeck: bool,
    pub unwatched: bool,
    pub latest: bool,
    /// Library named by category keywords in the command
    pub library: Option<LibraryKind>,
    /// Media phrase left after every keyword was removed
    pub media: Option<String>,
}

/// First letter upper case, the rest lower case
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Spoken message for a selection that resolved to nothing,
/// e.g. "Latest friends season 2 not found."
pub fn media_error(selection: &Selection, localization: &Localization) -> String {
    let mut parts: Vec<String> = Vec::new();

    let flags = [
        (selection.latest, &localization.latest),
        (selection.unwatched, &localization.unwatched),
        (selection.ondeck, &localization.ondeck),
    ];
    for (set, item) in flags {
        if set && !item.primary().is_empty() {
            parts.push(item.primary().to_string());
        }
    }

    if let Some(media) = selection.media.as_deref().filter(|m| !m.is_empty()) {
        parts.push(capitalize(media));
    }
    if let Some(season) = selection.season {
        parts.push(format!("{} {}", localization.season.primary(), season));
    }
    if let Some(episode) = selection.episode {
        parts.push(format!("{} {}", localization.episode.primary(), episode));
    }
    parts.push(format!("{}.", localization.not_found));

    capitalize(&parts.join(" "))
}
