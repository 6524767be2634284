//! Internationalization (i18n) Support
//!
//! Keyword vocabularies used to understand spoken commands. English is built
//! in; other languages are loaded from `<lang>.json` bundles.

use crate::error::{AssistError, AssistResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Trigger phrases for one qualifier, plus the filler words that may sit
/// directly before or after them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordItem {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub pre: Vec<String>,
    #[serde(default)]
    pub post: Vec<String>,
}

impl KeywordItem {
    pub fn new(keywords: &[&str], pre: &[&str], post: &[&str]) -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            keywords: owned(keywords),
            pre: owned(pre),
            post: owned(post),
        }
    }

    /// First keyword, used when speaking about the qualifier
    pub fn primary(&self) -> &str {
        self.keywords.first().map(String::as_str).unwrap_or("")
    }
}

/// Spelled-out ordinals and their numerals.
///
/// In JSON this is one object: `pre` and `post` hold filler words, every
/// other key is an ordinal word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdinalTable {
    #[serde(default)]
    pub pre: Vec<String>,
    #[serde(default)]
    pub post: Vec<String>,
    #[serde(flatten)]
    words: BTreeMap<String, String>,
}

impl OrdinalTable {
    pub fn new(words: &[(&str, &str)], pre: &[&str], post: &[&str]) -> Self {
        Self {
            pre: pre.iter().map(|w| w.to_string()).collect(),
            post: post.iter().map(|w| w.to_string()).collect(),
            words: words
                .iter()
                .map(|(w, n)| (w.to_string(), n.to_string()))
                .collect(),
        }
    }

    /// Ordinal words paired with numerals, longest word first so compound
    /// ordinals win over their suffixes.
    pub fn ordinals(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .words
            .iter()
            .map(|(w, n)| (w.as_str(), n.as_str()))
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
        pairs
    }
}

/// One language's command vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    /// Phrases that open a play request ("play", "watch")
    #[serde(default)]
    pub play_start: Vec<String>,
    pub season: KeywordItem,
    pub episode: KeywordItem,
    pub track: KeywordItem,
    pub latest: KeywordItem,
    pub unwatched: KeywordItem,
    pub ondeck: KeywordItem,
    pub separator: KeywordItem,
    pub movies: Vec<String>,
    pub shows: Vec<String>,
    pub albums: Vec<String>,
    pub tracks: Vec<String>,
    pub ordinals: OrdinalTable,
    pub not_found: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self::english()
    }
}

impl Localization {
    /// Built-in English vocabulary
    pub fn english() -> Self {
        let qualifier_post = ["number", "of"];
        Self {
            play_start: vec!["play".into(), "watch".into(), "listen to".into()],
            season: KeywordItem::new(&["season"], &["the"], &qualifier_post),
            episode: KeywordItem::new(&["episode"], &["the"], &qualifier_post),
            track: KeywordItem::new(&["track", "chapter"], &["the"], &qualifier_post),
            latest: KeywordItem::new(
                &["latest", "recent", "newest"],
                &["the"],
                &["episode of", "episode", "of"],
            ),
            unwatched: KeywordItem::new(
                &["unwatched"],
                &["the", "an"],
                &["episodes of", "episode of", "episodes", "episode", "of"],
            ),
            ondeck: KeywordItem::new(&["on deck", "ondeck"], &["from", "the"], &["of", "for"]),
            separator: KeywordItem::new(&["on"], &[], &["the"]),
            movies: vec!["movie".into(), "film".into()],
            shows: vec!["show".into(), "series".into(), "tv".into()],
            albums: vec!["album".into()],
            tracks: vec!["song".into()],
            ordinals: OrdinalTable::new(
                &[
                    ("first", "1"),
                    ("second", "2"),
                    ("third", "3"),
                    ("fourth", "4"),
                    ("fifth", "5"),
                    ("sixth", "6"),
                    ("seventh", "7"),
                    ("eighth", "8"),
                    ("ninth", "9"),
                    ("tenth", "10"),
                    ("eleventh", "11"),
                    ("twelfth", "12"),
                    ("thirteenth", "13"),
                    ("fourteenth", "14"),
                    ("fifteenth", "15"),
                    ("sixteenth", "16"),
                    ("seventeenth", "17"),
                    ("eighteenth", "18"),
                    ("nineteenth", "19"),
                    ("twentieth", "20"),
                ],
                &["the"],
                &["of"],
            ),
            not_found: "not found".into(),
        }
    }

    /// Read a bundle from a JSON file
    pub fn from_file(path: &Path) -> AssistResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let bundle: Self = serde_json::from_str(&content)
            .map_err(|e| AssistError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(bundle)
    }

    /// Load the bundle for `lang`, falling back to English.
    pub fn load(lang: &str, locale_dir: Option<&Path>) -> Self {
        if lang == "en" && locale_dir.is_none() {
            return Self::english();
        }

        let locale_dirs = [
            locale_dir.map(Path::to_path_buf),
            dirs::data_local_dir().map(|p| p.join("plexassist/locale")),
            Some(PathBuf::from("locale")),
        ];

        for dir in locale_dirs.iter().flatten() {
            let path = dir.join(format!("{}.json", lang));
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(bundle) => {
                    info!("🌐 Loaded '{}' vocabulary from {}", lang, path.display());
                    return bundle;
                }
                Err(e) => warn!("⚠️ Ignoring unreadable vocabulary: {}", e),
            }
        }

        debug!("No vocabulary found for '{}', using English", lang);
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_longest_first() {
        let table = OrdinalTable::new(
            &[("first", "1"), ("twenty first", "21"), ("third", "3")],
            &[],
            &[],
        );
        let words: Vec<&str> = table.ordinals().iter().map(|(w, _)| *w).collect();
        assert_eq!(words, vec!["twenty first", "first", "third"]);
        assert!(table.ordinals().contains(&("third", "3")));
    }

    #[test]
    fn test_ordinal_json_reserved_keys() {
        let json = r#"{"first": "1", "second": "2", "pre": ["the"], "post": ["of"]}"#;
        let table: OrdinalTable = serde_json::from_str(json).expect("valid ordinal json");
        assert_eq!(table.pre, vec!["the"]);
        assert_eq!(table.post, vec!["of"]);
        assert_eq!(table.ordinals().len(), 2);
        assert!(table.ordinals().iter().all(|(w, _)| *w != "pre"));
    }

    #[test]
    fn test_load_from_locale_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut bundle = Localization::english();
        bundle.not_found = "introuvable".into();
        let json = serde_json::to_string(&bundle).expect("serialize bundle");
        std::fs::write(dir.path().join("fr.json"), json).expect("write bundle");

        let loaded = Localization::load("fr", Some(dir.path()));
        assert_eq!(loaded.not_found, "introuvable");
        assert_eq!(loaded.ordinals, bundle.ordinals);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = Localization::load("xx", Some(dir.path()));
        assert_eq!(loaded, Localization::english());
    }

    #[test]
    fn test_primary_keyword() {
        let loc = Localization::english();
        assert_eq!(loc.season.primary(), "season");
        assert_eq!(KeywordItem::default().primary(), "");
    }
}
