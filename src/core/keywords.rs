//! Keyword detection and removal
//!
//! Flags such as "latest" or "on deck" are detected by plain substring
//! search and later cut out of the command together with their filler words.

use crate::i18n::KeywordItem;

/// True if any of the item's keywords occurs in the command
pub fn contains_any(item: &KeywordItem, command: &str) -> bool {
    item.keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && command.contains(keyword.as_str()))
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove an item's keywords from the command.
///
/// For every keyword, `pre keyword post` trigrams go first, then `pre keyword`
/// and `keyword post` bigrams, then the bare keyword. Matches are whole words.
/// Every removed span is replaced by `replace` (or nothing when empty).
pub fn remove_keywords(item: &KeywordItem, command: &str, replace: &str) -> String {
    let replacement = if replace.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", replace)
    };
    let mut text = format!(" {} ", command);

    for keyword in item.keywords.iter().filter(|k| !k.is_empty()) {
        for pre in &item.pre {
            for post in &item.post {
                text = text.replace(&format!(" {} {} {} ", pre, keyword, post), &replacement);
            }
        }
        for pre in &item.pre {
            text = text.replace(&format!(" {} {} ", pre, keyword), &replacement);
        }
        for post in &item.post {
            text = text.replace(&format!(" {} {} ", keyword, post), &replacement);
        }
        text = text.replace(&format!(" {} ", keyword), &replacement);
    }

    collapse_whitespace(&text)
}

/// Remove category words ("movie", "tv") and their plurals from a phrase
pub fn remove_category_words(words: &[String], command: &str) -> String {
    let is_category = |token: &str| {
        words.iter().filter(|w| !w.is_empty()).any(|w| {
            let w = w.as_str();
            token == w
                || token.strip_suffix('s') == Some(w)
                || token.strip_suffix("es") == Some(w)
        })
    };
    command
        .split_whitespace()
        .filter(|&token| !is_category(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop a leading phrase such as "play" or "listen to"
pub fn strip_leading_phrase(command: &str, phrases: &[String]) -> String {
    for phrase in phrases.iter().filter(|p| !p.is_empty()) {
        if command == phrase {
            return String::new();
        }
        if let Some(rest) = command.strip_prefix(&format!("{} ", phrase)) {
            return rest.trim().to_string();
        }
    }
    command.to_string()
}
