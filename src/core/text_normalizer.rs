//! Text Normalization
//!
//! Turns spoken ordinals next to a qualifier keyword into numerals:
//! "third season of friends" becomes "3 season friends".

use crate::i18n::{KeywordItem, OrdinalTable};
use regex::Regex;
use tracing::debug;

/// Which side of the keyword the ordinal was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

/// Find `ordinal keyword` (preferred) or `keyword ordinal` in the command.
/// Returns the matched span and its rewrite with the ordinal replaced.
fn ordinal_span(command: &str, ordinal: &str, numeral: &str, word: &str) -> Option<(String, String)> {
    let ord = regex::escape(ordinal);
    let kw = regex::escape(word);

    let attempts = [
        (Side::Before, format!(r"({})(\s*)({})", ord, kw)),
        (Side::After, format!(r"({})(\s*)({})", kw, ord)),
    ];

    for (side, pattern) in attempts {
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(command) {
            let span = caps.get(0)?.as_str().to_string();
            let gap = caps.get(2).map_or("", |m| m.as_str());
            let replacement = match side {
                Side::Before => format!("{}{}{}", numeral, gap, &caps[3]),
                Side::After => format!("{}{}{}", &caps[1], gap, numeral),
            };
            return Some((span, replacement));
        }
    }
    None
}

/// Rewrite ordinals adjacent to any of the item's keywords into numerals,
/// dropping the ordinal table's filler words around the rewritten span.
pub fn convert_ordinals(command: &str, item: &KeywordItem, ordinals: &OrdinalTable) -> String {
    let mut command = command.to_string();

    for word in item.keywords.iter().filter(|w| !w.is_empty()) {
        for (ordinal, numeral) in ordinals.ordinals() {
            if !command.contains(ordinal) {
                continue;
            }
            let Some((span, replacement)) = ordinal_span(&command, ordinal, numeral, word) else {
                continue;
            };

            debug!("🔢 Ordinal '{}' -> '{}'", span, replacement);
            command = command.replace(&span, &replacement);

            for pre in &ordinals.pre {
                let with_filler = format!("{} {}", pre, replacement);
                if command.contains(&with_filler) {
                    command = command.replace(&with_filler, &replacement);
                }
            }
            for post in &ordinals.post {
                let with_filler = format!("{} {}", replacement, post);
                if command.contains(&with_filler) {
                    command = command.replace(&with_filler, &replacement);
                }
            }
        }
    }

    command.trim().to_string()
}
