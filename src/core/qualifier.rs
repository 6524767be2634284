//! Qualifier extraction
//!
//! Pulls season, episode and track numbers out of a command and removes
//! the qualifier phrase from it.

use super::keywords::collapse_whitespace;
use super::rewrite::{self, reorder_rules};
use super::text_normalizer::convert_ordinals;
use crate::i18n::{KeywordItem, OrdinalTable};
use regex::Regex;
use tracing::debug;

/// Number found for a qualifier and the command without it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNumber {
    pub number: Option<u32>,
    pub command: String,
}

/// Find the number attached to the item's keyword, e.g. "season 3".
///
/// A command without any of the keywords comes back untouched with no number.
pub fn get_command_num(command: &str, item: &KeywordItem, ordinals: &OrdinalTable) -> CommandNumber {
    let converted = convert_ordinals(command, item, ordinals);

    let Some(phrase) = item
        .keywords
        .iter()
        .find(|k| !k.is_empty() && converted.contains(k.as_str()))
    else {
        return CommandNumber {
            number: None,
            command: command.to_string(),
        };
    };

    let mut text = rewrite::apply(&converted, &reorder_rules(phrase, item));

    let kw = regex::escape(phrase);
    let pattern = format!(r"([0-9]+)\s*({kw}|^)|({kw}|^)\s*([0-9]+)");
    let found = Regex::new(&pattern).ok().and_then(|re| {
        re.captures(&text).and_then(|caps| {
            let span = caps.get(0)?.range();
            let digits = caps.get(1).or_else(|| caps.get(4))?.as_str().to_string();
            Some((span, digits))
        })
    });

    let mut number = None;
    if let Some((span, digits)) = found {
        number = digits.parse::<u32>().ok();
        text.replace_range(span, "");
        debug!("🔎 {} {:?} found", phrase, number);
    }

    CommandNumber {
        number,
        command: collapse_whitespace(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localization;

    #[test]
    fn test_keyword_then_number() {
        let loc = Localization::english();
        let result = get_command_num("season 3 stranger things", &loc.season, &loc.ordinals);
        assert_eq!(result.number, Some(3));
        assert_eq!(result.command, "stranger things");
    }

    #[test]
    fn test_spoken_ordinal() {
        let loc = Localization::english();
        let result = get_command_num("the third season of friends", &loc.season, &loc.ordinals);
        assert_eq!(result.number, Some(3));
        assert_eq!(result.command, "friends");
    }

    #[test]
    fn test_number_at_end() {
        let loc = Localization::english();
        let result = get_command_num("the office season number 2", &loc.season, &loc.ordinals);
        assert_eq!(result.number, Some(2));
        assert_eq!(result.command, "the office");
    }

    #[test]
    fn test_filler_reordered() {
        let loc = Localization::english();
        let result = get_command_num("friends episode of 12", &loc.episode, &loc.ordinals);
        assert_eq!(result.number, Some(12));
        assert_eq!(result.command, "friends");
    }

    #[test]
    fn test_missing_keyword_is_untouched() {
        let loc = Localization::english();
        let result = get_command_num("  the matrix 2 ", &loc.season, &loc.ordinals);
        assert_eq!(result.number, None);
        assert_eq!(result.command, "  the matrix 2 ");
    }

    #[test]
    fn test_keyword_without_number() {
        let loc = Localization::english();
        let result = get_command_num("latest episode of friends", &loc.episode, &loc.ordinals);
        assert_eq!(result.number, None);
        assert_eq!(result.command, "latest episode of friends");
    }

    #[test]
    fn test_season_and_episode_in_sequence() {
        let loc = Localization::english();
        let season = get_command_num("friends season 2 episode 5", &loc.season, &loc.ordinals);
        assert_eq!(season.number, Some(2));
        let episode = get_command_num(&season.command, &loc.episode, &loc.ordinals);
        assert_eq!(episode.number, Some(5));
        assert_eq!(episode.command, "friends");
    }
}
