//! Filler word reordering
//!
//! Spoken qualifiers come in many shapes: "3 the season", "the season 3",
//! "season number 3", "3 season of". Each shape is a rule that rewrites the
//! three-token neighbourhood into the canonical `KEYWORD NUMBER` form so the
//! number can be read off afterwards.

use crate::i18n::KeywordItem;
use regex::Regex;

/// One token of a three-token neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Number,
    Filler,
    Keyword,
}

use Slot::{Filler, Keyword, Number};

const PRE_PRIMARY: [Slot; 3] = [Number, Filler, Keyword];
const PRE_FALLBACKS: [[Slot; 3]; 2] = [[Filler, Keyword, Number], [Keyword, Number, Filler]];
const POST_PRIMARY: [Slot; 3] = [Keyword, Filler, Number];
const POST_FALLBACKS: [[Slot; 3]; 2] = [[Number, Keyword, Filler], [Keyword, Number, Filler]];

/// A compiled pattern and the canonical text it is rewritten to
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    canonical: String,
}

impl RewriteRule {
    /// Build the rule matching `slots` (each followed by whitespace) and
    /// rewriting it to `keyword <number>`.
    pub fn from_slots(slots: [Slot; 3], keyword: &str, filler: &str) -> Option<Self> {
        let mut pattern = String::new();
        let mut number_group = 0;
        for (i, slot) in slots.iter().enumerate() {
            let token = match slot {
                Number => {
                    number_group = i + 1;
                    "[0-9]+".to_string()
                }
                Filler => regex::escape(filler),
                Keyword => regex::escape(keyword),
            };
            pattern.push_str(&format!(r"({}\s+)", token));
        }
        if number_group == 0 {
            return None;
        }

        let canonical = format!("{} ${{{}}}", keyword.replace('$', "$$"), number_group);
        Regex::new(&pattern)
            .ok()
            .map(|pattern| Self { pattern, canonical })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.canonical.as_str())
            .into_owned()
    }
}

/// Rules guarded by one filler word. The primary rule wins outright when it
/// matches; otherwise every fallback is applied in order.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub trigger: String,
    pub primary: RewriteRule,
    pub fallbacks: Vec<RewriteRule>,
}

impl RuleGroup {
    fn build(
        trigger: &str,
        keyword: &str,
        primary: [Slot; 3],
        fallbacks: &[[Slot; 3]],
    ) -> Option<Self> {
        Some(Self {
            trigger: trigger.to_string(),
            primary: RewriteRule::from_slots(primary, keyword, trigger)?,
            fallbacks: fallbacks
                .iter()
                .filter_map(|slots| RewriteRule::from_slots(*slots, keyword, trigger))
                .collect(),
        })
    }
}

/// The reorder table for one qualifier keyword: a group per `pre` filler,
/// then a group per `post` filler, in configuration order.
pub fn reorder_rules(keyword: &str, item: &KeywordItem) -> Vec<RuleGroup> {
    let pre = item
        .pre
        .iter()
        .filter_map(|filler| RuleGroup::build(filler, keyword, PRE_PRIMARY, &PRE_FALLBACKS));
    let post = item
        .post
        .iter()
        .filter_map(|filler| RuleGroup::build(filler, keyword, POST_PRIMARY, &POST_FALLBACKS));
    pre.chain(post).collect()
}

/// Run every group against the command in order
pub fn apply(command: &str, groups: &[RuleGroup]) -> String {
    // Every slot needs trailing whitespace, a trailing number included.
    let mut text = format!("{} ", command);

    for group in groups {
        if group.trigger.is_empty() || !text.contains(group.trigger.as_str()) {
            continue;
        }
        if group.primary.is_match(&text) {
            text = group.primary.apply(&text);
        } else {
            for rule in &group.fallbacks {
                text = rule.apply(&text);
            }
        }
    }

    text.trim().to_string()
}
