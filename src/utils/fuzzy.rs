//! Fuzzy matching utilities for search
//!
//! Scores spoken phrases against library titles and device names.
//! Scores are integers in `0..=100`, higher is better.

use std::collections::BTreeSet;
use rapidfuzz::distance::indel;

/// Result of a fuzzy match with the matched value and score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub value: String,
    pub score: u8,
}

impl FuzzyMatch {
    /// Zero-confidence result returned when there is nothing to match against
    pub fn none() -> Self {
        Self {
            value: String::new(),
            score: 0,
        }
    }
}

/// Scoring function used by [`fuzzy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scorer {
    /// Plain ratio of the processed strings. Good for short names.
    #[default]
    Quick,
    /// Best of ratio, partial and token based ratios. Tolerates extra words.
    Weighted,
}

impl Scorer {
    pub fn score(&self, a: &str, b: &str) -> u8 {
        match self {
            Scorer::Quick => quick_ratio(a, b),
            Scorer::Weighted => weighted_ratio(a, b),
        }
    }
}

/// Return the highest scoring candidate.
///
/// An empty candidate list yields `("", 0)`. Ties keep the earliest candidate.
pub fn fuzzy<S: AsRef<str>>(query: &str, candidates: &[S], scorer: Scorer) -> FuzzyMatch {
    let mut best: Option<FuzzyMatch> = None;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = scorer.score(query, candidate);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch {
                value: candidate.to_string(),
                score,
            });
        }
    }

    best.unwrap_or_else(FuzzyMatch::none)
}

/// Lowercase, turn anything that isn't a letter or digit into a space, trim.
pub fn full_process(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Indel similarity, `2 * matches / total length`
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Ratio of the processed strings
pub fn quick_ratio(a: &str, b: &str) -> u8 {
    let p1 = full_process(a);
    let p2 = full_process(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }
    to_score(ratio(&p1, &p2))
}

/// Best ratio of the shorter string against every equally long window of the longer
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = longer.chars().collect();
    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let r = ratio(shorter, &window);
        if r > best {
            best = r;
            if best >= 99.5 {
                return 100.0;
            }
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let s1 = sorted_tokens(a);
    let s2 = sorted_tokens(b);
    if partial {
        partial_ratio(&s1, &s2)
    } else {
        ratio(&s1, &s2)
    }
}

fn token_set_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let t1: BTreeSet<&str> = a.split_whitespace().collect();
    let t2: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = t1.intersection(&t2).copied().collect::<Vec<_>>().join(" ");
    let diff1 = t1.difference(&t2).copied().collect::<Vec<_>>().join(" ");
    let diff2 = t2.difference(&t1).copied().collect::<Vec<_>>().join(" ");

    let combined_1 = format!("{} {}", sect, diff1).trim().to_string();
    let combined_2 = format!("{} {}", sect, diff2).trim().to_string();

    let score = |x: &str, y: &str| {
        if partial {
            partial_ratio(x, y)
        } else {
            ratio(x, y)
        }
    };

    let mut pairs = vec![score(&combined_1, &combined_2)];
    if !sect.is_empty() {
        pairs.push(score(&sect, &combined_1));
        pairs.push(score(&sect, &combined_2));
    }
    pairs.into_iter().fold(0.0, f64::max)
}

/// Weighted combination of ratio, partial and token based scores
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = full_process(a);
    let p2 = full_process(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    const UNBASE_SCALE: f64 = 0.95;

    let base = ratio(&p1, &p2);
    let len1 = p1.chars().count() as f64;
    let len2 = p2.chars().count() as f64;
    let len_ratio = len1.max(len2) / len1.min(len2);

    if len_ratio < 1.5 {
        let tsor = token_sort_ratio(&p1, &p2, false) * UNBASE_SCALE;
        let tser = token_set_ratio(&p1, &p2, false) * UNBASE_SCALE;
        return to_score(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = partial_ratio(&p1, &p2) * partial_scale;
    let ptsor = token_sort_ratio(&p1, &p2, true) * UNBASE_SCALE * partial_scale;
    let ptser = token_set_ratio(&p1, &p2, true) * UNBASE_SCALE * partial_scale;

    to_score(base.max(partial).max(ptsor).max(ptser))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(fuzzy("anything", &empty, Scorer::Quick), FuzzyMatch::none());
        assert_eq!(fuzzy("", &empty, Scorer::Weighted), FuzzyMatch::none());
    }

    #[test]
    fn test_exact_match_scores_100() {
        let titles = ["Friends", "Frasier"];
        let best = fuzzy("friends", &titles, Scorer::Quick);
        assert_eq!(best.value, "Friends");
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_ties_keep_first() {
        let titles = ["Alien", "alien"];
        let best = fuzzy("ALIEN", &titles, Scorer::Quick);
        assert_eq!(best.value, "Alien");
    }

    #[test]
    fn test_punctuation_ignored() {
        assert_eq!(quick_ratio("Marvel's Daredevil", "marvel s daredevil"), 100);
        assert_eq!(quick_ratio("!!!", "abc"), 0);
    }

    #[test]
    fn test_weighted_prefers_contained_title() {
        let titles = ["The Office", "Stranger Things", "Parks and Recreation"];
        let best = fuzzy("stranger things please", &titles, Scorer::Weighted);
        assert_eq!(best.value, "Stranger Things");
        assert!(best.score >= 85);
    }

    #[test]
    fn test_weighted_handles_word_order() {
        assert!(weighted_ratio("things stranger", "Stranger Things") >= 95);
        assert!(quick_ratio("things stranger", "Stranger Things") < 90);
    }

    #[test]
    fn test_ratio_counts_matching_characters() {
        // 9 shared characters over 23 in total
        assert_eq!(quick_ratio("play inception", "Inception"), 78);
        assert_eq!(quick_ratio("abcd", "dcba"), 25);
    }

    #[test]
    fn test_partial_ratio_window() {
        assert_eq!(partial_ratio("abc", "xxabcxx"), 100.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }
}
