//! Utility modules

pub mod fuzzy;

pub use fuzzy::{full_process, fuzzy, quick_ratio, weighted_ratio, FuzzyMatch, Scorer};
