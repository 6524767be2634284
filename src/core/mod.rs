//! Core processing modules
//!
//! The text stages of command interpretation: keyword handling, ordinal
//! normalization, qualifier extraction, library classification and the
//! media/device split.

pub mod classifier;
pub mod keywords;
pub mod qualifier;
pub mod rewrite;
pub mod splitter;
pub mod text_normalizer;

pub use classifier::get_library;
pub use keywords::{
    collapse_whitespace, contains_any, remove_category_words, remove_keywords, strip_leading_phrase,
};
pub use qualifier::{get_command_num, CommandNumber};
pub use splitter::{get_media_and_device, MediaAndDevice};
pub use text_normalizer::convert_ordinals;
