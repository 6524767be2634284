//! Plex Assistant Library
//!
//! Understands spoken media commands ("play the latest episode of Friends on
//! the Living Room TV") and resolves them to a library item and a playback
//! device.

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod i18n;
pub mod library;
pub mod media;
pub mod processor;
pub mod providers;
pub mod resolver;
pub mod selection;
pub mod utils;
