//! # DJ Set Curator Common Library
//!
//! Shared code for the DJ set curator service:
//! - Error types
//! - TOML configuration file model and loading
//! - Song and track types exchanged between the generator, parser and matcher

pub mod config;
pub mod error;
pub mod song;

pub use error::{Error, Result};
pub use song::{CandidateTrack, SongEntry, ENTRY_SEPARATOR};
