//! Playlist reconciliation pipeline
//!
//! - `prompt_compiler`: brief + corpus → prompt
//! - `response_parser`: reply text → "Artist - Title" entries
//! - `track_matcher`: entries → catalog tracks
//! - `playlist_orchestrator`: runs the whole pipeline against the catalog

pub mod playlist_orchestrator;
pub mod prompt_compiler;
pub mod response_parser;
pub mod track_matcher;

pub use playlist_orchestrator::{PipelineError, PlaylistOrchestrator};
pub use prompt_compiler::{compile_prompt, SetSection};
pub use response_parser::{parse_line, parse_response};
pub use track_matcher::{match_entries, MatchOutcome, MatchTier, TrackMatcher};
