//! Set brief: the request a DJ fills in, and its validated form

use crate::services::prompt_compiler::compile_prompt;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format accepted for the set date
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Brief validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BriefError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Playlist assembly request as received from a caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyRequest {
    #[serde(default)]
    pub venue: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub style: Option<String>,

    /// Catalog playlist to use as corpus; the default playlist when absent
    #[serde(default)]
    pub source_corpus_id: Option<String>,

    /// Create and populate a catalog playlist (false = text only)
    #[serde(default = "default_create_playlist")]
    pub create_playlist: bool,
}

fn default_create_playlist() -> bool {
    true
}

impl AssemblyRequest {
    /// Validate required fields and the date
    pub fn validate(&self) -> Result<SetBrief, BriefError> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let venue = present(&self.venue);
        let date = present(&self.date);
        let style = present(&self.style);

        let missing: Vec<&'static str> = [("venue", &venue), ("date", &date), ("style", &style)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();

        match (venue, date, style) {
            (Some(venue), Some(date), Some(style)) => {
                NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|_| BriefError::InvalidDate(date.clone()))?;
                Ok(SetBrief { venue, date, style })
            }
            _ => Err(BriefError::MissingFields(missing)),
        }
    }

    /// Explicit corpus playlist ID, ignoring blank values
    pub fn source_corpus_id(&self) -> Option<&str> {
        self.source_corpus_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Validated brief
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetBrief {
    pub venue: String,
    pub date: String,
    pub style: String,
}

impl SetBrief {
    /// Name of the playlist created for this brief
    pub fn playlist_name(&self) -> String {
        format!("{} - {} ({})", self.venue, self.date, self.style)
    }
}

/// Everything the prompt is compiled from, fixed once per run
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub venue: String,
    pub date: String,
    pub style: String,
    pub song_corpus: Vec<String>,
}

impl GenerationRequest {
    pub fn new(brief: &SetBrief, song_corpus: Vec<String>) -> Self {
        Self {
            venue: brief.venue.clone(),
            date: brief.date.clone(),
            style: brief.style.clone(),
            song_corpus,
        }
    }

    pub fn prompt(&self) -> String {
        compile_prompt(&self.venue, &self.date, &self.style, &self.song_corpus)
    }
}
