//! Playlist assembly state machine and result types
//!
//! A run progresses through:
//! IDLE → FETCHING_CORPUS → PROMPTING → GENERATING → PARSING → MATCHING →
//! CREATING_PLAYLIST → POPULATING_PLAYLIST → DONE
//!
//! FAILED is reachable from any state. The two playlist states are skipped for
//! text-only runs and empty corpora.

use crate::models::SetBrief;
use crate::services::MatchOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Assembly run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssemblyState {
    Idle,
    FetchingCorpus,
    Prompting,
    Generating,
    Parsing,
    Matching,
    CreatingPlaylist,
    PopulatingPlaylist,
    Done,
    /// Terminal failure with the reason
    Failed(String),
}

impl AssemblyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssemblyState::Done | AssemblyState::Failed(_))
    }
}

/// Recorded state change
#[derive(Debug, Clone, Serialize)]
pub struct StateTransition {
    pub run_id: Uuid,
    pub from: AssemblyState,
    pub to: AssemblyState,
    pub at: DateTime<Utc>,
}

/// In-flight assembly run
#[derive(Debug, Clone)]
pub struct AssemblyRun {
    pub run_id: Uuid,
    pub state: AssemblyState,
    pub transitions: Vec<StateTransition>,
    pub started_at: DateTime<Utc>,
}

impl AssemblyRun {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: AssemblyState::Idle,
            transitions: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Move to `new_state`, recording and logging the transition
    pub fn transition_to(&mut self, new_state: AssemblyState) {
        let transition = StateTransition {
            run_id: self.run_id,
            from: self.state.clone(),
            to: new_state.clone(),
            at: Utc::now(),
        };

        match &new_state {
            AssemblyState::Failed(reason) => tracing::warn!(
                run_id = %self.run_id,
                from = ?transition.from,
                reason = %reason,
                "Playlist assembly failed"
            ),
            _ => tracing::info!(
                run_id = %self.run_id,
                from = ?transition.from,
                to = ?new_state,
                "Playlist assembly state change"
            ),
        }

        self.state = new_state;
        self.transitions.push(transition);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.transition_to(AssemblyState::Failed(reason.into()));
    }
}

impl Default for AssemblyRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one reconciliation pass
///
/// `matched_uris.len() + unmatched_entries.len() == total_parsed_songs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyResult {
    pub total_parsed_songs: usize,
    pub matched_uris: Vec<String>,
    pub unmatched_entries: Vec<String>,
    pub raw_generated_text: String,
}

impl AssemblyResult {
    pub fn from_outcomes(raw_generated_text: String, outcomes: Vec<MatchOutcome>) -> Self {
        let total_parsed_songs = outcomes.len();
        let mut matched_uris = Vec::new();
        let mut unmatched_entries = Vec::new();

        for outcome in outcomes {
            match outcome {
                MatchOutcome::Matched(track) => matched_uris.push(track.uri),
                MatchOutcome::Unmatched(entry) => unmatched_entries.push(entry),
            }
        }

        Self {
            total_parsed_songs,
            matched_uris,
            unmatched_entries,
            raw_generated_text,
        }
    }
}

/// What a finished run hands back to its caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyReport {
    pub run_id: Uuid,
    pub provider: String,
    pub brief: SetBrief,
    pub result: AssemblyResult,
    /// Catalog ID of the created playlist, when one was created
    pub new_playlist_id: Option<String>,
    pub transitions: Vec<StateTransition>,
}

impl AssemblyReport {
    pub fn final_state(&self) -> Option<&AssemblyState> {
        self.transitions.last().map(|t| &t.to)
    }

    /// States visited after IDLE, in order
    pub fn visited_states(&self) -> Vec<AssemblyState> {
        self.transitions.iter().map(|t| t.to.clone()).collect()
    }
}
