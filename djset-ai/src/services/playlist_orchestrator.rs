//! Playlist assembly orchestrator
//!
//! Runs one brief through the whole pipeline against the injected catalog:
//! fetch corpus → compile prompt → generate → parse → match → create and
//! populate the destination playlist. Side effects happen strictly in that
//! order and a partially populated playlist is left as is on failure.

use crate::backends::{GenerationBackend, GenerationError};
use crate::catalog::{Catalog, CatalogError};
use crate::models::{
    AssemblyReport, AssemblyRequest, AssemblyResult, AssemblyRun, AssemblyState, BriefError,
    GenerationRequest, SetBrief,
};
use crate::services::{match_entries, parse_response};
use djset_common::CandidateTrack;
use std::sync::Arc;
use thiserror::Error;

/// Pipeline failures, one per caller-visible outcome
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[from] BriefError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation backend error: {0}")]
    GenerationBackend(GenerationError),

    #[error("Corpus playlist not found: {0}")]
    CorpusNotFound(String),

    /// The catalog user has no usable token
    #[error("Catalog authentication required")]
    AuthenticationRequired,

    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Configuration(msg) => PipelineError::Configuration(msg),
            other => PipelineError::GenerationBackend(other),
        }
    }
}

impl From<CatalogError> for PipelineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotAuthenticated => PipelineError::AuthenticationRequired,
            CatalogError::Configuration(msg) => PipelineError::Configuration(msg),
            other => PipelineError::Catalog(other),
        }
    }
}

/// What a successful pipeline pass produced, before it is wrapped in a report
struct PipelineOutput {
    brief: SetBrief,
    result: AssemblyResult,
    new_playlist_id: Option<String>,
}

/// Coordinates the generation backend and the catalog for one brief at a time
///
/// Holds no per-run state; concurrent `assemble` calls are independent.
pub struct PlaylistOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    catalog: Arc<dyn Catalog>,
    default_corpus_name: String,
}

impl PlaylistOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        catalog: Arc<dyn Catalog>,
        default_corpus_name: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            catalog,
            default_corpus_name: default_corpus_name.into(),
        }
    }

    /// Name of the active generation backend
    pub fn provider(&self) -> &'static str {
        self.backend.name()
    }

    pub fn default_corpus_name(&self) -> &str {
        &self.default_corpus_name
    }

    /// Run the pipeline for `request`
    ///
    /// The brief is validated before any backend or catalog call. On failure
    /// the run is closed with a FAILED transition and the error returned.
    pub async fn assemble(&self, request: &AssemblyRequest) -> Result<AssemblyReport, PipelineError> {
        let mut run = AssemblyRun::new();

        match self.run_pipeline(&mut run, request).await {
            Ok(output) => Ok(AssemblyReport {
                run_id: run.run_id,
                provider: self.provider().to_string(),
                brief: output.brief,
                result: output.result,
                new_playlist_id: output.new_playlist_id,
                transitions: run.transitions,
            }),
            Err(e) => {
                run.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        run: &mut AssemblyRun,
        request: &AssemblyRequest,
    ) -> Result<PipelineOutput, PipelineError> {
        let brief = request.validate()?;

        run.transition_to(AssemblyState::FetchingCorpus);
        let corpus = self.fetch_corpus(request.source_corpus_id()).await?;

        run.transition_to(AssemblyState::Prompting);
        let generation = GenerationRequest::new(
            &brief,
            corpus.iter().map(CandidateTrack::corpus_line).collect(),
        );
        let prompt = generation.prompt();

        run.transition_to(AssemblyState::Generating);
        let raw_text = self.backend.generate(&prompt).await?;

        run.transition_to(AssemblyState::Parsing);
        let entries = parse_response(&raw_text);

        run.transition_to(AssemblyState::Matching);
        let outcomes = match_entries(&entries, &corpus);
        let result = AssemblyResult::from_outcomes(raw_text, outcomes);

        tracing::info!(
            run_id = %run.run_id,
            total = result.total_parsed_songs,
            matched = result.matched_uris.len(),
            unmatched = result.unmatched_entries.len(),
            "Reconciled generated set against corpus"
        );

        let mut new_playlist_id = None;
        if request.create_playlist && !corpus.is_empty() {
            run.transition_to(AssemblyState::CreatingPlaylist);
            let description = format!(
                "DJ set for {} on {}, generated with {}",
                brief.venue,
                brief.date,
                self.provider()
            );
            let playlist_id = self
                .catalog
                .create_playlist(&brief.playlist_name(), &description)
                .await?;

            run.transition_to(AssemblyState::PopulatingPlaylist);
            if !result.matched_uris.is_empty() {
                self.catalog
                    .add_tracks(&playlist_id, &result.matched_uris)
                    .await?;
            }
            new_playlist_id = Some(playlist_id);
        } else {
            tracing::debug!(
                run_id = %run.run_id,
                create_playlist = request.create_playlist,
                corpus_size = corpus.len(),
                "Skipping playlist creation"
            );
        }

        run.transition_to(AssemblyState::Done);

        Ok(PipelineOutput {
            brief,
            result,
            new_playlist_id,
        })
    }

    /// Explicit playlist ID wins; otherwise resolve the default corpus by name
    async fn fetch_corpus(&self, explicit_id: Option<&str>) -> Result<Vec<CandidateTrack>, PipelineError> {
        let playlist_id = match explicit_id {
            Some(id) => id.to_string(),
            None => self
                .catalog
                .find_playlist_by_name(&self.default_corpus_name)
                .await?
                .ok_or_else(|| PipelineError::CorpusNotFound(self.default_corpus_name.clone()))?,
        };

        self.catalog
            .playlist_tracks(&playlist_id)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(_) => PipelineError::CorpusNotFound(playlist_id.clone()),
                other => other.into(),
            })
    }
}
