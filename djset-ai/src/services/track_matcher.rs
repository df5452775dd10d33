//! Track matcher
//!
//! Reconciles parsed "Artist - Title" entries with the candidate corpus.
//! Two tiers are tried in order and the first candidate in corpus order that
//! qualifies wins:
//!
//! 1. **Exact**: lower-cased name equals the title, and some candidate artist
//!    equals, contains, or is contained in the entry artist.
//! 2. **Lenient**: name and title contain one another (either way), and some
//!    candidate artist contains or is contained in the entry artist.
//!
//! There is no scoring; ties go to scan order. Short names can therefore
//! produce false positives in the lenient tier.

use djset_common::{CandidateTrack, SongEntry};

/// Result of reconciling one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Entry resolved to this catalog track
    Matched(CandidateTrack),
    /// No candidate qualified; carries the original entry string
    Unmatched(String),
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Tier that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Lenient,
}

/// Candidate with its strings lower-cased once up front
struct NormalizedCandidate<'a> {
    track: &'a CandidateTrack,
    name: String,
    artists: Vec<String>,
}

impl NormalizedCandidate<'_> {
    fn artist_overlaps(&self, artist: &str) -> bool {
        self.artists
            .iter()
            .any(|a| artist.contains(a.as_str()) || a.contains(artist))
    }

    fn is_exact_match(&self, artist: &str, title: &str) -> bool {
        // Equality is covered by the containment check
        self.name == title && self.artist_overlaps(artist)
    }

    fn is_lenient_match(&self, artist: &str, title: &str) -> bool {
        !self.name.is_empty()
            && (title.contains(self.name.as_str()) || self.name.contains(title))
            && self.artist_overlaps(artist)
    }
}

/// Matcher over one immutable candidate corpus
pub struct TrackMatcher<'a> {
    candidates: Vec<NormalizedCandidate<'a>>,
}

impl<'a> TrackMatcher<'a> {
    pub fn new(candidates: &'a [CandidateTrack]) -> Self {
        let candidates = candidates
            .iter()
            .map(|track| NormalizedCandidate {
                track,
                name: track.name.trim().to_lowercase(),
                artists: track
                    .artists
                    .iter()
                    .map(|a| a.trim().to_lowercase())
                    .filter(|a| !a.is_empty())
                    .collect(),
            })
            .collect();

        Self { candidates }
    }

    /// Find the track for one entry, reporting which tier hit
    pub fn find(&self, entry: &str) -> Option<(&'a CandidateTrack, MatchTier)> {
        let song = SongEntry::parse(entry)?;
        let artist = song.artist.to_lowercase();
        let title = song.title.to_lowercase();

        if let Some(c) = self.candidates.iter().find(|c| c.is_exact_match(&artist, &title)) {
            return Some((c.track, MatchTier::Exact));
        }

        self.candidates
            .iter()
            .find(|c| c.is_lenient_match(&artist, &title))
            .map(|c| (c.track, MatchTier::Lenient))
    }

    /// Reconcile one entry
    ///
    /// Entries that do not split into exactly two parts are unmatched without
    /// scanning.
    pub fn match_entry(&self, entry: &str) -> MatchOutcome {
        match self.find(entry) {
            Some((track, tier)) => {
                tracing::debug!(
                    entry = %entry,
                    track_id = %track.id,
                    tier = ?tier,
                    "Entry matched"
                );
                MatchOutcome::Matched(track.clone())
            }
            None => {
                tracing::debug!(entry = %entry, "Entry not found in corpus");
                MatchOutcome::Unmatched(entry.to_string())
            }
        }
    }
}

/// Reconcile every entry against `candidates`, one outcome per entry, in order
pub fn match_entries(entries: &[String], candidates: &[CandidateTrack]) -> Vec<MatchOutcome> {
    let matcher = TrackMatcher::new(candidates);
    entries.iter().map(|e| matcher.match_entry(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, name: &str, artists: &[&str]) -> CandidateTrack {
        CandidateTrack {
            id: id.to_string(),
            name: name.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            uri: format!("spotify:track:{}", id),
            album: "Album".to_string(),
            duration_ms: 200_000,
        }
    }

    fn corpus() -> Vec<CandidateTrack> {
        vec![
            track("1", "Oye Como Va", &["Tito Puente"]),
            track("2", "La Vida Es Un Carnaval", &["Celia Cruz"]),
        ]
    }

    #[test]
    fn test_exact_tier() {
        let corpus = corpus();
        let matcher = TrackMatcher::new(&corpus);

        let (found, tier) = matcher.find("Tito Puente - Oye Como Va").unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(tier, MatchTier::Exact);

        assert_eq!(
            matcher.match_entry("tito puente - OYE COMO VA"),
            MatchOutcome::Matched(corpus[0].clone())
        );
    }

    #[test]
    fn test_exact_tier_artist_containment() {
        let corpus = vec![track("1", "Oye Como Va", &["Santana"])];
        let matcher = TrackMatcher::new(&corpus);

        // Entry artist contains the candidate artist
        let (_, tier) = matcher.find("Carlos Santana - Oye Como Va").unwrap();
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_lenient_fallback() {
        let corpus = corpus();
        let matcher = TrackMatcher::new(&corpus);

        let (found, tier) = matcher.find("Puente - Oye Como Va (Live)").unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(tier, MatchTier::Lenient);
    }

    #[test]
    fn test_lenient_title_contained_in_name() {
        let corpus = vec![track("9", "Chan Chan (Remastered)", &["Buena Vista Social Club"])];
        let matcher = TrackMatcher::new(&corpus);

        let (_, tier) = matcher.find("Buena Vista Social Club - Chan Chan").unwrap();
        assert_eq!(tier, MatchTier::Lenient);
    }

    #[test]
    fn test_exact_tier_wins_over_earlier_lenient_candidate() {
        let corpus = vec![
            track("live", "Oye Como Va (Live)", &["Tito Puente"]),
            track("studio", "Oye Como Va", &["Tito Puente"]),
        ];
        let (found, tier) = TrackMatcher::new(&corpus)
            .find("Tito Puente - Oye Como Va")
            .unwrap();
        assert_eq!(found.id, "studio");
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_first_candidate_in_scan_order_wins() {
        let corpus = vec![
            track("a", "Quimbara", &["Celia Cruz"]),
            track("b", "Quimbara", &["Celia Cruz", "Johnny Pacheco"]),
        ];
        let (found, _) = TrackMatcher::new(&corpus).find("Celia Cruz - Quimbara").unwrap();
        assert_eq!(found.id, "a");
    }

    #[test]
    fn test_any_listed_artist_qualifies() {
        let corpus = vec![track("b", "Quimbara", &["Johnny Pacheco", "Celia Cruz"])];
        assert!(TrackMatcher::new(&corpus).find("Celia Cruz - Quimbara").is_some());
    }

    #[test]
    fn test_no_overlap_is_unmatched() {
        let outcome = TrackMatcher::new(&corpus()).match_entry("Los Van Van - Muevete");
        assert_eq!(outcome, MatchOutcome::Unmatched("Los Van Van - Muevete".to_string()));
    }

    #[test]
    fn test_title_match_needs_artist_overlap() {
        let outcome = TrackMatcher::new(&corpus()).match_entry("Santana - Oye Como Va");
        assert!(!outcome.is_matched());
    }

    #[test]
    fn test_malformed_entry_is_unmatched() {
        let matcher = TrackMatcher::new(&[]);
        assert_eq!(
            matcher.match_entry("Oye Como Va"),
            MatchOutcome::Unmatched("Oye Como Va".to_string())
        );

        let corpus = corpus();
        let matcher = TrackMatcher::new(&corpus);
        assert!(!matcher.match_entry("Tito Puente - Oye Como Va - Live").is_matched());
    }

    #[test]
    fn test_empty_corpus_all_unmatched() {
        let entries = vec!["A - B".to_string(), "C - D".to_string()];
        let outcomes = match_entries(&entries, &[]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.is_matched()));
    }

    #[test]
    fn test_outcomes_preserve_entry_order_and_count() {
        let entries = vec![
            "Celia Cruz - La Vida Es Un Carnaval".to_string(),
            "Nobody - Nothing".to_string(),
            "Tito Puente - Oye Como Va".to_string(),
            "malformed".to_string(),
        ];
        let outcomes = match_entries(&entries, &corpus());

        assert_eq!(outcomes.len(), entries.len());
        assert!(matches!(&outcomes[0], MatchOutcome::Matched(t) if t.id == "2"));
        assert!(matches!(&outcomes[1], MatchOutcome::Unmatched(e) if e == "Nobody - Nothing"));
        assert!(matches!(&outcomes[2], MatchOutcome::Matched(t) if t.id == "1"));
        assert!(matches!(&outcomes[3], MatchOutcome::Unmatched(e) if e == "malformed"));
    }

    #[test]
    fn test_matching_is_deterministic() {
        let entries = vec!["Puente - Oye".to_string(), "Cruz - Carnaval".to_string()];
        let corpus = corpus();
        assert_eq!(match_entries(&entries, &corpus), match_entries(&entries, &corpus));
    }
}
