//! Prompt compiler
//!
//! Turns a set brief (venue, date, style) and the song corpus into the single
//! prompt sent to the generation backend. The output is a pure function of the
//! inputs: no clock, no randomness, so identical briefs give byte-identical
//! prompts.
//!
//! Layout, in order:
//! 1. Persona preamble
//! 2. Task statement (venue, date, style)
//! 3. Output grammar: WARMUP / PEAK / COOLDOWN with song count bounds
//! 4. Set-building heuristics
//! 5. Available songs, one per line
//! 6. Hard constraints

use djset_common::ENTRY_SEPARATOR;

/// Example song in the output grammar; the parser drops it if echoed
pub const PLACEHOLDER_ARTIST: &str = "Artist";
pub const PLACEHOLDER_TITLE: &str = "Title";

/// Placeholder line rendered when the corpus is empty
pub const EMPTY_CORPUS_LINE: &str = "(no catalog songs provided)";

/// Section of a DJ set, in playing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetSection {
    Warmup,
    Peak,
    Cooldown,
}

impl SetSection {
    pub const ALL: [SetSection; 3] = [SetSection::Warmup, SetSection::Peak, SetSection::Cooldown];

    /// Header line the model must emit before the section's songs
    ///
    /// Headers carry no hyphen so an echoed header never parses as a song.
    pub fn header(&self) -> &'static str {
        match self {
            SetSection::Warmup => "WARMUP:",
            SetSection::Peak => "PEAK:",
            SetSection::Cooldown => "COOLDOWN:",
        }
    }

    /// Inclusive (min, max) song count
    pub fn song_bounds(&self) -> (usize, usize) {
        match self {
            SetSection::Warmup => (8, 12),
            SetSection::Peak => (15, 20),
            SetSection::Cooldown => (5, 8),
        }
    }

    fn purpose(&self) -> &'static str {
        match self {
            SetSection::Warmup => "relaxed, inviting songs while the room fills up",
            SetSection::Peak => "the highest energy, most recognizable songs for a full dance floor",
            SetSection::Cooldown => "songs that bring the energy down gently towards the close",
        }
    }
}

const PERSONA: &str = "You are an experienced club DJ and music curator. You build live dance \
sets that read the room, respect the venue and keep people dancing from the first song to the last.";

const HEURISTICS: [&str; 6] = [
    "Start the warmup below peak energy and raise it gradually; avoid sudden jumps.",
    "Keep tempo and feel changes between consecutive songs small so transitions stay smooth.",
    "Save the best known, most danceable songs for the peak and sustain that energy through it.",
    "Bring the cooldown down step by step and close with a memorable final song.",
    "Do not play the same artist twice in a row and never repeat a song.",
    "Let the venue, the date and the requested style guide every choice.",
];

const CONSTRAINTS: [&str; 4] = [
    "Use ONLY songs from the AVAILABLE SONGS list. Copy artist and title exactly as written there.",
    "Output only the three sections in the format above. No introduction, commentary, explanations or closing remarks.",
    "Every song line holds only the artist and the title as shown in the format. No BPM, key, duration, album, year or notes.",
    "Respect the song count range of every section.",
];

/// Compile the generation prompt
///
/// `song_corpus` holds "Artist - Title" lines; it is only read. An empty
/// corpus is accepted and rendered as a placeholder line.
pub fn compile_prompt(venue: &str, date: &str, style: &str, song_corpus: &[String]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(song_corpus.len() + 40);

    lines.push(PERSONA.to_string());
    lines.push(String::new());

    lines.push("TASK:".to_string());
    lines.push(format!(
        "Build a DJ set for the venue \"{}\" on {}. Musical style: {}.",
        venue, date, style
    ));
    lines.push(String::new());

    lines.push("OUTPUT FORMAT (follow exactly):".to_string());
    for section in SetSection::ALL {
        let (min, max) = section.song_bounds();
        lines.push(section.header().to_string());
        for ordinal in 1..=2 {
            lines.push(format!(
                "{}. {}{}{}",
                ordinal, PLACEHOLDER_ARTIST, ENTRY_SEPARATOR, PLACEHOLDER_TITLE
            ));
        }
        lines.push(format!(
            "(between {} and {} songs: {})",
            min,
            max,
            section.purpose()
        ));
        lines.push(String::new());
    }

    lines.push("GUIDELINES:".to_string());
    lines.extend(HEURISTICS.iter().map(|h| format!("* {}", h)));
    lines.push(String::new());

    lines.push(format!("AVAILABLE SONGS ({}):", song_corpus.len()));
    if song_corpus.is_empty() {
        lines.push(EMPTY_CORPUS_LINE.to_string());
    } else {
        lines.extend(song_corpus.iter().cloned());
    }
    lines.push(String::new());

    lines.push("RULES:".to_string());
    lines.extend(CONSTRAINTS.iter().map(|c| format!("* {}", c)));

    lines.join("\n")
}
