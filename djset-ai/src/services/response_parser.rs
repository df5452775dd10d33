//! Response parser
//!
//! Extracts "Artist - Title" entries from the backend's free-text reply.
//! Lines that do not look like a song (section headers, blank lines,
//! commentary) are dropped. Order is preserved; nothing is sorted or
//! deduplicated.
//!
//! The artist is matched non-greedily and the title greedily, so a title may
//! contain hyphens but a hyphenated artist name is split at its first hyphen.
//! The grammar's own `Artist - Title` example is not a song and is dropped.

use super::prompt_compiler::{PLACEHOLDER_ARTIST, PLACEHOLDER_TITLE};
use djset_common::SongEntry;
use once_cell::sync::Lazy;
use regex::Regex;

/// Optional bullet, optional ordinal (`1.` / `2)`), then `artist - title`
static SONG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•]\s+)?(?:\d+\s*[.)]\s*)?(.+?)\s*-\s*(.+)$")
        .expect("song line pattern is valid")
});

/// Parse one line into a song entry
pub fn parse_line(line: &str) -> Option<SongEntry> {
    let captures = SONG_LINE.captures(line.trim())?;
    let song = SongEntry::new(&captures[1], &captures[2]);

    if song.artist.is_empty() || song.title.is_empty() {
        return None;
    }
    if song == SongEntry::new(PLACEHOLDER_ARTIST, PLACEHOLDER_TITLE) {
        return None;
    }
    Some(song)
}

/// Parse a reply into normalized `"artist - title"` entries
///
/// Never fails; a reply with no song lines yields an empty list.
pub fn parse_response(text: &str) -> Vec<String> {
    let entries: Vec<String> = text
        .lines()
        .filter_map(parse_line)
        .map(|song| song.to_string())
        .collect();

    tracing::debug!(
        lines = text.lines().count(),
        entries = entries.len(),
        "Parsed generated reply"
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_variants() {
        assert_eq!(
            parse_response("1. Tito Puente - Oye Como Va"),
            vec!["Tito Puente - Oye Como Va"]
        );
        assert_eq!(
            parse_response("Tito Puente - Oye Como Va"),
            vec!["Tito Puente - Oye Como Va"]
        );
        assert_eq!(
            parse_response("2) Celia Cruz - La Vida Es Un Carnaval"),
            vec!["Celia Cruz - La Vida Es Un Carnaval"]
        );
        assert_eq!(
            parse_response("12.Los Van Van - Muevete"),
            vec!["Los Van Van - Muevete"]
        );
    }

    #[test]
    fn test_split_parts_have_no_numbering() {
        let song = parse_line("  3.   Celia Cruz   -   Quimbara  ").unwrap();
        assert_eq!(song.artist, "Celia Cruz");
        assert_eq!(song.title, "Quimbara");
    }

    #[test]
    fn test_bullets_are_stripped() {
        assert_eq!(
            parse_response("- Tito Puente - Oye Como Va\n* Celia Cruz - Quimbara"),
            vec!["Tito Puente - Oye Como Va", "Celia Cruz - Quimbara"]
        );
    }

    #[test]
    fn test_non_song_lines_dropped() {
        let reply = "Here is your set!\n\nWARMUP:\n1. Tito Puente - Oye Como Va\n\nPEAK:\n1. Los Van Van - Muevete\n\nCOOLDOWN:\n1. Buena Vista Social Club - Chan Chan\nEnjoy";
        assert_eq!(
            parse_response(reply),
            vec![
                "Tito Puente - Oye Como Va",
                "Los Van Van - Muevete",
                "Buena Vista Social Club - Chan Chan",
            ]
        );
    }

    #[test]
    fn test_title_keeps_later_hyphens() {
        let song = parse_line("1. Havana D'Primera - Pasaporte - En Vivo").unwrap();
        assert_eq!(song.artist, "Havana D'Primera");
        assert_eq!(song.title, "Pasaporte - En Vivo");
    }

    #[test]
    fn test_hyphenated_artist_is_split_at_first_hyphen() {
        // Known lossy case: hyphenated artist names cannot be told apart.
        let song = parse_line("Jay-Z - Numb").unwrap();
        assert_eq!(song.artist, "Jay");
        assert_eq!(song.title, "Z - Numb");
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let reply = "B - Two\nA - One\nB - Two";
        assert_eq!(parse_response(reply), vec!["B - Two", "A - One", "B - Two"]);
    }

    #[test]
    fn test_normalized_input_round_trips() {
        let entries = vec![
            SongEntry::new("Tito Puente", "Oye Como Va"),
            SongEntry::new("Celia Cruz", "La Vida Es Un Carnaval"),
            SongEntry::new("Los Van Van", "Muevete"),
        ];
        let text = entries
            .iter()
            .map(|e| format!("{} - {}", e.artist, e.title))
            .collect::<Vec<_>>()
            .join("\n");

        let parsed: Vec<SongEntry> = parse_response(&text)
            .iter()
            .filter_map(|e| SongEntry::parse(e))
            .collect();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_grammar_placeholder_dropped() {
        let reply = "WARMUP:\n1. Artist - Title\n2. artist - title\n3. Tito Puente - Oye Como Va";
        assert_eq!(parse_response(reply), vec!["Tito Puente - Oye Como Va"]);
    }

    #[test]
    fn test_empty_and_unmatched_input() {
        assert!(parse_response("").is_empty());
        assert!(parse_response("no songs here\n\n   \nWARMUP:").is_empty());
        assert!(parse_response("Artist -").is_empty());
    }
}
