//! Transcript text normalization
//!
//! Diet transcripts open each utterance with a `○speaker-name` annotation
//! and interleave indented stage-direction lines. Both are noise for word
//! counting and are stripped here before tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

// Lines opening with two or more full-width spaces are continuation or
// stage-direction lines.
static INDENTED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^　{2,}").unwrap());

// Speaker annotation: marker glyph through the first whitespace character.
static SPEAKER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^○.*?\s").unwrap());

/// Strip speaker-name prefixes and indented continuation lines
///
/// Pure line-by-line filter: indented lines are dropped entirely, speaker
/// prefixes are removed up to and including the first whitespace character,
/// and every other line passes through verbatim in original order.
pub fn normalize(text: &str) -> String {
    text.lines()
        .filter(|line| !INDENTED_LINE.is_match(line))
        .map(|line| SPEAKER_PREFIX.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented_line_is_dropped() {
        assert_eq!(normalize("　　（拍手）"), "");
    }

    #[test]
    fn test_single_fullwidth_space_is_kept() {
        assert_eq!(normalize("　一つだけ"), "　一つだけ");
    }

    #[test]
    fn test_speaker_prefix_is_stripped() {
        assert_eq!(normalize("○田中太郎　質問します"), "質問します");
    }

    #[test]
    fn test_speaker_prefix_with_ascii_space() {
        assert_eq!(normalize("○議長 開会します"), "開会します");
    }

    #[test]
    fn test_marker_without_whitespace_is_kept() {
        assert_eq!(normalize("○印のみ"), "○印のみ");
    }

    #[test]
    fn test_other_lines_pass_through_in_order() {
        let text = "一行目\n○田中太郎　二行目\n　　（休憩）\n三行目";
        assert_eq!(normalize(text), "一行目\n二行目\n三行目");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(normalize(""), "");
    }
}
