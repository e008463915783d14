//! Greedy word wrapping against a pixel width budget.
//!
//! Words are the pieces of the caption split on single spaces. Each line is
//! grown one word at a time for as long as the measured width stays within
//! the budget. A word that does not fit on its own still gets its own line:
//! words are never broken.

/// Break `text` into lines no wider than `max_width`, as reported by `measure`.
///
/// `measure` maps a candidate line to its rendered width in pixels. Joining
/// the returned lines with `" "` reproduces `text` exactly. A line is wider
/// than `max_width` only when it consists of a single word.
///
/// ```
/// # use caption_pack::imaging::wrap_text;
/// // one pixel per character, 11 pixel budget
/// let lines = wrap_text("the quick brown fox", |s| s.len() as u32, 11);
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_text(text: &str, measure: impl Fn(&str) -> u32, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    // None until the first word lands, so an over-width opening word does
    // not push a blank line ahead of itself.
    let mut current: Option<String> = None;

    for word in text.split(' ') {
        let candidate = match &current {
            Some(line) => format!("{line} {word}"),
            None => word.to_string(),
        };

        if measure(&candidate) <= max_width {
            current = Some(candidate);
        } else {
            if let Some(line) = current.take() {
                lines.push(line);
            }
            current = Some(word.to_string());
        }
    }

    lines.push(current.unwrap_or_default());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_width(s: &str) -> u32 {
        s.chars().count() as u32
    }

    /// Ten pixels per character, like a monospace font at a small size.
    fn mono(s: &str) -> u32 {
        s.chars().count() as u32 * 10
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(wrap_text("Hello world", char_width, 20), vec!["Hello world"]);
    }

    #[test]
    fn exact_fit_is_kept() {
        // "Hello world" is exactly 11 wide
        assert_eq!(wrap_text("Hello world", char_width, 11), vec!["Hello world"]);
    }

    #[test]
    fn breaks_when_candidate_exceeds_budget() {
        assert_eq!(
            wrap_text("Hello world", char_width, 10),
            vec!["Hello", "world"]
        );
    }

    #[test]
    fn greedy_fills_each_line() {
        let lines = wrap_text("a bb ccc dddd eeeee", mono, 80);
        assert_eq!(lines, vec!["a bb ccc", "dddd", "eeeee"]);
    }

    #[test]
    fn single_long_word_is_its_own_line() {
        let lines = wrap_text("Supercalifragilistic", char_width, 5);
        assert_eq!(lines, vec!["Supercalifragilistic"]);
    }

    #[test]
    fn long_word_in_the_middle_is_not_split() {
        let lines = wrap_text("go extraordinarily far", char_width, 6);
        assert_eq!(lines, vec!["go", "extraordinarily", "far"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", char_width, 10), vec![""]);
    }

    #[test]
    fn repeated_spaces_survive_the_round_trip() {
        let text = "wide  gap here";
        let lines = wrap_text(text, char_width, 100);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn rejoining_lines_reproduces_text() {
        let texts = [
            "Hello world",
            "The quick brown fox jumps over the lazy dog",
            "one",
            "a b c d e f g h i j k l m n o p",
            "tiny words and an incomprehensibilities sized word",
        ];
        for text in texts {
            for budget in [1, 3, 8, 15, 40, 1000] {
                let lines = wrap_text(text, char_width, budget);
                assert_eq!(lines.join(" "), text, "budget {budget}");
            }
        }
    }

    #[test]
    fn every_line_fits_or_is_a_single_word() {
        let text = "The quick brown fox jumps over the extraordinarily lazy dog";
        for budget in [1, 4, 9, 12, 30] {
            for line in wrap_text(text, char_width, budget) {
                assert!(
                    char_width(&line) <= budget || !line.contains(' '),
                    "line {line:?} breaks budget {budget}"
                );
            }
        }
    }

    #[test]
    fn wrapping_is_idempotent() {
        let text = "Same input always gives the same lines";
        assert_eq!(wrap_text(text, mono, 120), wrap_text(text, mono, 120));
    }

    #[test]
    fn measure_sees_joined_candidates() {
        use std::cell::RefCell;
        let seen = RefCell::new(Vec::new());
        wrap_text(
            "ab cd ef",
            |s| {
                seen.borrow_mut().push(s.to_string());
                char_width(s)
            },
            5,
        );
        // the word that opens a new line is adopted without measuring
        assert_eq!(*seen.borrow(), vec!["ab", "ab cd", "ab cd ef"]);
    }
}
