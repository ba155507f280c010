//! Greedy word wrap against a measured width

/// Break `text` into lines no wider than `max_width`.
///
/// Words are added to the current line while the measured candidate fits. A
/// single word wider than `max_width` is never split; it gets a line of its
/// own. Runs of whitespace collapse to one space.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_short_text_single_line() {
        assert_eq!(wrap_text("hello world", 200.0, mono), vec!["hello world"]);
    }

    #[test]
    fn test_breaks_at_width() {
        let lines = wrap_text("the quick brown fox jumps", 100.0, mono);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(lines.iter().all(|l| mono(l) <= 100.0));
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let lines = wrap_text("a supercalifragilistic b", 50.0, mono);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(wrap_text("", 100.0, mono).is_empty());
        assert!(wrap_text("   \n\t ", 100.0, mono).is_empty());
        assert_eq!(wrap_text("  a   b ", 100.0, mono), vec!["a b"]);
    }
}
