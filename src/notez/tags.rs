//! Tags are edited as one comma-delimited string and held as an ordered
//! sequence everywhere else. These two functions are the only conversion points.

pub const TAG_SEPARATOR: char = ',';
pub const TAG_JOINER: &str = ", ";

/// Splits comma-delimited tag text into labels, trimming whitespace and
/// dropping empty entries. Order and duplicates are preserved.
pub fn parse_tag_text(text: &str) -> Vec<String> {
    text.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders labels for editing or display.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(TAG_JOINER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spaced_and_unspaced_separators() {
        assert_eq!(
            parse_tag_text("webgl,shaders, midterm"),
            vec!["webgl", "shaders", "midterm"]
        );
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(parse_tag_text(" , a,, b ,"), vec!["a", "b"]);
        assert!(parse_tag_text("").is_empty());
        assert!(parse_tag_text("   ").is_empty());
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(parse_tag_text("b, a, b"), vec!["b", "a", "b"]);
    }

    #[test]
    fn joined_text_reparses_to_the_same_labels() {
        let tags = vec!["a".to_string(), "b c".to_string()];
        let text = join_tags(&tags);
        assert_eq!(text, "a, b c");
        assert_eq!(parse_tag_text(&text), tags);
    }
}
