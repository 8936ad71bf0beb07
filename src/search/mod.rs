//! Search functionality.
//!
//! Provides text search within documents with:
//! - Case-insensitive, line-anchored matching
//! - Literal whole-document replacement
//!
//! Searching never remembers previous calls: every invocation rebuilds its
//! result list from the current buffer.

mod replace;

pub use replace::{Replacement, replace_all};

use crate::editor::{DocumentBuffer, SelectionRange};

/// A line of the document containing the search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// One-based logical line number.
    pub line_number: usize,
    /// The full line text without its terminator.
    pub line_text: String,
    /// The line's span within the document.
    pub range: SelectionRange,
}

/// Find every line that contains `query`, ignoring case.
///
/// An empty query yields no results. Lines are reported in ascending order;
/// each line appears at most once no matter how often it matches.
pub fn find(buffer: &DocumentBuffer, query: &str) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = fold_case(query);
    let results: Vec<_> = buffer
        .lines()
        .filter(|line| fold_case(&line.text).contains(&needle))
        .map(|line| SearchResult {
            line_number: line.number,
            range: line.range(),
            line_text: line.text,
        })
        .collect();

    tracing::debug!(query, matches = results.len(), "search");
    results
}

/// Lowercase one char at a time.
///
/// `str::to_lowercase` picks a final sigma by context, which would make `"ΑΣ"`
/// stop containing `"Σ"`.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_numbers(results: &[SearchResult]) -> Vec<usize> {
        results.iter().map(|r| r.line_number).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let buf = DocumentBuffer::from_text("anything\nat all");
        assert!(find(&buf, "").is_empty());
    }

    #[test]
    fn test_matches_reported_per_line_in_order() {
        let buf = DocumentBuffer::from_text("a\nb\na\n");
        let results = find(&buf, "a");
        assert_eq!(line_numbers(&results), vec![1, 3]);
        assert_eq!(results[1].line_text, "a");
        assert_eq!(results[1].range, SelectionRange::new(4, 1));
    }

    #[test]
    fn test_search_ignores_case() {
        let buf = DocumentBuffer::from_text("Hello\nworld\nHELLO again");
        assert_eq!(line_numbers(&find(&buf, "hello")), vec![1, 3]);
        assert_eq!(line_numbers(&find(&buf, "WORLD")), vec![2]);
    }

    #[test]
    fn test_case_folding_ignores_final_sigma_context() {
        let buf = DocumentBuffer::from_text("ΑΣ\nother\nΟΔΟΣ ΚΑΙ");
        assert_eq!(line_numbers(&find(&buf, "Σ")), vec![1, 3]);
        assert_eq!(line_numbers(&find(&buf, "σ")), vec![1, 3]);
        assert_eq!(line_numbers(&find(&buf, "ΑΣ")), vec![1]);
    }

    #[test]
    fn test_repeated_match_on_one_line_reported_once() {
        let buf = DocumentBuffer::from_text("foo foo foo");
        assert_eq!(find(&buf, "foo").len(), 1);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let buf = DocumentBuffer::from_text("alpha\nbeta");
        assert!(find(&buf, "gamma").is_empty());
    }

    #[test]
    fn test_mixed_line_endings_keep_logical_numbers() {
        let buf = DocumentBuffer::from_text("first\r\nsecond match\nthird\rfourth match");
        let results = find(&buf, "match");
        assert_eq!(line_numbers(&results), vec![2, 4]);
        assert_eq!(results[0].line_text, "second match");
        assert_eq!(results[0].range, SelectionRange::new(7, 12));
    }

    #[test]
    fn test_crlf_before_match_counts_once() {
        let buf = DocumentBuffer::from_text("x\r\ny");
        let results = find(&buf, "y");
        assert_eq!(line_numbers(&results), vec![2]);
    }

    #[test]
    fn test_query_does_not_span_lines() {
        let buf = DocumentBuffer::from_text("ab\ncd");
        assert!(find(&buf, "b\nc").is_empty());
    }

    #[test]
    fn test_range_is_char_based() {
        let buf = DocumentBuffer::from_text("naïve\ncafé bar");
        let results = find(&buf, "BAR");
        assert_eq!(results[0].range, SelectionRange::new(6, 8));
    }

    #[test]
    fn test_search_is_repeatable() {
        let buf = DocumentBuffer::from_text("one\ntwo one");
        assert_eq!(find(&buf, "one"), find(&buf, "one"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_query_never_matches(text in "\\PC{0,64}") {
                let buf = DocumentBuffer::from_text(&text);
                prop_assert!(find(&buf, "").is_empty());
            }

            #[test]
            fn line_contains_any_slice_of_itself(
                text in "[a-zA-ZΑ-Ωα-ως İ]{1,16}",
                a in 0usize..16,
                b in 0usize..16,
            ) {
                let chars: Vec<char> = text.chars().collect();
                let (start, end) = (a.min(b) % chars.len(), a.max(b) % chars.len() + 1);
                prop_assume!(start < end);
                let query: String = chars[start..end].iter().collect();
                let buf = DocumentBuffer::from_text(&text);
                prop_assert_eq!(find(&buf, &query).len(), 1);
            }

            #[test]
            fn results_are_strictly_ascending(text in "[ab\r\n]{0,64}") {
                let buf = DocumentBuffer::from_text(&text);
                let results = find(&buf, "a");
                prop_assert!(results.windows(2).all(|w| w[0].line_number < w[1].line_number));
                prop_assert!(results.iter().all(|r| r.line_number <= buf.line_count()));
            }
        }
    }
}
