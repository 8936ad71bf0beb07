/// The outcome of a replace-all pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// The document content after replacement.
    pub content: String,
    /// How many occurrences were replaced.
    pub count: usize,
}

impl Replacement {
    /// Whether any occurrence was replaced.
    pub const fn changed(&self) -> bool {
        self.count > 0
    }
}

/// Replace every literal occurrence of `query` with `replacement`.
///
/// Matching is case-sensitive, left-to-right and non-overlapping across the
/// whole text (not line by line). An empty query leaves the text untouched.
pub fn replace_all(text: &str, query: &str, replacement: &str) -> Replacement {
    if query.is_empty() {
        return Replacement {
            content: text.to_owned(),
            count: 0,
        };
    }

    let mut content = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;
    for (start, matched) in text.match_indices(query) {
        content.push_str(&text[last..start]);
        content.push_str(replacement);
        last = start + matched.len();
        count += 1;
    }
    content.push_str(&text[last..]);
    tracing::debug!(query, count, "replace all");
    Replacement { content, count }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let result = replace_all("foo bar foo", "foo", "baz");
        assert_eq!(result.content, "baz bar baz");
        assert_eq!(result.count, 2);
        assert!(result.changed());
    }

    #[test]
    fn test_empty_query_is_identity() {
        let result = replace_all("abc", "", "x");
        assert_eq!(result.content, "abc");
        assert!(!result.changed());
    }

    #[test]
    fn test_replace_is_case_sensitive() {
        let result = replace_all("Foo foo FOO", "foo", "bar");
        assert_eq!(result.content, "Foo bar FOO");
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let result = replace_all("aaaa", "aa", "b");
        assert_eq!(result.content, "bb");
        assert_eq!(result.count, 2);

        let result = replace_all("aaa", "aa", "b");
        assert_eq!(result.content, "ba");
    }

    #[test]
    fn test_replacement_containing_query_does_not_recurse() {
        let result = replace_all("a", "a", "aa");
        assert_eq!(result.content, "aa");
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_replace_spans_lines() {
        let result = replace_all("x\ny\nx", "\ny\n", "-");
        assert_eq!(result.content, "x-x");
    }

    #[test]
    fn test_multibyte_text_around_matches_is_kept() {
        let result = replace_all("é→x←é x", "x", "ÿy");
        assert_eq!(result.content, "é→ÿy←é ÿy");
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_no_occurrence_leaves_text() {
        let result = replace_all("hello", "zzz", "y");
        assert_eq!(result.content, "hello");
        assert!(!result.changed());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_query_is_identity(text in "\\PC{0,64}", replacement in "\\PC{0,8}") {
                prop_assert_eq!(replace_all(&text, "", &replacement).content, text);
            }

            #[test]
            fn agrees_with_str_replace(
                text in "[ab\\n]{0,64}",
                query in "[ab]{1,3}",
                replacement in "[xy]{0,3}",
            ) {
                let result = replace_all(&text, &query, &replacement);
                prop_assert_eq!(result.content, text.replace(&query, &replacement));
                prop_assert_eq!(result.count, text.matches(&query).count());
            }

            #[test]
            fn replacing_with_itself_is_identity(text in "[ab ]{0,64}", query in "[ab]{1,3}") {
                prop_assert_eq!(replace_all(&text, &query, &query).content, text);
            }
        }
    }
}
