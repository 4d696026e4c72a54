/// Number of words kept from an opening sentence.
pub const SNIPPET_WORDS: usize = 10;

/// First `max_words` whitespace-delimited words of `text`, joined by single
/// spaces, with `...` appended when words were cut.
pub fn snippet(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sentences_are_kept_whole() {
        assert_eq!(snippet("Call me   Ishmael.", SNIPPET_WORDS), "Call me Ishmael.");
    }

    #[test]
    fn exactly_ten_words_has_no_ellipsis() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(snippet(text, SNIPPET_WORDS), text);
    }

    #[test]
    fn long_sentences_are_cut_with_ellipsis() {
        let text = "It was the best of times, it was the worst of times, it was the age of wisdom";
        assert_eq!(
            snippet(text, SNIPPET_WORDS),
            "It was the best of times, it was the worst..."
        );
    }

    #[test]
    fn newlines_and_tabs_collapse() {
        assert_eq!(snippet("a\n\tb  c", 2), "a b...");
    }
}
