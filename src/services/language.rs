use regex::Regex;
use std::sync::LazyLock;

// Apostrophes split tokens, so "it's" yields "it" and "don’t" yields "don".
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+").expect("word pattern is valid"));

const ENGLISH_FUNCTION_WORDS: &[&str] = &[
    "the", "of", "and", "to", "a", "an", "in", "is", "it", "that", "was", "he", "she", "for",
    "on", "are", "as", "with", "his", "her", "they", "i", "at", "be", "this", "have", "from",
    "or", "had", "by", "but", "not", "what", "all", "were", "we", "when", "there", "can",
    "which", "their", "if", "do", "will", "each", "about", "how", "them", "then", "my", "me",
    "so", "would", "him", "into", "has", "been", "who", "its", "you", "one", "upon", "our",
];

// French, Spanish, German, Italian, Portuguese and Dutch. Words that are also
// English ("war", "den", "van", "per", "con") are left out.
const FOREIGN_FUNCTION_WORDS: &[&str] = &[
    "le", "la", "les", "une", "un", "des", "du", "et", "est", "qui", "que", "dans", "pour",
    "pas", "avec", "sur", "il", "elle", "était", "au", "aux", "ce", "cette", "ne", "se", "el",
    "los", "las", "del", "y", "en", "por", "una", "para", "es", "lo", "su", "al",
    "como", "pero", "der", "das", "und", "ist", "nicht", "ein", "eine", "mit", "auf", "zu",
    "dem", "sich", "einmal", "ich", "hatte", "gli", "della", "di", "che", "non",
    "sono", "è", "de", "uma", "não", "os", "em", "het", "een", "niet", "ik",
    "zijn", "op", "er",
];

/// Best-effort guess at whether `text` is English, based on the share of
/// English function words among its tokens.
pub fn is_english(text: &str) -> bool {
    let words: Vec<String> = WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    if words.is_empty() {
        return false;
    }

    // Share of non-ASCII letters, so accented names and loanwords still pass.
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let non_ascii: usize = words
        .iter()
        .map(|w| w.chars().filter(|c| !c.is_ascii()).count())
        .sum();
    if non_ascii * 4 > letters {
        return false;
    }

    let english = words
        .iter()
        .filter(|w| ENGLISH_FUNCTION_WORDS.contains(&w.as_str()))
        .count();
    let foreign = words
        .iter()
        .filter(|w| FOREIGN_FUNCTION_WORDS.contains(&w.as_str()))
        .count();

    if words.len() < 4 {
        return foreign == 0;
    }

    english > foreign && english * 10 >= words.len()
}
