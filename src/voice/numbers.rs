//! Spoken number parsing for the price and quantity steps.

/// Spanish number words the recognizer returns for one to ten.
const NUMBER_WORDS: [(&str, u32); 11] = [
    ("uno", 1),
    ("un", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
];

/// Reads a non-negative integer from a transcript.
///
/// Number words are matched case-insensitively; anything else must be a plain
/// decimal integer (recognizers often return digits already). Returns `None`
/// for everything else, including the empty string and negative numbers.
#[must_use]
pub fn parse_quantity_word(word: &str) -> Option<u32> {
    let word = word.trim();
    let lower = word.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == lower)
        .map(|&(_, n)| n)
        .or_else(|| word.parse().ok())
}
