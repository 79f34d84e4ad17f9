//! Language helpers for Nudge — tokenization, the preposition lexicon, and
//! filler-word stripping.
//!
//! Everything here is a pure function over strings. Tokens keep their
//! display case; every comparison goes through [`match_key`], which
//! lowercases and trims trailing punctuation, so "At" and "groceries." match
//! "at" and "groceries".

use nudge_core::Lexicon;

/// The fixed set of words treated as prepositions. Preposition positions
/// are the structural anchors the slot parser splits sentences on.
const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "around", "at", "before", "behind", "below",
    "beneath", "beside", "between", "beyond", "by", "down", "during", "except", "for", "from",
    "in", "inside", "into", "near", "of", "off", "on", "onto", "out", "outside", "over",
    "through", "to", "toward", "under", "until", "up", "upon", "with", "within",
];

/// Words stripped from a reply when the user restates the whole request
/// while answering the content question ("remind me to buy groceries").
const FILLER_WORDS: &[&str] = &["remind", "me", "to", "later"];

/// Split a sentence into whitespace tokens, display case preserved.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_string).collect()
}

/// Normalize a token for matching: lowercase, trailing punctuation trimmed.
pub fn match_key(token: &str) -> String {
    token
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_lowercase()
}

/// Drop filler words from the tokens and join what remains.
///
/// Returns an empty string when nothing but filler was said, which leaves
/// the content slot unfilled and the question standing.
pub fn strip_fillers(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter(|t| !FILLER_WORDS.contains(&match_key(t).as_str()))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The default English lexicon backed by the fixed preposition table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLexicon;

impl EnglishLexicon {
    pub fn new() -> Self {
        Self
    }
}

impl Lexicon for EnglishLexicon {
    fn is_preposition(&self, word: &str) -> bool {
        PREPOSITIONS.contains(&match_key(word).as_str())
    }
}
