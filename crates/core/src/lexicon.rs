//! Lexicon trait — word classification used to anchor sentence splitting.

/// Classifies single words. The slot parser uses preposition positions as
/// the structural boundaries between action content and time fragments.
///
/// Lookups are case-insensitive and ignore trailing punctuation; callers
/// pass tokens as they appear and implementations normalize.
pub trait Lexicon: Send + Sync {
    fn is_preposition(&self, word: &str) -> bool;
}
