use crate::error::WordCountError;

/// A loaded counting module. `word_count` must be pure.
pub trait CountModule: Send + Sync {
    fn name(&self) -> &str;

    fn word_count(&self, text: &str) -> Result<u64, WordCountError>;
}

/// C-locale `isspace`: space, tab, newline, vertical tab, form feed,
/// carriage return. Anything else, punctuation included, is part of a word.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Number of maximal runs of non-separator characters.
pub fn count_words(text: &str) -> u64 {
    text.split(is_separator).filter(|word| !word.is_empty()).count() as u64
}

/// The built-in module: whitespace-delimited counting.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceModule;

impl CountModule for WhitespaceModule {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn word_count(&self, text: &str) -> Result<u64, WordCountError> {
        Ok(count_words(text))
    }
}
