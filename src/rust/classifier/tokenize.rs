use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+(?:['’]\w+)*").unwrap();
    static ref SENTENCE: Regex = Regex::new(r"[^.!?]+[.!?]*").unwrap();
}

/// Splits text into word tokens, dropping punctuation.
pub(crate) fn words(text: &str, lowercase: bool) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| {
            if lowercase {
                m.as_str().to_lowercase()
            } else {
                m.as_str().to_string()
            }
        })
        .collect()
}

/// Splits text on terminal punctuation, keeping the punctuation with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE.find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}
