//! Byte-level text normalization for indexing and queries
//!
//! Pipeline: treat every byte as ASCII -> lower-case letters, blank out
//! everything else -> split on runs of spaces. Stopword filtering and
//! stemming happen in the caller, which needs the surface token for the
//! stopword test before reducing it to a stem.

/// Normalize a byte buffer: ASCII letters are case-folded to lower case,
/// every other byte becomes a single space.
///
/// Multi-byte UTF-8 sequences fall out naturally: none of their bytes are
/// ASCII letters, so they turn into separators.
pub fn normalize_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_alphabetic() {
                b.to_ascii_lowercase() as char
            } else {
                ' '
            }
        })
        .collect()
}

/// Normalize a string slice. See [`normalize_bytes`].
pub fn normalize(text: &str) -> String {
    normalize_bytes(text.as_bytes())
}

/// Tokenize text into normalized surface words (no stopword filtering, no
/// stemming). Empty tokens are discarded by the whitespace split.
///
/// # Examples
///
/// ```
/// use filebase_engine::search::tokenizer::tokenize;
///
/// let tokens = tokenize("The Quick, Brown Fox!");
/// assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
