//! Stopword set loaded from the `stopwords` file
//!
//! One lower-case word per line, LF or CRLF terminated. The set is an
//! explicit object owned by the engine rather than process-wide state; it is
//! loaded once when the engine opens. A missing file leaves the set empty
//! and logs a single warning, matching the non-fatal contract for every
//! input file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::warn;

/// Name of the stopword file inside the engine directory.
pub const STOPWORDS_FILE: &str = "stopwords";

/// Case-sensitive stopword membership. Normalization has already
/// lower-cased every token by the time it is tested here.
#[derive(Debug, Default, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// An empty set that filters nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the set from a file, one word per line, trailing CR stripped.
    ///
    /// A missing or unreadable file is not fatal: the returned set is empty
    /// and a warning is emitted once, here.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "stopwords file not found; not removing stopwords");
                return Self::empty();
            }
        };

        let words = contents
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// Is the (already lower-cased) word a stopword?
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of loaded stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no stopwords are loaded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
