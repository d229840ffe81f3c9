//! Data model for the inverted index and search results
//!
//! The C-era flexible array members and linked lists behind these shapes are
//! re-expressed as owned vectors with value semantics. Sorting invariants
//! (documents by name, postings by document id, words by stem) are maintained
//! by the engine's index store, not by these types.

use std::fmt;

// ============================================================================
// Index model
// ============================================================================

/// One occurrence record: a document id and the relative term frequency of
/// the stem in that document.
///
/// `tf` is the raw occurrence count divided by the document's `nr_words`,
/// performed once when the document is fully parsed, so `0 < tf <= 1` for
/// every posting at rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Position of the document in the document table at this instant.
    /// Not stable across inserts or deletes; the mutator renumbers.
    pub doc_id: usize,
    /// Relative term frequency of the stem in this document.
    pub tf: f64,
}

impl Posting {
    /// Create a posting.
    pub fn new(doc_id: usize, tf: f64) -> Self {
        Posting { doc_id, tf }
    }
}

/// A stem together with its posting list, kept sorted strictly ascending by
/// `doc_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedWord {
    /// Lower-case, non-empty output of the stemmer.
    pub stem: String,
    /// Postings sorted strictly ascending by `doc_id`; never empty at rest.
    pub postings: Vec<Posting>,
}

impl IndexedWord {
    /// Number of documents containing this stem.
    pub fn nr_docs(&self) -> usize {
        self.postings.len()
    }
}

/// One row of the document table.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    /// Display name, also the path of the document relative to the engine
    /// directory. Unique within the table.
    pub name: String,
    /// Total count of non-stopword, non-empty-stemmed tokens this document
    /// contributed to the index.
    pub nr_words: usize,
}

impl DocumentEntry {
    /// Create a table entry with no indexed words yet.
    pub fn new(name: impl Into<String>) -> Self {
        DocumentEntry {
            name: name.into(),
            nr_words: 0,
        }
    }
}

// ============================================================================
// Search results
// ============================================================================

/// A single ranked document.
///
/// Displays as `"%08.5f %s"`: the Euclidean distance prefixed to the
/// original document name, space-separated.
///
/// # Examples
///
/// ```
/// use filebase_core::SearchHit;
///
/// let hit = SearchHit { distance: 0.0, name: "a.txt".into() };
/// assert_eq!(hit.to_string(), "00.00000 a.txt");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Euclidean distance from the document's TF-IDF vector to the query's.
    pub distance: f64,
    /// Document name as stored in the table.
    pub name: String,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08.5} {}", self.distance, self.name)
    }
}

/// A run of ranked documents that matched the same subset of query terms.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroup {
    /// The matched query-term stems, as they appear in the index, joined
    /// by `", "`.
    pub label: String,
    /// Member documents, in ranking order.
    pub hits: Vec<SearchHit>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_display_zero_pads_to_width_eight() {
        let hit = SearchHit {
            distance: 0.0,
            name: "a.txt".into(),
        };
        assert_eq!(hit.to_string(), "00.00000 a.txt");
    }

    #[test]
    fn hit_display_rounds_to_five_digits() {
        let hit = SearchHit {
            distance: 0.123_456_78,
            name: "notes/b.txt".into(),
        };
        assert_eq!(hit.to_string(), "00.12346 notes/b.txt");
    }

    #[test]
    fn hit_display_wide_distances_keep_all_digits() {
        let hit = SearchHit {
            distance: 123.456_789,
            name: "c".into(),
        };
        assert_eq!(hit.to_string(), "123.45679 c");
    }

    #[test]
    fn indexed_word_doc_count_follows_postings() {
        let word = IndexedWord {
            stem: "cat".into(),
            postings: vec![Posting::new(0, 0.5), Posting::new(3, 1.0)],
        };
        assert_eq!(word.nr_docs(), 2);
    }
}
