//! Inverted index with a sorted document table
//!
//! This module provides:
//! - `IndexStore`: the in-memory index (sorted word list + document table)
//! - `persist`: the on-disk `filebase`/`index` text formats
//! - `query`: TF-IDF scoring, threshold admission, ranking and grouping
//!
//! Both the word list and the document table are kept in lexicographic
//! order, and every posting list in ascending `doc_id` order, so that
//! lookup is a binary search and scoring is a single merge traversal.
//! Document ids are table positions: every insert or delete renumbers the
//! postings so ids stay dense and agree with the table.

pub mod persist;
pub mod query;

use filebase_core::types::{DocumentEntry, IndexedWord, Posting};

/// Where a document name lands in the sorted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePosition {
    /// The exact name is already present at this id.
    Occupied(usize),
    /// The name is absent and would be inserted at this id.
    Vacant(usize),
}

/// In-memory inverted index and document table.
///
/// All mutation goes through the engine facade, which owns file parsing;
/// the store only maintains the sorted structure and its invariants.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexStore {
    /// Indexed words sorted strictly ascending by stem.
    words: Vec<IndexedWord>,
    /// Document table sorted strictly ascending by name, except while a
    /// transient query document occupies position 0.
    documents: Vec<DocumentEntry>,
}

impl IndexStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from already-validated parts. Used by persistence.
    pub(crate) fn from_parts(words: Vec<IndexedWord>, documents: Vec<DocumentEntry>) -> Self {
        IndexStore { words, documents }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of documents in the table.
    pub fn nr_docs(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct stems in the index.
    pub fn nr_words(&self) -> usize {
        self.words.len()
    }

    /// The document table, in id order.
    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    /// The indexed words, in stem order.
    pub fn words(&self) -> &[IndexedWord] {
        &self.words
    }

    /// Locate a document by exact name.
    pub fn find_document(&self, name: &str) -> Option<usize> {
        self.documents
            .binary_search_by(|d| d.name.as_str().cmp(name))
            .ok()
    }

    /// Where `name` sits, or would be inserted, in the sorted table.
    pub fn table_position(&self, name: &str) -> TablePosition {
        match self
            .documents
            .binary_search_by(|d| d.name.as_str().cmp(name))
        {
            Ok(id) => TablePosition::Occupied(id),
            Err(id) => TablePosition::Vacant(id),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a new document at `doc_id` with no indexed words yet.
    ///
    /// Every existing posting with id >= `doc_id` is renumbered up by one
    /// first, so posting ids keep agreeing with the shifted table.
    pub(crate) fn insert_document(&mut self, doc_id: usize, name: String) {
        for word in &mut self.words {
            for posting in &mut word.postings {
                if posting.doc_id >= doc_id {
                    posting.doc_id += 1;
                }
            }
        }
        self.documents.insert(doc_id, DocumentEntry::new(name));
    }

    /// Record one occurrence of `stem` in `doc_id`.
    ///
    /// Creates the indexed word or the posting as needed, keeping both the
    /// word list and the posting list sorted. The posting accumulates a raw
    /// occurrence count in `tf` until [`finalize_document`](Self::finalize_document)
    /// divides it by the document's token total.
    pub(crate) fn record_token(&mut self, doc_id: usize, stem: String) {
        match self.words.binary_search_by(|w| w.stem.as_str().cmp(&stem)) {
            Ok(wid) => {
                let postings = &mut self.words[wid].postings;
                match postings.binary_search_by(|p| p.doc_id.cmp(&doc_id)) {
                    Ok(pid) => postings[pid].tf += 1.0,
                    Err(pid) => postings.insert(pid, Posting::new(doc_id, 1.0)),
                }
            }
            Err(wid) => {
                self.words.insert(
                    wid,
                    IndexedWord {
                        stem,
                        postings: vec![Posting::new(doc_id, 1.0)],
                    },
                );
            }
        }
        self.documents[doc_id].nr_words += 1;
    }

    /// Turn the raw occurrence counts accumulated for `doc_id` into relative
    /// term frequencies. Called once, after the document is fully parsed.
    pub(crate) fn finalize_document(&mut self, doc_id: usize) {
        let nr_words = self.documents[doc_id].nr_words;
        if nr_words == 0 {
            return;
        }
        for word in &mut self.words {
            if let Ok(pid) = word.postings.binary_search_by(|p| p.doc_id.cmp(&doc_id)) {
                word.postings[pid].tf /= nr_words as f64;
            }
        }
    }

    /// Remove the document at `doc_id` from the table and from every posting
    /// list, renumbering the survivors down. Words whose posting list empties
    /// are removed from the index entirely.
    pub(crate) fn remove_document(&mut self, doc_id: usize) {
        self.documents.remove(doc_id);

        self.words.retain_mut(|word| {
            if let Ok(pid) = word.postings.binary_search_by(|p| p.doc_id.cmp(&doc_id)) {
                word.postings.remove(pid);
            }
            for posting in &mut word.postings {
                if posting.doc_id > doc_id {
                    posting.doc_id -= 1;
                }
            }
            !word.postings.is_empty()
        });
    }

    /// Drop the whole word list and zero every document's token count,
    /// keeping the table itself. The caller re-parses each document.
    pub(crate) fn clear_words(&mut self) {
        self.words.clear();
        for doc in &mut self.documents {
            doc.nr_words = 0;
        }
    }

    // ========================================================================
    // Invariant checking
    // ========================================================================

    /// Validate every structural invariant, returning a description of the
    /// first violation. Used by the property-test suite; cheap enough to run
    /// after every mutation in tests.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.documents.windows(2) {
            if pair[0].name >= pair[1].name {
                return Err(format!(
                    "document table not strictly sorted: {:?} before {:?}",
                    pair[0].name, pair[1].name
                ));
            }
        }

        for pair in self.words.windows(2) {
            if pair[0].stem >= pair[1].stem {
                return Err(format!(
                    "word list not strictly sorted: {:?} before {:?}",
                    pair[0].stem, pair[1].stem
                ));
            }
        }

        for word in &self.words {
            if word.stem.is_empty() {
                return Err("empty stem in word list".into());
            }
            if word.postings.is_empty() {
                return Err(format!("word {:?} has an empty posting list", word.stem));
            }
            for pair in word.postings.windows(2) {
                if pair[0].doc_id >= pair[1].doc_id {
                    return Err(format!(
                        "posting list for {:?} not strictly sorted",
                        word.stem
                    ));
                }
            }
            for posting in &word.postings {
                if posting.doc_id >= self.documents.len() {
                    return Err(format!(
                        "posting for {:?} references document {} outside the table",
                        word.stem, posting.doc_id
                    ));
                }
                if !(posting.tf > 0.0 && posting.tf <= 1.0) {
                    return Err(format!(
                        "posting for {:?} in document {} has tf {} outside (0, 1]",
                        word.stem, posting.doc_id, posting.tf
                    ));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
