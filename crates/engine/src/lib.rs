//! filebase-engine: a persistent TF-IDF search engine over local documents
//!
//! The [`Filebase`] facade owns the in-memory inverted index, the stopword
//! set and the directory all engine files live in. Mutations (add, remove,
//! rebuild) keep the index invariants and rewrite the persistence files;
//! queries materialize a transient document at position 0 of the corpus,
//! score every real document against it, then restore the index.
//!
//! Everything runs synchronously on the calling thread. Failures are values:
//! the shell prints them and the index is left intact (persistence failures
//! keep the in-memory state and are reported through `tracing`).

pub mod index;
pub mod search;

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use filebase_core::error::{Error, Result};
use filebase_core::types::SearchGroup;

use index::persist;
use index::query;
use index::{IndexStore, TablePosition};
use search::stemmer;
use search::stopwords::StopwordSet;
use search::tokenizer;

pub use index::persist::{FILEBASE_FILE, INDEX_FILE};
pub use index::query::MAX_SEARCH_RESULTS;
pub use search::stopwords::STOPWORDS_FILE;

/// Name of the transient query document. It is the only document whose
/// insertion bypasses the lexicographic-position rule: it always enters the
/// table at position 0 and is removed before the query returns.
pub const TMP_SEARCH_DOC: &str = "._tmp_search_doc";

/// The search engine: index, stopwords and their home directory.
#[derive(Debug)]
pub struct Filebase {
    /// Directory holding `stopwords`, `filebase`, `index` and the documents.
    dir: PathBuf,
    index: IndexStore,
    stopwords: StopwordSet,
}

impl Filebase {
    /// Open an engine over `dir`, loading the stopword set and any persisted
    /// index. Missing files are diagnosed once and leave the corresponding
    /// part empty; nothing here is fatal.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let stopwords = StopwordSet::load(&dir.join(STOPWORDS_FILE));
        let index = persist::load(&dir);
        debug!(
            docs = index.nr_docs(),
            words = index.nr_words(),
            stopwords = stopwords.len(),
            "filebase opened"
        );
        Filebase {
            dir,
            index,
            stopwords,
        }
    }

    /// The engine directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The in-memory index.
    pub fn index(&self) -> &IndexStore {
        &self.index
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Add the document named `name` (a path relative to the engine
    /// directory) to the index and persist.
    ///
    /// The file is open-tested first; an unreadable file leaves the index
    /// unchanged, as does a name already present in the table.
    pub fn add_file(&mut self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        File::open(&path).map_err(|source| Error::DocumentUnreadable {
            path: name.to_string(),
            source,
        })?;

        let doc_id = if name == TMP_SEARCH_DOC {
            0
        } else {
            match self.index.table_position(name) {
                TablePosition::Occupied(_) => {
                    return Err(Error::DuplicateDocument(name.to_string()))
                }
                TablePosition::Vacant(id) => id,
            }
        };

        self.index.insert_document(doc_id, name.to_string());
        self.parse_document(doc_id);
        self.persist();
        Ok(())
    }

    /// Remove the document named `name` from the index and persist.
    pub fn remove_file(&mut self, name: &str) -> Result<()> {
        let doc_id = self
            .index
            .find_document(name)
            .ok_or_else(|| Error::UnknownDocument(name.to_string()))?;
        self.remove_document(doc_id)
    }

    /// Remove the document with ordinal `doc_id` from the index and persist.
    ///
    /// An out-of-range id removes nothing.
    pub fn remove_document(&mut self, doc_id: usize) -> Result<()> {
        if self.index.nr_docs() == 0 {
            return Err(Error::EmptyFilebase);
        }
        if doc_id >= self.index.nr_docs() {
            return Err(Error::IdOutOfRange(doc_id));
        }
        self.index.remove_document(doc_id);
        self.persist();
        Ok(())
    }

    /// Discard the whole word list and re-parse every document in the
    /// (unchanged) table, then persist.
    ///
    /// Documents that can no longer be opened are diagnosed and contribute
    /// nothing.
    pub fn rebuild(&mut self) -> Result<()> {
        self.index.clear_words();
        for doc_id in 0..self.index.nr_docs() {
            self.parse_document(doc_id);
        }
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Rank the corpus against `query` and return the grouped result.
    ///
    /// The normalized query is written to the transient document, added to
    /// the index at position 0, scored, and removed again; the index and its
    /// persisted form end up as they started.
    pub fn search(&mut self, query: &str) -> Result<Vec<SearchGroup>> {
        let normalized = tokenizer::normalize(query);
        let tmp_path = self.dir.join(TMP_SEARCH_DOC);
        fs::write(&tmp_path, format!("{}\n", normalized)).map_err(Error::TransientDocument)?;

        self.add_file(TMP_SEARCH_DOC)?;
        let groups = query::rank(&self.index);

        if let Err(err) = self.remove_document(0) {
            warn!(error = %err, "could not remove transient search document from index");
        }
        if let Err(err) = fs::remove_file(&tmp_path) {
            warn!(error = %err, "could not delete transient search document");
        }

        Ok(groups)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Parse the document at `doc_id`: normalize, drop stopwords, stem, and
    /// record every surviving token, then turn counts into frequencies.
    ///
    /// An unreadable file is diagnosed here and leaves the document in the
    /// table with no indexed words, matching rebuild semantics.
    fn parse_document(&mut self, doc_id: usize) {
        let name = self.index.documents()[doc_id].name.clone();
        let bytes = match fs::read(self.dir.join(&name)) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(document = %name, error = %err, "cannot open document; index not updated");
                return;
            }
        };

        let text = tokenizer::normalize_bytes(&bytes);
        for token in text.split_whitespace() {
            if self.stopwords.contains(token) {
                continue;
            }
            let stem = stemmer::stem(token);
            if stem.is_empty() {
                continue;
            }
            self.index.record_token(doc_id, stem);
        }
        self.index.finalize_document(doc_id);
    }

    /// Rewrite the persistence files; on failure keep the in-memory state
    /// and report through tracing, never to the caller.
    fn persist(&self) {
        if let Err(err) = persist::save(&self.index, &self.dir) {
            warn!(error = %err, "unable to write index to file; in-memory state kept");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine_with(files: &[(&str, &str)]) -> (TempDir, Filebase) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STOPWORDS_FILE), "").unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let fb = Filebase::open(dir.path());
        (dir, fb)
    }

    #[test]
    fn test_add_indexes_stemmed_tokens() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cats and dogs")]);
        fb.add_file("a.txt").unwrap();

        let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.clone()).collect();
        assert_eq!(stems, vec!["and", "cat", "dog"]);
        assert_eq!(fb.index().documents()[0].nr_words, 3);
        fb.index().validate().unwrap();
    }

    #[test]
    fn test_add_missing_file_is_an_error_and_a_noop() {
        let (_dir, mut fb) = engine_with(&[]);
        let err = fb.add_file("ghost.txt").unwrap_err();
        assert!(matches!(err, Error::DocumentUnreadable { .. }));
        assert_eq!(fb.index().nr_docs(), 0);
    }

    #[test]
    fn test_add_duplicate_name_is_an_error_and_a_noop() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cats")]);
        fb.add_file("a.txt").unwrap();
        let before = fb.index().clone();

        let err = fb.add_file("a.txt").unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument(_)));
        assert_eq!(fb.index(), &before);
    }

    #[test]
    fn test_stopwords_are_not_indexed_or_counted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STOPWORDS_FILE), "the\nand\n").unwrap();
        fs::write(dir.path().join("a.txt"), "the cats and dogs").unwrap();

        let mut fb = Filebase::open(dir.path());
        fb.add_file("a.txt").unwrap();

        let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.clone()).collect();
        assert_eq!(stems, vec!["cat", "dog"]);
        assert_eq!(fb.index().documents()[0].nr_words, 2);
    }

    #[test]
    fn test_remove_unknown_name_is_an_error() {
        let (_dir, mut fb) = engine_with(&[]);
        assert!(matches!(
            fb.remove_file("ghost.txt").unwrap_err(),
            Error::UnknownDocument(_)
        ));
    }

    #[test]
    fn test_remove_out_of_range_id_is_a_hard_stop() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cats")]);
        fb.add_file("a.txt").unwrap();
        let before = fb.index().clone();

        assert!(matches!(
            fb.remove_document(7).unwrap_err(),
            Error::IdOutOfRange(7)
        ));
        assert_eq!(fb.index(), &before);
    }

    #[test]
    fn test_remove_on_empty_filebase_is_an_error() {
        let (_dir, mut fb) = engine_with(&[]);
        assert!(matches!(
            fb.remove_document(0).unwrap_err(),
            Error::EmptyFilebase
        ));
    }

    #[test]
    fn test_add_then_remove_restores_the_index() {
        let (_dir, mut fb) = engine_with(&[
            ("a.txt", "cats and dogs"),
            ("b.txt", "the cat sat"),
        ]);
        fb.add_file("a.txt").unwrap();
        let before = fb.index().clone();

        fb.add_file("b.txt").unwrap();
        fb.remove_file("b.txt").unwrap();
        assert_eq!(fb.index(), &before);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (_dir, mut fb) = engine_with(&[
            ("a.txt", "cats and dogs"),
            ("b.txt", "the cat sat"),
        ]);
        fb.add_file("a.txt").unwrap();
        fb.add_file("b.txt").unwrap();

        fb.rebuild().unwrap();
        let once = fb.index().clone();
        fb.rebuild().unwrap();
        assert_eq!(fb.index(), &once);
        fb.index().validate().unwrap();
    }

    #[test]
    fn test_rebuild_skips_vanished_documents() {
        let (dir, mut fb) = engine_with(&[("a.txt", "cats"), ("b.txt", "dogs")]);
        fb.add_file("a.txt").unwrap();
        fb.add_file("b.txt").unwrap();

        fs::remove_file(dir.path().join("a.txt")).unwrap();
        fb.rebuild().unwrap();

        // a.txt stays in the table but contributes nothing
        assert_eq!(fb.index().nr_docs(), 2);
        assert_eq!(fb.index().documents()[0].nr_words, 0);
        let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.clone()).collect();
        assert_eq!(stems, vec!["dog"]);
        fb.index().validate().unwrap();
    }

    #[test]
    fn test_open_reloads_persisted_state() {
        let (dir, mut fb) = engine_with(&[("a.txt", "cats and dogs")]);
        fb.add_file("a.txt").unwrap();
        let before = fb.index().clone();
        drop(fb);

        let reopened = Filebase::open(dir.path());
        assert_eq!(reopened.index().documents(), before.documents());
        assert_eq!(reopened.index().nr_words(), before.nr_words());
        reopened.index().validate().unwrap();
    }

    #[test]
    fn test_search_restores_index_and_removes_transient_file() {
        let (dir, mut fb) = engine_with(&[("a.txt", "cats and dogs")]);
        fb.add_file("a.txt").unwrap();
        let before = fb.index().clone();

        fb.search("cats").unwrap();

        assert_eq!(fb.index(), &before);
        assert!(!dir.path().join(TMP_SEARCH_DOC).exists());
    }

    #[test]
    fn test_search_finds_morphological_variants() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cat"), ("b.txt", "dog")]);
        fb.add_file("a.txt").unwrap();
        fb.add_file("b.txt").unwrap();

        // "cats" stems to "cat", matching a.txt exactly
        let groups = fb.search("cats").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "cat");
        assert_eq!(groups[0].hits[0].name, "a.txt");
    }

    #[test]
    fn test_search_unknown_term_finds_nothing() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cat"), ("b.txt", "dog")]);
        fb.add_file("a.txt").unwrap();
        fb.add_file("b.txt").unwrap();

        assert!(fb.search("zzzzz").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_query_finds_nothing() {
        let (_dir, mut fb) = engine_with(&[("a.txt", "cat")]);
        fb.add_file("a.txt").unwrap();

        assert!(fb.search("").unwrap().is_empty());
        assert!(fb.search("!!! 123").unwrap().is_empty());
    }
}
