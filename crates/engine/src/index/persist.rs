//! On-disk form of the index
//!
//! Two line-oriented text files in the engine directory:
//!
//! - `filebase`: one document per line, `<name>|<nr_words>`, in table order.
//! - `index`: one indexed word per line,
//!   `<stem>:<nr_docs>:<id>/<tf>|<id>/<tf>|...`, postings in ascending id
//!   order, tf printed with six fractional digits.
//!
//! Loading degrades instead of failing: a missing `filebase` yields an empty
//! store, a missing `index` yields a document-only store, and malformed
//! lines are skipped, each with a warning. Saving rewrites both files whole.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use filebase_core::types::{DocumentEntry, IndexedWord, Posting};

use super::IndexStore;

/// Name of the document table file inside the engine directory.
pub const FILEBASE_FILE: &str = "filebase";

/// Name of the inverted index file inside the engine directory.
pub const INDEX_FILE: &str = "index";

// ============================================================================
// Save
// ============================================================================

/// Rewrite both persistence files from the in-memory store.
pub fn save(store: &IndexStore, dir: &Path) -> io::Result<()> {
    write_filebase(store, &dir.join(FILEBASE_FILE))?;
    write_index(store, &dir.join(INDEX_FILE))?;
    Ok(())
}

fn write_filebase(store: &IndexStore, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for doc in store.documents() {
        writeln!(out, "{}|{}", doc.name, doc.nr_words)?;
    }
    out.flush()
}

fn write_index(store: &IndexStore, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for word in store.words() {
        write!(out, "{}:{}:", word.stem, word.nr_docs())?;
        for (i, posting) in word.postings.iter().enumerate() {
            if i > 0 {
                write!(out, "|")?;
            }
            write!(out, "{}/{:.6}", posting.doc_id, posting.tf)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

// ============================================================================
// Load
// ============================================================================

/// Load the persisted index from `dir`, degrading to an empty or
/// document-only store when files are missing or damaged.
pub fn load(dir: &Path) -> IndexStore {
    let documents = match std::fs::read_to_string(dir.join(FILEBASE_FILE)) {
        Ok(contents) => parse_filebase(&contents),
        Err(err) => {
            warn!(error = %err, "filebase file not found; index not loaded");
            return IndexStore::new();
        }
    };

    let words = match std::fs::read_to_string(dir.join(INDEX_FILE)) {
        Ok(contents) => parse_index(&contents, documents.len()),
        Err(err) => {
            warn!(error = %err, "index file not found; index not loaded");
            Vec::new()
        }
    };

    IndexStore::from_parts(words, documents)
}

fn parse_filebase(contents: &str) -> Vec<DocumentEntry> {
    let mut documents = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse_filebase_line(line) {
            Some(doc) => documents.push(doc),
            None => warn!(lineno = lineno + 1, line, "skipping malformed filebase line"),
        }
    }
    documents
}

fn parse_filebase_line(line: &str) -> Option<DocumentEntry> {
    let (name, nr_words) = line.rsplit_once('|')?;
    if name.is_empty() {
        return None;
    }
    Some(DocumentEntry {
        name: name.to_string(),
        nr_words: nr_words.parse().ok()?,
    })
}

fn parse_index(contents: &str, nr_docs: usize) -> Vec<IndexedWord> {
    let mut words = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse_index_line(line, nr_docs) {
            Some(word) => words.push(word),
            None => warn!(lineno = lineno + 1, line, "skipping malformed index line"),
        }
    }
    words
}

fn parse_index_line(line: &str, nr_docs: usize) -> Option<IndexedWord> {
    let (stem, rest) = line.split_once(':')?;
    if stem.is_empty() {
        return None;
    }
    let (count, posting_list) = rest.split_once(':')?;
    let declared: usize = count.parse().ok()?;

    let mut postings = Vec::with_capacity(declared);
    for part in posting_list.split('|') {
        let (id, tf) = part.split_once('/')?;
        let doc_id: usize = id.parse().ok()?;
        if doc_id >= nr_docs {
            return None;
        }
        postings.push(Posting::new(doc_id, tf.parse().ok()?));
    }
    if postings.is_empty() {
        return None;
    }
    if postings.len() != declared {
        warn!(
            stem,
            declared,
            actual = postings.len(),
            "index line document count disagrees with its posting list"
        );
    }

    Some(IndexedWord {
        stem: stem.to_string(),
        postings,
    })
}

// ============================================================================
// Tests
// ============================================================================
