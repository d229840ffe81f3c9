//! Public facade for the filebase workspace.
//!
//! Re-exports the engine and its data model under one crate, so embedders
//! depend on `filebase` alone:
//!
//! ```no_run
//! use filebase::Filebase;
//!
//! let mut fb = Filebase::open(".");
//! fb.add_file("a.txt")?;
//! for group in fb.search("cats and dogs")? {
//!     println!("Documents containing {}:", group.label);
//!     for hit in &group.hits {
//!         println!("{hit}");
//!     }
//! }
//! # Ok::<(), filebase::Error>(())
//! ```

// ============================================================================
// Public API types - these are what embedders should use
// ============================================================================

// The engine facade
pub use filebase_engine::Filebase;

// Well-known file names and limits
pub use filebase_engine::{
    FILEBASE_FILE, INDEX_FILE, MAX_SEARCH_RESULTS, STOPWORDS_FILE, TMP_SEARCH_DOC,
};

// Data model
pub use filebase_core::types::{DocumentEntry, IndexedWord, Posting, SearchGroup, SearchHit};

// Errors
pub use filebase_core::error::{Error, Result};

// Text analysis, for embedders that pre-process their own corpora
pub use filebase_engine::search::{stem, tokenize};
