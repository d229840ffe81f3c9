//! Core types for the filebase workspace
//!
//! This crate holds the data model shared by the engine and the shell:
//! - `types`: postings, indexed words, document table entries, search results
//! - `error`: the workspace-wide error enum and `Result` alias

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{DocumentEntry, IndexedWord, Posting, SearchGroup, SearchHit};
