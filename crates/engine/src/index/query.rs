//! TF-IDF scoring, ranking and result grouping
//!
//! Scoring runs against an index whose position 0 holds the transient query
//! document (the engine facade inserts and removes it). One pass over the
//! word list builds the sparse query vector; a second pass walks every
//! posting list in parallel with per-word cursors, computing each real
//! document's Euclidean distance to the query in a single sorted merge.
//!
//! A document is admitted only if it matched at least one query term and its
//! distance is strictly below the threshold, the distance from the query to
//! the zero vector. Admitted documents are ranked ascending by
//! `(distance, doc_id)`, truncated, and grouped by which query terms they
//! matched.

use filebase_core::types::{SearchGroup, SearchHit};

use super::IndexStore;

/// Upper bound on ranked documents returned by a query.
pub const MAX_SEARCH_RESULTS: usize = 10;

// ============================================================================
// TermMask
// ============================================================================

/// Growable bitset over query-term positions.
///
/// Records which query terms matched in a document; queries are not limited
/// to a machine word of distinct terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TermMask {
    blocks: Vec<u64>,
}

impl TermMask {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set bit `k`, growing the mask as needed.
    pub(crate) fn set(&mut self, k: usize) {
        let block = k / 64;
        if block >= self.blocks.len() {
            self.blocks.resize(block + 1, 0);
        }
        self.blocks[block] |= 1 << (k % 64);
    }

    /// Is bit `k` set?
    pub(crate) fn contains(&self, k: usize) -> bool {
        self.blocks
            .get(k / 64)
            .is_some_and(|block| block & (1 << (k % 64)) != 0)
    }

    /// True when no bit is set.
    pub(crate) fn is_empty(&self) -> bool {
        self.blocks.iter().all(|block| *block == 0)
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// One admitted document, before grouping.
#[derive(Debug, Clone)]
struct DocFound {
    doc_id: usize,
    dist: f64,
    mask: TermMask,
}

/// Score and rank every real document against the query document at
/// position 0, returning the grouped result.
pub(crate) fn rank(index: &IndexStore) -> Vec<SearchGroup> {
    let nr_docs = index.nr_docs();
    let words = index.words();

    // Pass 1: the sparse query vector, one cursor per word, and the list of
    // query-term stems in word-list order.
    let mut q_tfidf = Vec::with_capacity(words.len());
    let mut cursors = Vec::with_capacity(words.len());
    let mut term_position = Vec::with_capacity(words.len());
    let mut query_terms: Vec<&str> = Vec::new();
    let mut threshold_sq = 0.0;

    for word in words {
        let first = &word.postings[0];
        if first.doc_id == 0 {
            let weight = first.tf * idf(nr_docs, word.nr_docs());
            threshold_sq += weight * weight;
            q_tfidf.push(weight);
            cursors.push(1);
            term_position.push(Some(query_terms.len()));
            query_terms.push(word.stem.as_str());
        } else {
            q_tfidf.push(0.0);
            cursors.push(0);
            term_position.push(None);
        }
    }

    // The distance from the query to a document containing none of its terms.
    let threshold = threshold_sq.sqrt();

    // Pass 2: merge traversal over all posting lists at once.
    let mut found = Vec::new();
    for doc_id in 1..nr_docs {
        let mut dist_sq = 0.0;
        let mut mask = TermMask::new();

        for (wid, word) in words.iter().enumerate() {
            let cursor = cursors[wid];
            if word
                .postings
                .get(cursor)
                .is_some_and(|p| p.doc_id == doc_id)
            {
                let weight = word.postings[cursor].tf * idf(nr_docs, word.nr_docs());
                let delta = weight - q_tfidf[wid];
                dist_sq += delta * delta;
                if let Some(k) = term_position[wid] {
                    mask.set(k);
                }
                cursors[wid] += 1;
            } else {
                dist_sq += q_tfidf[wid] * q_tfidf[wid];
            }
        }

        let dist = dist_sq.sqrt();
        if !mask.is_empty() && dist < threshold {
            found.push(DocFound { doc_id, dist, mask });
        }
    }

    found.sort_by(|a, b| a.dist.total_cmp(&b.dist).then(a.doc_id.cmp(&b.doc_id)));
    found.truncate(MAX_SEARCH_RESULTS);

    group(&found, &query_terms, index)
}

/// Inverse document frequency with the corpus size taken over the index that
/// includes the query document itself.
fn idf(nr_docs: usize, word_docs: usize) -> f64 {
    (nr_docs as f64 / word_docs as f64).ln()
}

/// Collapse the ranked run into groups of consecutive documents that matched
/// the same term subset, labeling each group with the matched stems.
fn group(found: &[DocFound], query_terms: &[&str], index: &IndexStore) -> Vec<SearchGroup> {
    let mut groups: Vec<SearchGroup> = Vec::new();
    let mut last_mask: Option<&TermMask> = None;

    for doc in found {
        let hit = SearchHit {
            distance: doc.dist,
            name: index.documents()[doc.doc_id].name.clone(),
        };
        match groups.last_mut() {
            Some(group) if last_mask == Some(&doc.mask) => group.hits.push(hit),
            _ => {
                groups.push(SearchGroup {
                    label: mask_label(&doc.mask, query_terms),
                    hits: vec![hit],
                });
                last_mask = Some(&doc.mask);
            }
        }
    }

    groups
}

/// The matched stems, in word-list order, joined by `", "`.
fn mask_label(mask: &TermMask, query_terms: &[&str]) -> String {
    query_terms
        .iter()
        .enumerate()
        .filter(|(k, _)| mask.contains(*k))
        .map(|(_, stem)| *stem)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================
