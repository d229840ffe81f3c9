//! Engine integration tests
//!
//! These validate the full engine lifecycle end-to-end:
//! - open over an empty directory, add documents, persist
//! - restart and recover the index from the persisted files
//! - mutate after recovery and query across the whole corpus

use std::fs;

use tempfile::TempDir;

use filebase_engine::{Filebase, FILEBASE_FILE, INDEX_FILE, STOPWORDS_FILE};

/// Write documents, restart the engine, and keep working on the recovered
/// index.
#[test]
fn test_end_to_end_write_restart_mutate() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STOPWORDS_FILE), "the\nof\n").unwrap();
    fs::write(dir.path().join("fauna.txt"), "chased chasing chases").unwrap();
    fs::write(dir.path().join("flora.txt"), "trees of the forest").unwrap();
    fs::write(dir.path().join("rocks.txt"), "stones and pebbles").unwrap();

    // Phase 1: build the index
    {
        let mut fb = Filebase::open(dir.path());
        fb.add_file("fauna.txt").unwrap();
        fb.add_file("flora.txt").unwrap();
        fb.add_file("rocks.txt").unwrap();

        assert_eq!(fb.index().nr_docs(), 3);
        fb.index().validate().unwrap();
    }

    // Phase 2: reopen and verify the recovered state
    let mut fb = Filebase::open(dir.path());
    assert_eq!(fb.index().nr_docs(), 3);
    fb.index().validate().unwrap();

    let names: Vec<_> = fb
        .index()
        .documents()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["fauna.txt", "flora.txt", "rocks.txt"]);

    // "the" and "of" were stopwords; all of fauna.txt collapses to "chase"
    let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.as_str()).collect();
    assert_eq!(
        stems,
        vec!["and", "chase", "forest", "pebbl", "stone", "tree"]
    );

    // Phase 3: mutate the recovered index
    fb.remove_file("flora.txt").unwrap();
    assert_eq!(fb.index().nr_docs(), 2);
    assert!(fb.index().words().iter().all(|w| w.stem != "forest"));
    fb.index().validate().unwrap();

    // Phase 4: query the survivors; fauna.txt is a pure match at distance 0
    let groups = fb.search("chased").unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "chase");
    assert_eq!(groups[0].hits[0].to_string(), "00.00000 fauna.txt");

    assert!(fb.search("granite").unwrap().is_empty());
}

/// A rebuild after document files changed on disk re-derives the index from
/// the current contents while keeping the table.
#[test]
fn test_rebuild_tracks_changed_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STOPWORDS_FILE), "").unwrap();
    fs::write(dir.path().join("a.txt"), "cats").unwrap();

    let mut fb = Filebase::open(dir.path());
    fb.add_file("a.txt").unwrap();
    assert_eq!(fb.index().words()[0].stem, "cat");

    fs::write(dir.path().join("a.txt"), "dogs dogs").unwrap();
    fb.rebuild().unwrap();

    let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.as_str()).collect();
    assert_eq!(stems, vec!["dog"]);
    assert_eq!(fb.index().documents()[0].nr_words, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap(),
        "dog:1:0/1.000000\n"
    );
}

/// Opening over a directory with no persisted state starts empty and the
/// first add creates both files.
#[test]
fn test_cold_open_then_first_add_creates_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STOPWORDS_FILE), "").unwrap();
    fs::write(dir.path().join("solo.txt"), "lonely words").unwrap();

    let mut fb = Filebase::open(dir.path());
    assert_eq!(fb.index().nr_docs(), 0);

    fb.add_file("solo.txt").unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join(FILEBASE_FILE)).unwrap(),
        "solo.txt|2\n"
    );
    assert!(dir.path().join(INDEX_FILE).exists());
}

/// Damaged persisted files degrade to whatever still parses instead of
/// failing the open.
#[test]
fn test_open_survives_damaged_index_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STOPWORDS_FILE), "").unwrap();
    fs::write(dir.path().join(FILEBASE_FILE), "a.txt|1\nb.txt|1\n").unwrap();
    fs::write(
        dir.path().join(INDEX_FILE),
        "cat:1:0/1.000000\n<<<garbage>>>\ndog:1:1/1.000000\n",
    )
    .unwrap();

    let fb = Filebase::open(dir.path());
    assert_eq!(fb.index().nr_docs(), 2);
    let stems: Vec<_> = fb.index().words().iter().map(|w| w.stem.as_str()).collect();
    assert_eq!(stems, vec!["cat", "dog"]);
    fb.index().validate().unwrap();
}
