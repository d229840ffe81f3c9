//! Interactive shell for the filebase search engine
//!
//! A line-oriented prompt over [`Filebase`]. Engine failures are printed and
//! the prompt returns; nothing here terminates the process except `exit`
//! and end-of-input.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use commands::Command;
use filebase_engine::Filebase;

/// Persistent TF-IDF text search over a local document collection.
#[derive(Debug, Parser)]
#[command(name = "filebase", version)]
struct Args {
    /// Directory holding the filebase, index and stopwords files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stdout)
        .init();

    let args = Args::parse();
    let mut filebase = Filebase::open(&args.dir);
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline(" > ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Some(Command::Exit) => {
                println!("Exit requested..");
                break;
            }
            Some(Command::Rebuild) => {
                if let Err(err) = filebase.rebuild() {
                    println!("{err}");
                }
            }
            Some(Command::Search(query)) => run_search(&mut filebase, &query),
            Some(Command::Add(path)) => {
                if let Err(err) = filebase.add_file(&path) {
                    println!("{err}");
                }
            }
            Some(Command::Remove(path)) => {
                if let Err(err) = filebase.remove_file(&path) {
                    println!("{err}");
                }
            }
            None => {}
        }
    }

    Ok(())
}

/// Run one query and print the grouped result.
fn run_search(filebase: &mut Filebase, query: &str) {
    let groups = match filebase.search(query) {
        Ok(groups) => groups,
        Err(err) => {
            println!("{err}");
            return;
        }
    };

    println!(
        "Results (showing no more than {}, there might be more):",
        filebase_engine::MAX_SEARCH_RESULTS
    );
    if groups.is_empty() {
        println!("No documents found for search term {query}");
        return;
    }

    let mut count = 0usize;
    for group in &groups {
        println!("Documents containing {}:", group.label);
        for hit in &group.hits {
            println!(" [{count}] {hit}");
            count += 1;
        }
    }
}
