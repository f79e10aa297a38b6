//! Turn a downloadable vocabulary word list into flashcards for
//! spaced-repetition apps.
//!
//! The word list is a spreadsheet whose rows are (word, part of speech,
//! definition) triples. Two flashcard files are derived from it: one that
//! asks for the meaning of a word, and one that asks for the word matching a
//! meaning.

mod cards;
mod config;
mod convert;
mod fetch;
mod output;
mod pipeline;
mod progress;
mod rows;

use crate::{config::Config, progress::ProgressReport};
use clap::Parser;
use log::LevelFilter;
use std::{num::NonZeroU64, path::PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Build word → meaning and meaning → word flashcards from a vocabulary
/// spreadsheet
///
/// The spreadsheet is downloaded into the data directory, converted to CSV,
/// and turned into two delimited files that flashcard apps can import.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// URL of the word list spreadsheet export
    ///
    /// If not specified, the spreadsheet already present in the data
    /// directory is used.
    #[arg(long, default_value = None)]
    url: Option<Box<str>>,

    /// Do not download anything, even if an URL is specified
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Directory holding the spreadsheet, its CSV conversion and the
    /// flashcard files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Download timeout, in seconds
    #[arg(long, default_value = "10")]
    timeout: NonZeroU64,

    /// User-Agent header of the download request
    ///
    /// Some dictionary sites refuse to serve exports to clients that do not
    /// look like a web browser.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: Box<str>,

    /// Number of leading rows of the word list that are not words
    ///
    /// The exported spreadsheet starts with a header row and a metadata row.
    #[arg(short, long, default_value = "2")]
    skip_rows: usize,

    /// Drop the first rows of the sorted word list rather than the first rows
    /// of the file
    ///
    /// Older versions of this tool sorted the word list before discarding its
    /// first rows, which only removes the header rows if they sort first.
    #[arg(long, default_value_t = false)]
    skip_after_sort: bool,

    /// Emit one word → meaning card per definition instead of merging the
    /// definitions of each (word, part of speech) pair into a bullet list
    #[arg(long, default_value_t = false)]
    no_group: bool,

    /// Field delimiter of the flashcard files
    #[arg(long, default_value = "\t")]
    delimiter: char,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        let args = Args::parse();
        anyhow::ensure!(
            args.delimiter.is_ascii(),
            "the flashcard delimiter must be an ASCII character"
        );
        anyhow::ensure!(
            !matches!(args.delimiter, '"' | '\n' | '\r'),
            "the flashcard delimiter cannot be a quote or a line break"
        );
        Ok(args)
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    log::debug!("Starting with {args:?}");
    let config = Config::new(args);

    // Run the pipeline
    let report = ProgressReport::new();
    let summary = pipeline::run(config.clone(), &report).await?;
    drop(report);

    // Tell where the flashcards went
    {
        let stdout = tokio::io::stdout();
        let mut stdout = BufWriter::new(stdout);
        let paths = &config.paths;
        let mut lines = Vec::new();
        if let Some(bytes) = summary.downloaded_bytes {
            lines.push(format!("{}: {bytes} bytes downloaded", paths.spreadsheet.display()));
        }
        lines.push(format!(
            "{}: {} words kept out of {} rows",
            paths.converted.display(),
            summary.entries,
            summary.converted_rows
        ));
        for (path, count) in [
            (&paths.word_meaning, summary.word_meaning_cards),
            (&paths.meaning_word, summary.meaning_word_cards),
        ] {
            lines.push(format!("{}: {count} flashcards", path.display()));
        }
        for line in lines {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
    }
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// User-Agent of a desktop web browser
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
