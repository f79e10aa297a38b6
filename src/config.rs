//! Processing pipeline configuration

use crate::Args;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Name of the downloaded spreadsheet within the data directory
pub const SPREADSHEET_FILE: &str = "nipun-word-list.xlsx";

/// Name of the comma-delimited conversion of the spreadsheet
pub const CONVERTED_FILE: &str = "nipun-word-list.csv";

/// Name of the word → meaning flashcard file
pub const WORD_MEANING_FILE: &str = "word-meaning.csv";

/// Name of the meaning → word flashcard file
pub const MEANING_WORD_FILE: &str = "meaning-word.csv";

/// Final process configuration
///
/// This is the result of digesting [`Args`]. Please refer to [`Args`] to know
/// more about common fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Where the word list should be fetched from, if anywhere
    pub source: Option<Source>,

    /// Location of every file read or written by the pipeline
    pub paths: Paths,

    /// How leading rows of the converted word list are discarded
    pub skip: Skip,

    /// Merge definitions sharing a (word, part of speech) key
    pub group_meanings: bool,

    /// Field delimiter of the flashcard files
    pub delimiter: u8,
}
//
impl Config {
    /// Determine process configuration from CLI arguments
    pub(crate) fn new(args: Args) -> Arc<Self> {
        let Args {
            url,
            offline,
            data_dir,
            timeout,
            user_agent,
            skip_rows,
            skip_after_sort,
            no_group,
            delimiter,
        } = args;
        let source = url.filter(|_| !offline).map(|url| Source {
            url,
            user_agent,
            timeout: Duration::from_secs(timeout.get()),
        });
        Arc::new(Self {
            source,
            paths: Paths::new(data_dir),
            skip: Skip {
                rows: skip_rows,
                after_sort: skip_after_sort,
            },
            group_meanings: !no_group,
            // Checked to be ASCII by Args::parse_and_check
            delimiter: delimiter as u8,
        })
    }
}

/// Remote word list export
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Source {
    /// URL of the spreadsheet export
    pub url: Box<str>,

    /// User-Agent header sent along with the request
    pub user_agent: Box<str>,

    /// Maximal duration of the whole request
    pub timeout: Duration,
}

/// Files of the pipeline
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub spreadsheet: PathBuf,
    pub converted: PathBuf,
    pub word_meaning: PathBuf,
    pub meaning_word: PathBuf,
}
//
impl Paths {
    /// Standard file names within a data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            spreadsheet: data_dir.join(SPREADSHEET_FILE),
            converted: data_dir.join(CONVERTED_FILE),
            word_meaning: data_dir.join(WORD_MEANING_FILE),
            meaning_word: data_dir.join(MEANING_WORD_FILE),
            data_dir,
        }
    }
}

/// Leading row removal policy
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Skip {
    /// Number of rows to discard
    pub rows: usize,

    /// Discard the first rows of the sorted sequence instead of the first rows
    /// of the file
    ///
    /// This is how older versions of the tool behaved. It only drops the
    /// header and metadata rows if they happen to sort before every word.
    pub after_sort: bool,
}
