//! Loading of word list rows from the converted CSV file

use crate::{config::Skip, Result};
use anyhow::Context;
use csv_async::AsyncReaderBuilder;
use futures::stream::StreamExt;
use rayon::prelude::*;
use std::path::Path;
use tokio::fs::File;

/// Row of the word list
///
/// Fields are declared in the order rows are sorted by.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WordEntry {
    /// Vocabulary word
    pub word: Box<str>,

    /// Part of speech, e.g. "n" or "adj"
    pub part_of_speech: Box<str>,

    /// Meaning of the word
    pub definition: Box<str>,
}
//
impl WordEntry {
    /// Build an entry from its three fields
    pub fn new(word: &str, part_of_speech: &str, definition: &str) -> Self {
        Self {
            word: word.into(),
            part_of_speech: part_of_speech.into(),
            definition: definition.into(),
        }
    }
}

/// Load the word list, drop non-data rows, and sort the rest
pub async fn load_sorted(csv: &Path, skip: Skip) -> Result<Vec<WordEntry>> {
    let entries = read_entries(csv).await?;
    log::info!("Read {} rows from {}", entries.len(), csv.display());
    Ok(sort_and_skip(entries, skip))
}

/// Read every row of a headerless three-column CSV file, in file order
pub async fn read_entries(csv: &Path) -> Result<Vec<WordEntry>> {
    let context = || format!("reading word list {}", csv.display());
    let file = File::open(csv).await.with_context(context)?;
    let mut records = AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .create_reader(file)
        .into_records();

    let mut entries = Vec::new();
    while let Some(record) = records.next().await {
        let record = record.with_context(context)?;
        let line = record.position().map_or(0, |pos| pos.line());
        let [word, part_of_speech, definition] = [0, 1, 2].map(|i| record.get(i));
        match (word, part_of_speech, definition, record.len()) {
            (Some(word), Some(part_of_speech), Some(definition), 3) => {
                entries.push(WordEntry::new(word, part_of_speech, definition));
            }
            (.., len) => anyhow::bail!(
                "line {line} of {} has {len} columns instead of 3",
                csv.display()
            ),
        }
    }
    Ok(entries)
}

/// Discard the leading non-data rows, and sort the remaining ones by word,
/// then part of speech, then definition
pub fn sort_and_skip(mut entries: Vec<WordEntry>, skip: Skip) -> Vec<WordEntry> {
    let Skip { rows, after_sort } = skip;
    let rows = rows.min(entries.len());
    if after_sort {
        entries.par_sort();
        let kept = entries.split_off(rows);
        for skipped in entries {
            log::debug!("Skipped sorted row {skipped:?}");
        }
        entries = kept;
    } else {
        for skipped in entries.drain(..rows) {
            log::debug!("Skipped leading row {skipped:?}");
        }
        entries.par_sort();
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    fn source_order() -> Vec<WordEntry> {
        vec![
            WordEntry::new("Word", "Part of speech", "Definition"),
            WordEntry::new("Nipun word list", "", ""),
            WordEntry::new("walk", "v", "to move slowly"),
            WordEntry::new("abate", "v", "to lessen"),
            WordEntry::new("run", "v", "to operate"),
        ]
    }

    #[tokio::test]
    async fn reads_rows_in_file_order() {
        let file = csv_file(
            "Word,Part of speech,Definition\n\
             run,v,\"to move fast, on foot\"\n\
             walk,v,\"to move\nslowly\"\n",
        );
        let entries = read_entries(file.path()).await.unwrap();
        assert_eq!(
            entries,
            vec![
                WordEntry::new("Word", "Part of speech", "Definition"),
                WordEntry::new("run", "v", "to move fast, on foot"),
                WordEntry::new("walk", "v", "to move\nslowly"),
            ]
        );
    }

    #[tokio::test]
    async fn wrong_column_count_is_an_error() {
        let file = csv_file("run,v,to move fast\nwalk,v\n");
        let err = read_entries(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("has 2 columns"), "{err}");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("missing.csv")).await.is_err());
    }

    #[test]
    fn skips_leading_rows_before_sorting() {
        let entries = sort_and_skip(
            source_order(),
            Skip {
                rows: 2,
                after_sort: false,
            },
        );
        assert_eq!(
            entries,
            vec![
                WordEntry::new("abate", "v", "to lessen"),
                WordEntry::new("run", "v", "to operate"),
                WordEntry::new("walk", "v", "to move slowly"),
            ]
        );
    }

    #[test]
    fn legacy_mode_skips_first_sorted_rows() {
        // Uppercase headers sort before lowercase words, "abate" sorts next
        let entries = sort_and_skip(
            source_order(),
            Skip {
                rows: 3,
                after_sort: true,
            },
        );
        assert_eq!(
            entries,
            vec![
                WordEntry::new("run", "v", "to operate"),
                WordEntry::new("walk", "v", "to move slowly"),
            ]
        );
    }

    #[test]
    fn sorts_by_full_tuple() {
        let entries = sort_and_skip(
            vec![
                WordEntry::new("run", "v", "to operate"),
                WordEntry::new("run", "n", "a jog"),
                WordEntry::new("run", "v", "to move fast"),
            ],
            Skip::default(),
        );
        assert_eq!(
            entries,
            vec![
                WordEntry::new("run", "n", "a jog"),
                WordEntry::new("run", "v", "to move fast"),
                WordEntry::new("run", "v", "to operate"),
            ]
        );
    }

    #[test]
    fn skipping_more_rows_than_available_empties_the_list() {
        let entries = sort_and_skip(
            source_order(),
            Skip {
                rows: 10,
                after_sort: false,
            },
        );
        assert!(entries.is_empty());
    }
}
