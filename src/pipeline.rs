//! Word list → flashcards processing pipeline

use crate::{
    cards,
    config::Config,
    convert, fetch, output,
    progress::{ProgressConfig, ProgressReport, Work},
    rows, Result,
};
use anyhow::Context;
use std::sync::Arc;

/// What the pipeline produced
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Summary {
    /// Size of the downloaded spreadsheet, if it was downloaded
    pub downloaded_bytes: Option<u64>,

    /// Rows of the converted spreadsheet, header rows included
    pub converted_rows: usize,

    /// Word list entries left after dropping non-data rows
    pub entries: usize,

    /// Cards written to the word → meaning file
    pub word_meaning_cards: usize,

    /// Cards written to the meaning → word file
    pub meaning_word_cards: usize,
}

/// Download the word list, convert it and write both flashcard files
///
/// Stages run one after another, each one consuming the whole output of the
/// previous one. A failed download stops the pipeline before any file derived
/// from the spreadsheet is rewritten.
pub async fn run(config: Arc<Config>, report: &ProgressReport) -> Result<Summary> {
    let paths = &config.paths;
    let num_steps = if config.source.is_some() { 3 } else { 2 };
    let steps = report.add("Building flashcards", ProgressConfig::new(Work::Steps(num_steps)));
    let mut summary = Summary::default();

    tokio::fs::create_dir_all(&paths.data_dir)
        .await
        .with_context(|| format!("setting up data directory {}", paths.data_dir.display()))?;

    // Fetch the word list
    if let Some(source) = &config.source {
        steps.set_message("downloading");
        let client = fetch::make_client(source)?;
        summary.downloaded_bytes =
            Some(fetch::download(source, &client, &paths.spreadsheet, report).await?);
        steps.make_progress(1);
    } else {
        log::info!(
            "No download requested, using existing {}",
            paths.spreadsheet.display()
        );
    }

    // Convert it to CSV
    steps.set_message("converting");
    summary.converted_rows = convert::spreadsheet_to_csv(&paths.spreadsheet, &paths.converted).await?;
    steps.make_progress(1);

    // Turn the data rows into flashcards
    steps.set_message("writing flashcards");
    let CardCounts {
        entries,
        word_meaning,
        meaning_word,
    } = write_flashcards(&config).await?;
    summary.entries = entries;
    summary.word_meaning_cards = word_meaning;
    summary.meaning_word_cards = meaning_word;
    steps.make_progress(1);

    log::info!("Pipeline finished: {summary:?}");
    Ok(summary)
}

/// Number of rows going through the flashcard stage
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CardCounts {
    /// Word list entries left after dropping non-data rows
    pub entries: usize,

    /// Cards written to the word → meaning file
    pub word_meaning: usize,

    /// Cards written to the meaning → word file
    pub meaning_word: usize,
}

/// Load the converted word list and write both flashcard files
pub async fn write_flashcards(config: &Config) -> Result<CardCounts> {
    let paths = &config.paths;
    let entries = rows::load_sorted(&paths.converted, config.skip).await?;

    let word_meaning = if config.group_meanings {
        cards::word_meaning_cards(&entries)
    } else {
        cards::ungrouped_word_meaning_cards(&entries)
    };
    output::write_cards(&paths.word_meaning, &word_meaning, config.delimiter).await?;

    let meaning_word = cards::meaning_word_cards(&entries);
    output::write_cards(&paths.meaning_word, &meaning_word, config.delimiter).await?;

    Ok(CardCounts {
        entries: entries.len(),
        word_meaning: word_meaning.len(),
        meaning_word: meaning_word.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Paths, Skip, Source};
    use std::time::Duration;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    fn offline_config(dir: &std::path::Path) -> Arc<Config> {
        Arc::new(Config {
            source: None,
            paths: Paths::new(dir.join("data")),
            skip: Skip {
                rows: 2,
                after_sort: false,
            },
            group_meanings: true,
            delimiter: b'\t',
        })
    }

    #[tokio::test]
    async fn missing_spreadsheet_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        let result = run(config.clone(), &ProgressReport::new()).await;

        assert!(result.is_err());
        assert!(config.paths.data_dir.is_dir());
        assert!(!config.paths.word_meaning.exists());
        assert!(!config.paths.meaning_word.exists());
    }

    #[tokio::test]
    async fn failed_download_keeps_previous_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = (*offline_config(dir.path())).clone();
        config.source = Some(Source {
            url: format!("{}/export.xlsx", server.uri()).into(),
            user_agent: "Mozilla/5.0 (test)".into(),
            timeout: Duration::from_secs(10),
        });
        std::fs::create_dir_all(&config.paths.data_dir).unwrap();
        std::fs::write(&config.paths.converted, "old,csv,file\n").unwrap();

        let result = run(Arc::new(config.clone()), &ProgressReport::new()).await;

        assert!(result.is_err());
        assert!(!config.paths.spreadsheet.exists());
        assert_eq!(
            std::fs::read_to_string(&config.paths.converted).unwrap(),
            "old,csv,file\n"
        );
        assert!(!config.paths.word_meaning.exists());
    }

    #[tokio::test]
    async fn offline_run_builds_flashcards_from_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        std::fs::create_dir_all(&config.paths.data_dir).unwrap();
        convert::tests::text_workbook(&[
            &["Word", "Part of speech", "Definition"],
            &["Nipun word list"],
            &["walk", "v", "to move slowly"],
            &["run", "v", "to operate"],
            &["run", "v", "to move, fast"],
        ])
        .save(&config.paths.spreadsheet)
        .unwrap();

        let summary = run(config.clone(), &ProgressReport::new()).await.unwrap();

        assert_eq!(
            summary,
            Summary {
                downloaded_bytes: None,
                converted_rows: 5,
                entries: 3,
                word_meaning_cards: 2,
                meaning_word_cards: 3,
            }
        );
        assert_eq!(
            std::fs::read_to_string(&config.paths.converted).unwrap(),
            "Word,Part of speech,Definition\n\
             Nipun word list,,\n\
             walk,v,to move slowly\n\
             run,v,to operate\n\
             run,v,\"to move, fast\"\n"
        );
        assert_eq!(
            std::fs::read_to_string(&config.paths.word_meaning).unwrap(),
            "(v) run\t\"- to move, fast\n- to operate\"\n\
             (v) walk\tto move slowly\n"
        );
        assert_eq!(
            std::fs::read_to_string(&config.paths.meaning_word).unwrap(),
            "(v) to move, fast\trun\n\
             (v) to operate\trun\n\
             (v) to move slowly\twalk\n"
        );
    }

    const CONVERTED: &str = "Word,Part of speech,Definition\n\
                             Nipun word list,,\n\
                             walk,v,to move slowly\n\
                             run,v,to operate\n\
                             run,v,to move fast\n";

    fn write_converted(config: &Config) {
        std::fs::create_dir_all(&config.paths.data_dir).unwrap();
        std::fs::write(&config.paths.converted, CONVERTED).unwrap();
    }

    #[tokio::test]
    async fn writes_both_flashcard_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());
        write_converted(&config);

        let counts = write_flashcards(&config).await.unwrap();

        assert_eq!(
            counts,
            CardCounts {
                entries: 3,
                word_meaning: 2,
                meaning_word: 3,
            }
        );
        assert_eq!(
            std::fs::read_to_string(&config.paths.word_meaning).unwrap(),
            "(v) run\t\"- to move fast\n- to operate\"\n\
             (v) walk\tto move slowly\n"
        );
        assert_eq!(
            std::fs::read_to_string(&config.paths.meaning_word).unwrap(),
            "(v) to move fast\trun\n\
             (v) to operate\trun\n\
             (v) to move slowly\twalk\n"
        );
    }

    #[tokio::test]
    async fn ungrouped_mode_keeps_one_card_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = (*offline_config(dir.path())).clone();
        config.group_meanings = false;
        write_converted(&config);

        let counts = write_flashcards(&config).await.unwrap();

        assert_eq!(counts.word_meaning, 3);
        assert_eq!(
            std::fs::read_to_string(&config.paths.word_meaning).unwrap(),
            "(v) run\tto move fast\n\
             (v) run\tto operate\n\
             (v) walk\tto move slowly\n"
        );
    }
}
