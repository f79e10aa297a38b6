//! Flashcard file output

use crate::{cards::FlashcardRow, Result};
use anyhow::Context;
use csv_async::AsyncWriterBuilder;
use std::path::Path;
use tokio::fs::File;

/// Write flashcards as a headerless two-column delimited file
///
/// Fields containing the delimiter, quotes or line breaks (as multi-line
/// bullet lists do) are quoted so that flashcard apps import them as one
/// field.
pub async fn write_cards(path: &Path, cards: &[FlashcardRow], delimiter: u8) -> Result<()> {
    let context = || format!("writing flashcards to {}", path.display());
    let file = File::create(path).await.with_context(context)?;
    let mut writer = AsyncWriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .create_serializer(file);
    for card in cards {
        writer.serialize(card).await.with_context(context)?;
    }
    writer.flush().await.with_context(context)?;
    log::info!("Wrote {} flashcards to {}", cards.len(), path.display());
    Ok(())
}
