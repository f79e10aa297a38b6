//! Projection of word list rows into flashcards

use crate::rows::WordEntry;
use serde::Serialize;
use std::fmt;

/// Flashcard, as written to the output files
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct FlashcardRow {
    /// Side of the card that is shown first
    pub front: Box<str>,

    /// Side of the card that must be recalled
    pub back: Box<str>,
}
//
impl FlashcardRow {
    /// Build a flashcard from its two sides
    pub fn new(front: impl Into<Box<str>>, back: impl Into<Box<str>>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// (word, part of speech) pair, which identifies one sense of a word
///
/// Displayed as `(part_of_speech) word`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GroupKey<'entry> {
    /// Vocabulary word
    pub word: &'entry str,

    /// Part of speech
    pub part_of_speech: &'entry str,
}
//
impl<'entry> From<&'entry WordEntry> for GroupKey<'entry> {
    fn from(entry: &'entry WordEntry) -> Self {
        Self {
            word: &entry.word,
            part_of_speech: &entry.part_of_speech,
        }
    }
}
//
impl fmt::Display for GroupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.part_of_speech, self.word)
    }
}

/// Build word → meaning flashcards, one per (word, part of speech) key
///
/// Entries must be sorted by word then part of speech, as done by
/// [`sort_and_skip()`](crate::rows::sort_and_skip): only consecutive entries
/// with the same key are merged together.
pub fn word_meaning_cards(entries: &[WordEntry]) -> Vec<FlashcardRow> {
    debug_assert!(
        entries
            .windows(2)
            .all(|pair| GroupKey::from(&pair[0]) <= GroupKey::from(&pair[1])),
        "entries should be sorted by (word, part of speech)"
    );
    let mut builder = MeaningGroupBuilder::new();
    for entry in entries {
        builder.add_entry(entry);
    }
    builder.finish()
}

/// Build word → meaning flashcards without merging, one per entry
pub fn ungrouped_word_meaning_cards(entries: &[WordEntry]) -> Vec<FlashcardRow> {
    entries
        .iter()
        .map(|entry| FlashcardRow::new(GroupKey::from(entry).to_string(), &*entry.definition))
        .collect()
}

/// Build meaning → word flashcards, one per entry
///
/// Words sharing a definition and part of speech yield distinct cards.
pub fn meaning_word_cards(entries: &[WordEntry]) -> Vec<FlashcardRow> {
    entries
        .iter()
        .map(|entry| {
            FlashcardRow::new(
                format!("({}) {}", entry.part_of_speech, entry.definition),
                &*entry.word,
            )
        })
        .collect()
}

/// Accumulator of word → meaning flashcards
///
/// Definitions are merged into the current card as long as the incoming
/// entries share its key.
#[derive(Debug, Default)]
struct MeaningGroupBuilder<'entries> {
    /// Last seen key, if any, and the definitions accumulated for it
    current_key_and_meanings: Option<(GroupKey<'entries>, Vec<&'entries str>)>,

    /// Cards from previous keys
    cards: Vec<FlashcardRow>,
}
//
impl<'entries> MeaningGroupBuilder<'entries> {
    /// Set up the accumulator
    fn new() -> Self {
        Self::default()
    }

    /// Integrate a new word list entry
    fn add_entry(&mut self, entry: &'entries WordEntry) {
        let key = GroupKey::from(entry);
        if let Some((current_key, meanings)) = &mut self.current_key_and_meanings {
            if *current_key == key {
                log::trace!("Merging definition {:?} into {key}", entry.definition);
                meanings.push(&entry.definition);
                return;
            }
        }
        self.switch_key(Some((key, vec![&*entry.definition])));
    }

    /// Emit the last card and return all cards
    fn finish(mut self) -> Vec<FlashcardRow> {
        self.switch_key(None);
        self.cards
    }

    /// Turn the current key into a card and switch to a different key (or
    /// none at all)
    fn switch_key(&mut self, new_key_and_meanings: Option<(GroupKey<'entries>, Vec<&'entries str>)>) {
        if let Some((former_key, meanings)) =
            std::mem::replace(&mut self.current_key_and_meanings, new_key_and_meanings)
        {
            self.cards
                .push(FlashcardRow::new(former_key.to_string(), render_meanings(&meanings)));
        }
    }
}

/// Render the definitions of a word sense
///
/// A lone definition is kept as-is, several definitions become a bullet list
/// with one definition per line. Every definition of a list gets its own
/// bullet, even one that already starts with "-": definitions `-x` and `y`
/// render as `- -x\n- y`, not `-x\n- y`.
fn render_meanings(meanings: &[&str]) -> String {
    match meanings {
        [single] => (*single).to_owned(),
        several => several
            .iter()
            .map(|meaning| format!("- {meaning}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
