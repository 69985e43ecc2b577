use crate::libgeoguess::error::QuizError;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Fewest distinct labels a shuffled deck accepts: one correct answer plus three distractors.
pub const MIN_LABELS: usize = 4;

/// One landmark: the image showing it and the place name the player has to pick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizItem {
    #[serde(rename = "image")]
    pub reference: String,
    #[serde(rename = "place")]
    pub label: String,
}

impl QuizItem {
    #[cfg(test)]
    pub fn new(reference: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            label: label.into(),
        }
    }

    pub fn image_path(&self, asset_root: &Path) -> PathBuf {
        asset_root.join(&self.reference)
    }
}

#[derive(Debug, Clone)]
pub struct QuizDeck {
    items: Vec<QuizItem>,
    play_order: Vec<usize>,
    position: usize,
    score: usize,
}

impl QuizDeck {
    /// Builds a deck with a freshly shuffled play order.
    ///
    /// Fails with [`QuizError::InvalidDeck`] when a label or reference is repeated, or when
    /// there are fewer than [`MIN_LABELS`] items to draw distractors from.
    pub fn create<R: Rng + ?Sized>(items: Vec<QuizItem>, rng: &mut R) -> Result<Self, QuizError> {
        if items.len() < MIN_LABELS {
            return Err(QuizError::InvalidDeck(format!(
                "{} distinct labels given, at least {} are needed",
                items.len(),
                MIN_LABELS
            )));
        }
        let mut deck = Self::in_order(items)?;
        deck.play_order.shuffle(rng);
        debug!(
            "[Deck] Play order: {:?}",
            deck.play_order()
                .map(|item| item.label.as_str())
                .collect::<Vec<_>>()
        );
        Ok(deck)
    }

    /// Builds a deck that plays `items` in the order given. No minimum size applies.
    pub fn in_order(items: Vec<QuizItem>) -> Result<Self, QuizError> {
        validate(&items)?;
        Ok(Self {
            play_order: (0..items.len()).collect(),
            items,
            position: 0,
            score: 0,
        })
    }

    pub fn current_item(&self) -> Result<&QuizItem, QuizError> {
        match self.play_order.get(self.position) {
            Some(&idx) => Ok(&self.items[idx]),
            None => Err(QuizError::DeckExhausted),
        }
    }

    pub fn record_answer(&mut self, is_correct: bool) {
        if is_correct {
            self.score += 1;
        }
        debug!(
            "[Deck] Answer at {} was {}, score {}",
            self.position,
            if is_correct { "correct" } else { "incorrect" },
            self.score
        );
    }

    pub fn advance(&mut self) {
        if self.is_exhausted() {
            warn!("[Deck] advance() on an exhausted deck, ignoring");
            return;
        }
        self.position += 1;
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.play_order.len()
    }

    pub fn final_score(&self) -> usize {
        self.score
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Every label in the deck, in construction order. This is the distractor universe.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.label.as_str())
    }

    pub fn play_order(&self) -> impl Iterator<Item = &QuizItem> {
        self.play_order.iter().map(|&idx| &self.items[idx])
    }
}

fn validate(items: &[QuizItem]) -> Result<(), QuizError> {
    let mut labels = HashSet::with_capacity(items.len());
    let mut references = HashSet::with_capacity(items.len());
    for item in items {
        if !labels.insert(item.label.as_str()) {
            return Err(QuizError::InvalidDeck(format!(
                "label {:?} appears more than once",
                item.label
            )));
        }
        if !references.insert(item.reference.as_str()) {
            return Err(QuizError::InvalidDeck(format!(
                "image {:?} appears more than once",
                item.reference
            )));
        }
    }
    Ok(())
}
