use crate::libgeoguess::error::QuizError;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

pub const CHOICES: usize = 4;
const DISTRACTORS: usize = CHOICES - 1;

/// The four labels shown for one round, exactly one of them correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    labels: [String; CHOICES],
    correct: usize,
}

impl OptionSet {
    pub fn labels(&self) -> &[String; CHOICES] {
        &self.labels
    }

    pub fn correct_index(&self) -> usize {
        self.correct
    }

    pub fn correct_label(&self) -> &str {
        &self.labels[self.correct]
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn is_correct(&self, label: &str) -> bool {
        self.correct_label() == label
    }
}

/// Picks three distractors for `correct_label` out of `universe` and hides the correct label
/// at a random slot.
///
/// Every label in the universe other than the correct one is a candidate, so a distractor can
/// show up again in later rounds. Duplicate labels in `universe` count once.
///
/// # Errors
/// Returns [`QuizError::InsufficientDistractors`] when fewer than three other labels exist.
pub fn generate<'a, R: Rng + ?Sized>(
    correct_label: &str,
    universe: impl IntoIterator<Item = &'a str>,
    rng: &mut R,
) -> Result<OptionSet, QuizError> {
    // BTreeSet keeps the pool order stable so seeded runs repeat exactly.
    let mut pool: Vec<&str> = universe
        .into_iter()
        .filter(|label| *label != correct_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if pool.len() < DISTRACTORS {
        return Err(QuizError::InsufficientDistractors {
            required: DISTRACTORS,
            available: pool.len(),
        });
    }

    pool.shuffle(rng);
    pool.truncate(DISTRACTORS);

    let correct = rng.random_range(0..CHOICES);
    let mut distractors = pool.into_iter();
    let labels: [String; CHOICES] = std::array::from_fn(|slot| {
        if slot == correct {
            correct_label.to_string()
        } else {
            // `truncate` left exactly one distractor per remaining slot.
            distractors.next().unwrap_or_default().to_string()
        }
    });
    debug!("[Options] {:?}, correct at {}", labels, correct);

    Ok(OptionSet { labels, correct })
}
