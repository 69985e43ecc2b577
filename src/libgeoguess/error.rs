use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid deck: {0}")]
    InvalidDeck(String),
    #[error("the deck has no more items")]
    DeckExhausted,
    #[error("need {required} distractors but only {available} other labels exist")]
    InsufficientDistractors { required: usize, available: usize },
    #[error("{option:?} is not one of the offered options")]
    UnknownOption { option: String },
    #[error("cannot handle `{event}` while {state}")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },
    #[error("malformed landmark data: {0}")]
    MalformedData(#[from] serde_json::Error),
}
