use crate::libgeoguess::deck::QuizItem;
use crate::libgeoguess::error::QuizError;
use log::debug;
use serde::Deserialize;

const LANDMARKS_JSON: &str = include_str!("../../assets/landmarks.json");

#[derive(Deserialize, Debug)]
struct LandmarksJson {
    landmarks: Vec<QuizItem>,
}

/// The built-in set of ten landmarks the game ships with.
pub fn reference_items() -> Result<Vec<QuizItem>, QuizError> {
    parse(LANDMARKS_JSON)
}

fn parse(json: &str) -> Result<Vec<QuizItem>, QuizError> {
    let content: LandmarksJson = serde_json::from_str(json)?;
    debug!("[Setup] Loaded {} landmarks", content.landmarks.len());
    Ok(content.landmarks)
}
