//! Food recognition through a vision-capable completion endpoint.

pub mod error;
pub mod openai;
pub mod prompt;
pub mod response;

use async_trait::async_trait;

pub use {
    error::{Error, Result},
    openai::OpenAiRecognizer,
    prompt::{NO_FOOD_SENTINEL, RECOGNITION_PROMPT},
};

/// Outcome of one recognition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Delimiter-separated food names, or [`NO_FOOD_SENTINEL`].
    pub text: String,
    /// `false` when the model produced no extractable text.
    pub success: bool,
}

impl RecognitionResult {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let success = !text.is_empty();
        Self { text, success }
    }

    /// Whether the result names actual food, as opposed to being empty or
    /// the no-food sentinel.
    pub fn is_food_match(&self) -> bool {
        self.success && !self.text.is_empty() && self.text != NO_FOOD_SENTINEL
    }
}

/// Identify food items in a JPEG image.
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn recognize(&self, jpeg: &[u8]) -> Result<RecognitionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_not_a_match() {
        let r = RecognitionResult::from_text("無食物");
        assert!(r.success);
        assert!(!r.is_food_match());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let r = RecognitionResult::from_text("  無食物\n");
        assert_eq!(r.text, NO_FOOD_SENTINEL);
        assert!(!r.is_food_match());
    }

    #[test]
    fn empty_text_is_unsuccessful() {
        let r = RecognitionResult::from_text("   ");
        assert!(!r.success);
        assert!(!r.is_food_match());
    }

    #[test]
    fn food_list_matches() {
        let r = RecognitionResult::from_text("白飯、炒蛋、青菜");
        assert!(r.is_food_match());
        assert_eq!(r.text, "白飯、炒蛋、青菜");
    }
}
