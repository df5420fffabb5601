//! Image event workflow: fetch, normalize, recognize.

use {
    foodlens_media::normalize_for_recognition,
    foodlens_vision::RecognitionResult,
    tokio::time::timeout,
    tracing::{debug, info},
};

use crate::{dispatcher::BotDeps, error::HandlerError, replies};

/// What to tell the user after a completed recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionReply {
    pub text: String,
    /// A genuine food match; only these may be saved later.
    pub eligible_for_save: bool,
}

impl From<RecognitionResult> for RecognitionReply {
    fn from(result: RecognitionResult) -> Self {
        if result.is_food_match() {
            Self {
                text: result.text,
                eligible_for_save: true,
            }
        } else {
            Self {
                text: replies::NOT_RECOGNIZED.to_string(),
                eligible_for_save: false,
            }
        }
    }
}

/// Run the recognition pipeline for one uploaded image.
pub async fn recognize_image(
    deps: &BotDeps,
    user_id: &str,
    content_id: &str,
) -> Result<RecognitionReply, HandlerError> {
    let content = deps
        .fetcher
        .fetch(content_id)
        .await
        .map_err(HandlerError::fetch)?;
    debug!(
        user_id,
        content_id,
        bytes = content.data.len(),
        "fetched image content"
    );

    let data = content.data;
    let image = tokio::task::spawn_blocking(move || normalize_for_recognition(&data))
        .await
        .map_err(HandlerError::decode)?
        .map_err(HandlerError::decode)?;
    debug!(
        user_id,
        width = image.width,
        height = image.height,
        resized = image.was_resized(),
        "normalized image"
    );

    let result = timeout(
        deps.settings.recognition_timeout,
        deps.recognizer.recognize(&image.data),
    )
    .await
    .map_err(HandlerError::recognition)?
    .map_err(HandlerError::recognition)?;

    let reply = RecognitionReply::from(result);
    info!(
        user_id,
        food = %reply.text,
        eligible = reply.eligible_for_save,
        "image recognized"
    );
    Ok(reply)
}
