//! Save workflow: persist the user's last recognized image.

use {
    tokio::time::timeout,
    tracing::{debug, info},
};

use crate::{dispatcher::BotDeps, error::HandlerError};

/// Outcome of a save command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No live context for the user.
    NothingToSave,
    /// Stored under `key`.
    Saved { key: String },
}

/// Whether `text` asks to save, by case-insensitive substring match.
pub fn is_save_command(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .any(|k| text.contains(&k.to_lowercase()))
}

/// Re-download the image behind the user's context and upload it.
///
/// The context is left in place, so a second save within the TTL stores
/// another copy under a new key.
pub async fn save_last_image(deps: &BotDeps, user_id: &str) -> Result<SaveOutcome, HandlerError> {
    let Some(ctx) = deps.contexts.get(user_id).await else {
        debug!(user_id, "save requested without image context");
        return Ok(SaveOutcome::NothingToSave);
    };
    let Some(store) = deps.object_store.as_ref() else {
        return Err(HandlerError::StorageUnavailable);
    };

    let content = timeout(
        deps.settings.save_fetch_timeout,
        deps.fetcher.fetch(&ctx.content_id),
    )
    .await
    .map_err(HandlerError::fetch)?
    .map_err(HandlerError::fetch)?;

    let content_type = content.content_type_or_jpeg().to_string();
    let key = timeout(
        deps.settings.upload_timeout,
        store.upload(user_id, content.data, &content_type),
    )
    .await
    .map_err(HandlerError::upload)?
    .map_err(HandlerError::upload)?;

    info!(user_id, key = %key, content_type = %content_type, "image saved");
    Ok(SaveOutcome::Saved { key })
}
