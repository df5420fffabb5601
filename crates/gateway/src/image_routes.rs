//! `POST /s3/getImage`: time-limited download link for a saved image.

use {
    axum::{
        Json,
        extract::{State, rejection::JsonRejection},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    foodlens_storage::DEFAULT_PRESIGN_TTL,
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::{envelope::ApiResponse, state::AppState};

#[derive(Debug, Deserialize)]
pub struct GetImageRequest {
    /// Full object key as returned by an upload,
    /// e.g. `food-images/{user}/{YYYYMMDD_HHMMSS}.jpg`.
    #[serde(default)]
    pub s3_key: String,
}

pub async fn get_image(
    State(state): State<AppState>,
    body: Result<Json<GetImageRequest>, JsonRejection>,
) -> Response {
    let Some(store) = state.dispatcher.deps().object_store.clone() else {
        return ApiResponse::fail(StatusCode::SERVICE_UNAVAILABLE, "S3 未設定").into_response();
    };

    let key = match body {
        Ok(Json(req)) if !req.s3_key.trim().is_empty() => req.s3_key,
        Ok(_) => return missing_key(),
        Err(e) => {
            debug!(error = %e, "invalid getImage body");
            return missing_key();
        },
    };

    match store.presign_get(&key, DEFAULT_PRESIGN_TTL).await {
        Ok(url) => ApiResponse::ok("OK", serde_json::json!({ "url": url })).into_response(),
        Err(e) => {
            warn!(key = %key, error = %e, "failed to presign image url");
            ApiResponse::fail(StatusCode::INTERNAL_SERVER_ERROR, "產生圖片連結失敗")
                .into_response()
        },
    }
}

fn missing_key() -> Response {
    ApiResponse::fail(StatusCode::BAD_REQUEST, "s3_key 必填").into_response()
}
