//! `POST {webhook_path}`: LINE webhook ingestion.
//!
//! Events are handed to the dispatcher and the request is acknowledged right
//! away; per-event outcomes never change the HTTP response.

use {
    axum::{
        body::Bytes,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    foodlens_line::parse_webhook,
    tracing::{debug, warn},
};

use crate::{envelope::ApiResponse, state::AppState};

/// LINE webhook bodies are small; anything larger is not a webhook.
pub const MAX_WEBHOOK_BODY: usize = 1024 * 1024;

pub async fn line_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let events = match parse_webhook(&body) {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "rejecting malformed webhook body");
            return ApiResponse::fail(StatusCode::BAD_REQUEST, "invalid webhook body")
                .into_response();
        },
    };

    debug!(count = events.len(), "dispatching webhook events");
    state.dispatcher.handle(events);
    StatusCode::OK.into_response()
}
