//! HTTP surface of the bot: LINE webhook ingestion, presigned image links and
//! health checks.

pub mod envelope;
pub mod image_routes;
pub mod server;
pub mod state;
pub mod webhook_routes;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test_support;

pub use {
    envelope::ApiResponse,
    server::{build_dispatcher, build_gateway_app, start_gateway},
    state::AppState,
};
