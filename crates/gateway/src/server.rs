use std::sync::Arc;

use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        response::IntoResponse,
        routing::{get, post},
    },
    foodlens_bot::{BotDeps, BotSettings, Dispatcher, InMemoryContextStore},
    foodlens_config::{FoodlensConfig, Severity, validate},
    foodlens_line::{LineClient, LineConfig},
    foodlens_storage::{ObjectStore, S3Config, S3ObjectStore},
    foodlens_vision::OpenAiRecognizer,
    tower_http::trace::TraceLayer,
    tracing::{error, info, warn},
};

use crate::{
    envelope::ApiResponse, image_routes::get_image, state::AppState,
    webhook_routes::{MAX_WEBHOOK_BODY, line_webhook},
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the router (shared between production startup and tests).
pub fn build_gateway_app(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route(webhook_path, post(line_webhook))
        .route("/s3/getImage", post(get_image))
        .layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the LINE client, recognizer and optional object store into a
/// dispatcher.
pub fn build_dispatcher(config: &FoodlensConfig) -> anyhow::Result<Dispatcher> {
    let line = Arc::new(LineClient::new(LineConfig {
        channel_access_token: config.line.channel_access_token.clone(),
        api_base: config.line.api_base.clone(),
        data_api_base: config.line.data_api_base.clone(),
        timeout: config.line.timeout(),
    })?);

    let recognizer = OpenAiRecognizer::new(
        config.vision.api_key.clone(),
        config.vision.model.clone(),
        config.vision.base_url.clone(),
        config.vision.timeout(),
    )?;

    let object_store: Option<Arc<dyn ObjectStore>> = match &config.storage {
        Some(storage) => {
            let s3 = S3ObjectStore::new(S3Config {
                bucket: storage.bucket.clone(),
                region: storage.region.clone(),
                access_key_id: storage.access_key_id.clone(),
                secret_access_key: storage.secret_access_key.clone(),
                endpoint: storage.endpoint.clone(),
                key_prefix: storage.key_prefix.clone(),
                timeout: storage.upload_timeout(),
            });
            match s3 {
                Ok(s3) => Some(Arc::new(s3)),
                Err(e) => {
                    warn!(error = %e, "object storage disabled");
                    None
                },
            }
        },
        None => None,
    };

    let upload_timeout = config
        .storage
        .as_ref()
        .map(|s| s.upload_timeout())
        .unwrap_or_else(|| BotSettings::default().upload_timeout);

    Ok(Dispatcher::new(BotDeps {
        replies: line.clone(),
        fetcher: line,
        recognizer: Arc::new(recognizer),
        object_store,
        contexts: Arc::new(InMemoryContextStore::new()),
        settings: BotSettings {
            save_keywords: config.bot.save_keywords.clone(),
            recognition_timeout: config.vision.timeout(),
            save_fetch_timeout: config.bot.save_fetch_timeout(),
            upload_timeout,
        },
    }))
}

/// Validate `config`, start the HTTP server and run until a shutdown signal.
///
/// On shutdown the listener stops first, then in-flight event handlers are
/// cancelled and awaited.
pub async fn start_gateway(config: FoodlensConfig) -> anyhow::Result<()> {
    let mut fatal = false;
    for diag in validate(&config) {
        match diag.severity {
            Severity::Error => {
                fatal = true;
                error!(path = diag.path, "{}", diag.message);
            },
            Severity::Warning => warn!(path = diag.path, "{}", diag.message),
        }
    }
    if fatal {
        anyhow::bail!("invalid configuration");
    }

    let dispatcher = build_dispatcher(&config)?;
    let storage_enabled = dispatcher.deps().object_store.is_some();
    let app = build_gateway_app(
        AppState::new(dispatcher.clone()),
        &config.server.webhook_path,
    );

    let listener =
        tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        webhook_path = %config.server.webhook_path,
        model = %config.vision.model,
        storage_enabled,
        "foodlens gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        in_flight = dispatcher.in_flight(),
        "server stopped, cancelling event handlers"
    );
    dispatcher.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    ApiResponse::ok(
        "OK",
        serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}
