//! In-memory collaborators for route tests.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use {
    async_trait::async_trait,
    axum::{Router, response::Response},
    bytes::Bytes,
    foodlens_bot::{BotDeps, BotSettings, Dispatcher, InMemoryContextStore},
    foodlens_channels::{ContentFetcher, FetchedContent, ReplySink},
    foodlens_storage::ObjectStore,
    foodlens_vision::{FoodRecognizer, RecognitionResult},
};

use crate::{server::build_gateway_app, state::AppState};

#[derive(Default)]
pub struct RecordingReplies {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingReplies {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySink for RecordingReplies {
    async fn reply_text(&self, reply_token: &str, text: &str) -> foodlens_channels::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}

struct MissingContent;

#[async_trait]
impl ContentFetcher for MissingContent {
    async fn fetch(&self, _content_id: &str) -> foodlens_channels::Result<FetchedContent> {
        Err(foodlens_channels::Error::status(404, "Not found"))
    }
}

struct NoFood;

#[async_trait]
impl FoodRecognizer for NoFood {
    async fn recognize(&self, _jpeg: &[u8]) -> foodlens_vision::Result<RecognitionResult> {
        Ok(RecognitionResult::from_text("無食物"))
    }
}

#[derive(Default)]
pub struct FakeStore {
    fail: AtomicBool,
}

impl FakeStore {
    pub fn fail_presign(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        user_id: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> foodlens_storage::Result<String> {
        Ok(format!("food-images/{user_id}/20260101_000000.jpg"))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> foodlens_storage::Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(foodlens_storage::Error::signing("clock unavailable"));
        }
        Ok(format!("https://bucket.example/{key}?ttl={}", ttl.as_secs()))
    }
}

#[derive(Default)]
pub struct Fakes {
    pub replies: Arc<RecordingReplies>,
    pub store: Arc<FakeStore>,
}

/// Router on the default webhook path, plus its dispatcher.
pub fn app(fakes: &Fakes, with_storage: bool) -> (Router, Dispatcher) {
    let object_store: Option<Arc<dyn ObjectStore>> = if with_storage {
        Some(fakes.store.clone())
    } else {
        None
    };
    let dispatcher = Dispatcher::new(BotDeps {
        replies: fakes.replies.clone(),
        fetcher: Arc::new(MissingContent),
        recognizer: Arc::new(NoFood),
        object_store,
        contexts: Arc::new(InMemoryContextStore::new()),
        settings: BotSettings::default(),
    });
    let router = build_gateway_app(AppState::new(dispatcher.clone()), "/line/webhook");
    (router, dispatcher)
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
