//! End-to-end: webhook in, recognition reply, save, then a presigned link,
//! all over a real listener.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    async_trait::async_trait,
    bytes::Bytes,
    tokio::net::TcpListener,
};

use {
    foodlens_bot::{BotDeps, BotSettings, Dispatcher, InMemoryContextStore, replies},
    foodlens_channels::{ContentFetcher, FetchedContent, ReplySink},
    foodlens_gateway::{AppState, build_gateway_app},
    foodlens_storage::ObjectStore,
    foodlens_vision::{FoodRecognizer, RecognitionResult},
};

#[derive(Default)]
struct Replies(Mutex<Vec<String>>);

#[async_trait]
impl ReplySink for Replies {
    async fn reply_text(&self, _reply_token: &str, text: &str) -> foodlens_channels::Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct PhotoFetcher;

#[async_trait]
impl ContentFetcher for PhotoFetcher {
    async fn fetch(&self, content_id: &str) -> foodlens_channels::Result<FetchedContent> {
        assert_eq!(content_id, "img-42");
        let img = image::RgbImage::from_pixel(1600, 1200, image::Rgb([90, 160, 60]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        Ok(FetchedContent {
            data: Bytes::from(out.into_inner()),
            content_type: Some("image/png".into()),
        })
    }
}

struct Bento;

#[async_trait]
impl FoodRecognizer for Bento {
    async fn recognize(&self, jpeg: &[u8]) -> foodlens_vision::Result<RecognitionResult> {
        let img = image::load_from_memory(jpeg).unwrap();
        assert_eq!((img.width(), img.height()), (1024, 768));
        Ok(RecognitionResult::from_text("排骨, 白飯"))
    }
}

#[derive(Default)]
struct Bucket(Mutex<Vec<String>>);

#[async_trait]
impl ObjectStore for Bucket {
    async fn upload(
        &self,
        user_id: &str,
        _data: Bytes,
        content_type: &str,
    ) -> foodlens_storage::Result<String> {
        assert_eq!(content_type, "image/png");
        let key = format!("food-images/{user_id}/20260218_111336.jpg");
        self.0.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> foodlens_storage::Result<String> {
        Ok(format!("https://meals.example/{key}?X-Amz-Expires={}", ttl.as_secs()))
    }
}

struct TestServer {
    addr: SocketAddr,
    dispatcher: Dispatcher,
    replies: Arc<Replies>,
    bucket: Arc<Bucket>,
}

async fn start_server() -> TestServer {
    let replies = Arc::new(Replies::default());
    let bucket = Arc::new(Bucket::default());
    let dispatcher = Dispatcher::new(BotDeps {
        replies: replies.clone(),
        fetcher: Arc::new(PhotoFetcher),
        recognizer: Arc::new(Bento),
        object_store: Some(bucket.clone()),
        contexts: Arc::new(InMemoryContextStore::new()),
        settings: BotSettings::default(),
    });
    let app = build_gateway_app(AppState::new(dispatcher.clone()), "/line/webhook");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr,
        dispatcher,
        replies,
        bucket,
    }
}

fn webhook_body(reply_token: &str, message: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "mode": "active",
            "replyToken": reply_token,
            "source": {"type": "user", "userId": "U80b35e04"},
            "message": message,
        }],
    })
}

#[tokio::test]
async fn upload_recognize_save_and_fetch_link() {
    let server = start_server().await;
    let client = reqwest::Client::new();
    let webhook = format!("http://{}/line/webhook", server.addr);

    let resp = client
        .post(&webhook)
        .json(&webhook_body(
            "rt-1",
            serde_json::json!({"type": "image", "id": "img-42"}),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    server.dispatcher.drain().await;

    let resp = client
        .post(&webhook)
        .json(&webhook_body(
            "rt-2",
            serde_json::json!({"type": "text", "id": "t-1", "text": "儲存"}),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    server.dispatcher.drain().await;

    assert_eq!(*server.replies.0.lock().unwrap(), vec![
        "排骨, 白飯".to_string(),
        replies::UPLOAD_SUCCEEDED.to_string(),
    ]);
    let key = server.bucket.0.lock().unwrap()[0].clone();

    let resp = client
        .post(format!("http://{}/s3/getImage", server.addr))
        .json(&serde_json::json!({ "s3_key": key }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["Message"], "OK");
    assert_eq!(
        body["Data"]["url"],
        "https://meals.example/food-images/U80b35e04/20260218_111336.jpg?X-Amz-Expires=3600"
    );
}

#[tokio::test]
async fn save_before_upload_asks_for_image() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{}/line/webhook", server.addr))
        .json(&webhook_body(
            "rt-1",
            serde_json::json!({"type": "text", "id": "t-1", "text": "save please"}),
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    server.dispatcher.drain().await;

    assert_eq!(*server.replies.0.lock().unwrap(), vec![
        replies::UPLOAD_FIRST.to_string()
    ]);
    assert!(server.bucket.0.lock().unwrap().is_empty());
}
