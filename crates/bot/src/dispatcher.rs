//! Fan-out of inbound events to their workflows.

use std::{sync::Arc, time::Duration};

use {
    foodlens_channels::{ContentFetcher, EventPayload, InboundEvent, ReplySink},
    foodlens_storage::ObjectStore,
    foodlens_vision::FoodRecognizer,
    tokio_util::{sync::CancellationToken, task::TaskTracker},
    tracing::{debug, warn},
};

use crate::{
    context::UserContextStore,
    error::{HandlerError, Workflow},
    recognize::recognize_image,
    replies,
    save::{SaveOutcome, is_save_command, save_last_image},
};

/// Tunables for the workflows.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub save_keywords: Vec<String>,
    pub recognition_timeout: Duration,
    pub save_fetch_timeout: Duration,
    pub upload_timeout: Duration,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            save_keywords: vec!["save".into(), "儲存".into()],
            recognition_timeout: Duration::from_secs(30),
            save_fetch_timeout: Duration::from_secs(15),
            upload_timeout: Duration::from_secs(15),
        }
    }
}

/// Collaborators shared by every event handler.
pub struct BotDeps {
    pub replies: Arc<dyn ReplySink>,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub recognizer: Arc<dyn FoodRecognizer>,
    /// `None` when no bucket is configured.
    pub object_store: Option<Arc<dyn ObjectStore>>,
    pub contexts: Arc<dyn UserContextStore>,
    pub settings: BotSettings,
}

/// Runs each inbound event as its own task.
///
/// Handlers never report back: every outcome ends in at most one reply and a
/// log line, and a failing event does not affect its siblings.
#[derive(Clone)]
pub struct Dispatcher {
    deps: Arc<BotDeps>,
    tasks: TaskTracker,
    cancel: CancellationToken,
}

impl Dispatcher {
    pub fn new(deps: BotDeps) -> Self {
        Self {
            deps: Arc::new(deps),
            tasks: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn deps(&self) -> &BotDeps {
        &self.deps
    }

    /// Spawn one detached task per event and return immediately.
    pub fn handle(&self, events: Vec<InboundEvent>) {
        for event in events {
            if self.cancel.is_cancelled() {
                debug!(user_id = %event.user_id, "dispatcher shut down, dropping event");
                continue;
            }
            let this = self.clone();
            let cancel = self.cancel.clone();
            let user_id = event.user_id.clone();
            self.tasks.spawn(async move {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!(user_id = %user_id, "event handling cancelled");
                    },
                    () = this.handle_event(event) => {},
                }
            });
        }
    }

    /// Handle a single event to completion on the current task.
    pub async fn handle_event(&self, event: InboundEvent) {
        let InboundEvent {
            user_id,
            reply_token,
            payload,
        } = event;

        match payload {
            EventPayload::Image { content_id } => {
                match recognize_image(&self.deps, &user_id, &content_id).await {
                    Ok(reply) => {
                        let delivered = self.send_reply(&user_id, &reply_token, &reply.text).await;
                        if delivered && reply.eligible_for_save {
                            self.deps
                                .contexts
                                .put(&user_id, &content_id, &reply_token)
                                .await;
                        }
                    },
                    Err(e) => {
                        self.report_failure(&user_id, &reply_token, &e, Workflow::Recognize)
                            .await;
                    },
                }
            },
            EventPayload::Text { text }
                if is_save_command(&text, &self.deps.settings.save_keywords) =>
            {
                let text = match save_last_image(&self.deps, &user_id).await {
                    Ok(SaveOutcome::NothingToSave) => replies::UPLOAD_FIRST,
                    Ok(SaveOutcome::Saved { .. }) => replies::UPLOAD_SUCCEEDED,
                    Err(e) => {
                        self.report_failure(&user_id, &reply_token, &e, Workflow::Save)
                            .await;
                        return;
                    },
                };
                self.send_reply(&user_id, &reply_token, text).await;
            },
            EventPayload::Text { .. } | EventPayload::Other { .. } => {
                self.send_reply(&user_id, &reply_token, replies::GUIDANCE)
                    .await;
            },
        }
    }

    /// Stop accepting events, cancel in-flight handlers and wait for them.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }

    /// Wait for every spawned handler to finish without cancelling them.
    ///
    /// Lets tests observe replies after `handle` returns; production shutdown
    /// goes through [`Dispatcher::shutdown`].
    #[doc(hidden)]
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Number of handlers still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    async fn report_failure(
        &self,
        user_id: &str,
        reply_token: &str,
        error: &HandlerError,
        workflow: Workflow,
    ) {
        warn!(user_id, stage = error.stage(), error = %error, "event handling failed");
        if let Some(text) = error.user_message(workflow) {
            self.send_reply(user_id, reply_token, text).await;
        }
    }

    /// Returns whether the reply was accepted.
    async fn send_reply(&self, user_id: &str, reply_token: &str, text: &str) -> bool {
        match self.deps.replies.reply_text(reply_token, text).await {
            Ok(()) => true,
            Err(e) => {
                let error = HandlerError::reply(e);
                warn!(user_id, stage = error.stage(), error = %error, "reply not delivered");
                false
            },
        }
    }
}
