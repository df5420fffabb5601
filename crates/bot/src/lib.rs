//! Conversation core: per-user image context, event dispatch, and the
//! recognize and save workflows.
//!
//! Platform I/O goes through the [`foodlens_channels`] traits, recognition
//! through [`foodlens_vision::FoodRecognizer`] and persistence through
//! [`foodlens_storage::ObjectStore`], so everything here runs against fakes
//! in tests.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod recognize;
pub mod replies;
pub mod save;

pub use {
    context::{CONTEXT_TTL, InMemoryContextStore, UserContextStore, UserImageContext},
    dispatcher::{BotDeps, BotSettings, Dispatcher},
    error::{HandlerError, Workflow},
};
