//! Messaging-channel abstractions shared by the bot core and platform adapters.
//!
//! A platform adapter (LINE today) turns webhook payloads into [`InboundEvent`]s
//! and implements [`ReplySink`] and [`ContentFetcher`] so the bot core never
//! talks to the platform API directly.

pub mod error;
pub mod event;
pub mod plugin;

pub use {
    error::{Error, Result},
    event::{EventPayload, InboundEvent, UNKNOWN_USER_ID},
    plugin::{ContentFetcher, FetchedContent, ReplySink},
};
