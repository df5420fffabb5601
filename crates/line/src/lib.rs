//! LINE Messaging API adapter.
//!
//! Parses webhook payloads into channel events and implements reply delivery
//! and message-content download against the LINE REST API.

pub mod client;
pub mod config;
pub mod webhook;

pub use {client::LineClient, config::LineConfig, webhook::parse_webhook};
