//! Core building blocks shared by every Promptlab crate.
//!
//! - [`config`] — on-disk schema, loader, and env var overrides
//! - [`types`] — the chat envelope the proxy forwards upstream
//! - [`utils`] — data directory helper

pub mod config;
pub mod types;
pub mod utils;

pub use types::{ChatEnvelope, ChatMessage};
