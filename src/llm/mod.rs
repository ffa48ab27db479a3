pub mod client;
pub mod types;

pub use client::*;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;

/// The single capability the core depends on: turn a system message and a
/// user prompt into one text response. Both supported providers sit behind
/// this trait and are interchangeable.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String>;
}
