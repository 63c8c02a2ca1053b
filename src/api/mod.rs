pub mod client;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

pub use client::BackendClient;
pub use types::*;

use crate::error::Result;

/// The two endpoints a conversation session needs from the backend.
///
/// `query` returns the raw JSON body; interpreting its shape belongs to the
/// session so that every backend shares one decoding policy.
#[allow(async_fn_in_trait)]
pub trait AgentBackend {
    async fn query(&self, prompt: &str) -> Result<serde_json::Value>;

    async fn reset(&self) -> Result<()>;
}
