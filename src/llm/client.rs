use crate::error::{FinancialQaError, Result};
use crate::llm::types::*;
use crate::llm::CompletionGateway;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// Low temperature to favor deterministic numeric answers.
const DEFAULT_TEMPERATURE: f64 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// HTTP client for an OpenAI-compatible chat-completions endpoint. One
/// implementation serves both providers; retry with exponential backoff on
/// transient failures (timeouts, connection errors, 429s).
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    provider: Provider,
    api_key: String,
    temperature: f64,
    max_retries: u32,
}

impl ChatClient {
    /// Build a client for the given provider, reading its credential from
    /// the environment. Fails up front when the key is missing so callers
    /// see a credential problem before any question is dispatched.
    pub fn for_provider(provider: Provider) -> Result<Self> {
        let api_key = provider.api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            provider,
            api_key,
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Initial attempt plus the configured retries.
    fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    async fn complete_once(&self, request: &ChatCompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.provider.base_url());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinancialQaError::Gateway(format!(
                "{} API error (status {}): {}",
                self.provider.name(),
                status,
                body
            )));
        }

        let body: ChatCompletionResponse = response.json().await?;
        let choice = body
            .choices
            .first()
            .ok_or(FinancialQaError::EmptyCompletion)?;

        Ok(choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl CompletionGateway for ChatClient {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.provider.model().to_string(),
            messages: vec![
                ChatMessage::system(system_message),
                ChatMessage::user(prompt),
            ],
            temperature: self.temperature,
        };

        let mut delay = Duration::from_secs(1);
        let mut last_error = String::new();

        for attempt in 0..self.total_attempts() {
            if attempt > 0 {
                debug!(
                    "retrying {} completion (attempt {} of {})",
                    self.provider.name(),
                    attempt,
                    self.max_retries
                );
                sleep(delay).await;
                delay = std::cmp::min(delay * 2, MAX_BACKOFF);
            }

            match self.complete_once(&request).await {
                Ok(text) => return Ok(text),
                Err(FinancialQaError::Http(e)) if e.is_timeout() || e.is_connect() => {
                    warn!("transient gateway failure: {}", e);
                    last_error = e.to_string();
                }
                Err(FinancialQaError::Gateway(msg)) if msg.contains("status 429") => {
                    warn!("rate limited, backing off {:?}", delay);
                    last_error = msg;
                }
                Err(other) => return Err(other),
            }
        }

        Err(FinancialQaError::RetriesExhausted {
            attempts: self.total_attempts(),
            last_error,
        })
    }
}
