use crate::error::{FinancialQaError, Result};
use serde::{Deserialize, Serialize};

/// Supported text-completion providers. Both speak the OpenAI-compatible
/// chat-completions wire format; they differ only in base URL, model name,
/// and credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Fast provider (Groq-hosted Llama).
    Groq,
    /// High-quality provider (OpenAI GPT-4 class).
    OpenAi,
}

impl Provider {
    /// Selection by name, case-insensitive. Anything other than "groq"
    /// selects OpenAI, matching the original selection rule.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("groq") {
            Provider::Groq
        } else {
            Provider::OpenAi
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::OpenAi => "OpenAI",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            Provider::Groq => "llama-3.3-70b-versatile",
            Provider::OpenAi => "gpt-4-turbo-preview",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Read the provider credential from the environment.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(self.api_key_env())
            .map_err(|_| FinancialQaError::MissingApiKey(self.name().to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: text.to_string(),
        }
    }

    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub content: String,
}
