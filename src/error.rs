use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancialQaError {
    #[error("Invalid JSON format. Please check your input.")]
    InvalidJson(#[source] serde_json::Error),

    #[error("No valid table data found in the JSON input")]
    NoTableData,

    #[error("{0} API key not found in environment variables")]
    MissingApiKey(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Gateway returned no completion choices")]
    EmptyCompletion,

    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FinancialQaError>;
