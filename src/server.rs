//! Thin HTTP surface over the interactive question path.

use crate::error::{FinancialQaError, Result};
use crate::llm::{ChatClient, Provider};
use crate::service::{process_financial_question, process_json_input};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub question: String,
    pub json_data: String,
    #[serde(default)]
    pub context: String,
    #[serde(default = "default_client_choice")]
    pub client_choice: String,
}

fn default_client_choice() -> String {
    "Groq".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
}

/// Bind and serve until the process is stopped.
pub async fn run_server(addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving on {}", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}

async fn analyze(Json(request): Json<AnalyzeRequest>) -> Response {
    let (row, _record) = match process_json_input(&request.json_data) {
        Ok(parsed) => parsed,
        Err(e @ (FinancialQaError::InvalidJson(_) | FinancialQaError::NoTableData)) => {
            return reply(StatusCode::BAD_REQUEST, String::new(), Some(e.to_string()));
        }
        Err(e) => {
            error!("unexpected input failure: {}", e);
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                String::new(),
                Some(e.to_string()),
            );
        }
    };

    // Gateway failures, missing credentials included, are reported inline
    // rather than aborting the exchange, mirroring the interactive surface.
    let provider = Provider::from_name(&request.client_choice);
    let gateway = match ChatClient::for_provider(provider) {
        Ok(client) => client,
        Err(e) => {
            error!("gateway construction failed: {}", e);
            return inline_error(e);
        }
    };

    match process_financial_question(&request.question, &row, &request.context, &gateway).await {
        Ok(answer) => reply(StatusCode::OK, answer, None),
        Err(e) => inline_error(e),
    }
}

fn inline_error(e: FinancialQaError) -> Response {
    reply(
        StatusCode::OK,
        format!("Error processing question: {}", e),
        Some(e.to_string()),
    )
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

fn reply(status: StatusCode, answer: String, error: Option<String>) -> Response {
    (status, Json(AnalyzeResponse { answer, error })).into_response()
}
