//! Interactive question path: validate raw JSON input, run a single
//! question through the pipeline, and keep a caller-owned conversation log.

use crate::analysis::analyze;
use crate::error::{FinancialQaError, Result};
use crate::llm::CompletionGateway;
use crate::prompt::{build_prompt, SYSTEM_MESSAGE};
use crate::schema::{FinancialRecord, NormalizedRow};
use crate::table::normalize;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Parse raw JSON input into a record and its normalized row.
///
/// Input-validation failures propagate to the caller with actionable
/// messages: invalid JSON and missing table data are distinct errors.
pub fn process_json_input(json_input: &str) -> Result<(NormalizedRow, FinancialRecord)> {
    let record: FinancialRecord =
        serde_json::from_str(json_input).map_err(FinancialQaError::InvalidJson)?;

    let row = normalize(&record);
    if row.is_empty() {
        return Err(FinancialQaError::NoTableData);
    }

    Ok((row, record))
}

/// Read and parse a record from a JSON file.
pub fn load_record_file(path: &Path) -> Result<FinancialRecord> {
    let raw = fs::read_to_string(path)?;
    let record = serde_json::from_str(&raw).map_err(FinancialQaError::InvalidJson)?;
    Ok(record)
}

/// Answer one financial question over a normalized row.
pub async fn process_financial_question(
    question: &str,
    row: &NormalizedRow,
    context: &str,
    gateway: &dyn CompletionGateway,
) -> Result<String> {
    let bundle = analyze(row, question);
    debug!(
        "analysis found {} numeric fields for question: {}",
        bundle.numeric_fields.len(),
        question
    );

    let prompt = build_prompt(context, question, &bundle)?;
    let answer = gateway.complete(SYSTEM_MESSAGE, &prompt).await?;

    info!("answered question via {} characters of prompt", prompt.len());
    Ok(answer)
}

/// One exchange in an interactive session.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub question: String,
    pub answer: String,
    pub table: NormalizedRow,
    pub provider: String,
}

/// Explicit, caller-owned conversation log for one user session. Created
/// per session and discarded when the session ends; there is no global
/// state behind it.
#[derive(Debug, Default)]
pub struct ChatSession {
    entries: Vec<ChatEntry>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    /// Exchanges in chronological order.
    pub fn history(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
