//! # Financial Table QA
//!
//! Answers quantitative financial questions over a single tabular financial
//! record by prompting an LLM backend with the table, the question, and
//! pre-parsed numeric field values.
//!
//! ## Pipeline
//!
//! - **Table Normalizer**: flattens a record's `table` mapping into one row,
//!   coercing numeric-looking values to floats
//! - **Field Analyzer**: collects the numeric field inventory and per-field
//!   values (field selection is left to the model)
//! - **Prompt Builder**: assembles the fixed, versioned instruction prompt
//! - **Gateway**: interchangeable Groq/OpenAI chat-completion providers
//! - **Answer Comparator**: rounding-based answer equivalence for offline
//!   evaluation
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_table_qa::*;
//!
//! let (row, record) = process_json_input(r#"{
//!     "table": {"revenue_2020": "100", "revenue_2021": "120"}
//! }"#)?;
//!
//! let gateway = ChatClient::for_provider(Provider::Groq)?;
//! let answer = process_financial_question(
//!     "What is the percentage increase in revenue from 2020 to 2021?",
//!     &row,
//!     "",
//!     &gateway,
//! ).await?;
//!
//! assert!(compare_answers(&answer, "20%"));
//! ```

pub mod analysis;
pub mod answer;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod server;
pub mod service;
pub mod table;
pub mod utils;

pub use analysis::analyze;
pub use answer::{compare_answers, normalize_answer};
pub use error::{FinancialQaError, Result};
pub use evaluation::{evaluate, load_dataset, qa_pairs, write_report};
pub use llm::{ChatClient, CompletionGateway, Provider};
pub use prompt::{build_prompt, PROMPT_VERSION, SYSTEM_MESSAGE};
pub use schema::*;
pub use server::run_server;
pub use service::{
    load_record_file, process_financial_question, process_json_input, ChatEntry, ChatSession,
};
pub use table::{coerce_numeric, normalize, normalize_table_value};
pub use utils::*;
