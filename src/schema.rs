use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One self-contained financial document: a single data table plus zero or
/// more question/answer annotations.
///
/// The public datasets store `pre_text`/`post_text` either as a plain string
/// or as an array of sentence strings; both forms are accepted. QA pairs live
/// under a primary `qa` key or an indexed `qa_0`, `qa_1`, ... family, which
/// are captured through the flattened `extra` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<serde_json::Value>,

    /// Original (un-normalized) table, preferred for display when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_ori: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_text: Option<Narrative>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FinancialRecord {
    /// Concatenation of pre and post narrative with a single separating space.
    pub fn context(&self) -> String {
        let pre = self.pre_text.as_ref().map(Narrative::joined).unwrap_or_default();
        let post = self.post_text.as_ref().map(Narrative::joined).unwrap_or_default();
        format!("{} {}", pre, post)
    }

    /// The table used for prompt display: `table_ori` when present, else `table`.
    pub fn display_table(&self) -> Option<&serde_json::Value> {
        self.table_ori.as_ref().or(self.table.as_ref())
    }
}

/// Narrative text that may arrive as one string or a list of sentences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Narrative {
    Text(String),
    Lines(Vec<String>),
}

impl Narrative {
    pub fn joined(&self) -> String {
        match self {
            Narrative::Text(s) => s.clone(),
            Narrative::Lines(lines) => lines.join(" "),
        }
    }
}

/// A single question/answer annotation attached to a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A table cell after normalization: numeric when the original value parsed
/// as a float, otherwise the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// The single flat row produced by table normalization. Field order follows
/// the order of the source table and is preserved for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    fields: Vec<(String, CellValue)>,
}

impl NormalizedRow {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for NormalizedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Per-field value record embedded into the prompt alongside the raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCalculation {
    pub value: f64,
    pub kind: String,
}

impl FieldCalculation {
    pub fn numeric(value: f64) -> Self {
        Self {
            value,
            kind: "numeric".to_string(),
        }
    }
}

/// Ordered field -> calculation mapping, serialized as a JSON object in
/// field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCalculations(pub Vec<(String, FieldCalculation)>);

impl FieldCalculations {
    pub fn get(&self, name: &str) -> Option<&FieldCalculation> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldCalculations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, calc) in &self.0 {
            map.serialize_entry(name, calc)?;
        }
        map.end()
    }
}

/// The exact payload serialized into the prompt. When row access fails the
/// bundle degrades to question + error; consumers must check `error` before
/// trusting `table_data`/`calculations`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBundle {
    pub question: String,
    pub table_data: NormalizedRow,
    pub numeric_fields: Vec<String>,
    pub calculations: FieldCalculations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisBundle {
    pub fn degraded(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            table_data: NormalizedRow::new(),
            numeric_fields: Vec::new(),
            calculations: FieldCalculations::default(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncorrectAnswer {
    pub question: String,
    pub predicted: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationError {
    pub index: String,
    pub error: String,
}

/// Aggregate outcome of one evaluation pass. Built incrementally by the
/// driver and finalized once, after which it is not mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub total_questions: usize,
    pub processed_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: Vec<IncorrectAnswer>,
    pub errors: Vec<EvaluationError>,
    pub accuracy: f64,
    pub error_rate: f64,
    pub successful_processing_rate: f64,
}

/// Report file payload: one result per provider, keyed by provider name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub results: BTreeMap<String, EvaluationResult>,
}

impl EvaluationReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            results: BTreeMap::new(),
        }
    }
}

impl Default for EvaluationReport {
    fn default() -> Self {
        Self::new()
    }
}
