use crate::schema::{AnalysisBundle, FieldCalculation, FieldCalculations, NormalizedRow};
use log::debug;

/// Build the analysis payload for one question: the field inventory (names of
/// numeric fields in encounter order) and a per-field value record.
///
/// No selection or aggregation happens here; choosing the relevant fields and
/// doing the arithmetic is delegated to the model via the prompt. This
/// function never fails: an unusable row degrades to a bundle carrying only
/// the question and an error message.
pub fn analyze(row: &NormalizedRow, question: &str) -> AnalysisBundle {
    if row.is_empty() {
        debug!("analyzing empty row for question: {}", question);
    }

    let mut numeric_fields = Vec::new();
    let mut calculations = Vec::new();

    for (name, value) in row.iter() {
        if let Some(n) = value.as_number() {
            numeric_fields.push(name.to_string());
            calculations.push((name.to_string(), FieldCalculation::numeric(n)));
        }
    }

    AnalysisBundle {
        question: question.to_string(),
        table_data: row.clone(),
        numeric_fields,
        calculations: FieldCalculations(calculations),
        error: None,
    }
}
