use crate::schema::{CellValue, FinancialRecord, NormalizedRow};
use log::debug;
use serde_json::Value;

/// Attempt numeric coercion of a raw JSON scalar. Accepts native numbers and
/// strings holding integer or decimal literals ("100", "-56.2", "1e3").
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Convert a record's `table` mapping into one flat row.
///
/// The table is always single-row in this system. Every field is coerced to
/// a float where possible; otherwise the original text is kept. A missing,
/// empty, or non-mapping table yields an empty row, which downstream code
/// treats as "no data available".
pub fn normalize(record: &FinancialRecord) -> NormalizedRow {
    match record.table.as_ref() {
        Some(value) => normalize_table_value(value),
        None => NormalizedRow::new(),
    }
}

/// Normalize an arbitrary JSON value expected to be a field -> scalar
/// mapping. Anything else yields the empty row rather than an error.
pub fn normalize_table_value(table: &Value) -> NormalizedRow {
    let Value::Object(map) = table else {
        debug!("table field is not a mapping; returning empty row");
        return NormalizedRow::new();
    };

    let mut row = NormalizedRow::new();
    for (name, value) in map {
        let cell = match coerce_numeric(value) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(scalar_to_text(value)),
        };
        row.insert(name.clone(), cell);
    }
    row
}

fn scalar_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
