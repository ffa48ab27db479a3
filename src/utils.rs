//! Pure display/parsing helpers used by the interactive surface.

use crate::schema::{CellValue, NormalizedRow};

/// Percentage change from `previous` to `current`. A zero base yields a
/// signed infinity instead of failing.
pub fn calculate_percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    ((current - previous) / previous.abs()) * 100.0
}

/// Format a number as a currency string with thousands separators, e.g.
/// `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a number as a percentage string, e.g. `14.10%`.
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Parse whitespace-separated table text (header line followed by data
/// lines) into normalized rows. Lines whose column count does not match the
/// header are skipped.
pub fn parse_table_text(table_text: &str) -> Vec<NormalizedRow> {
    let mut lines = table_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split_whitespace().collect();

    let mut rows = Vec::new();
    for line in lines {
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != headers.len() {
            continue;
        }
        let row = headers
            .iter()
            .zip(values)
            .map(|(name, value)| {
                let cell = match value.parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::Text(value.to_string()),
                };
                (name.to_string(), cell)
            })
            .collect();
        rows.push(row);
    }
    rows
}

/// Pull the named numeric fields out of a row, skipping absent or
/// non-numeric ones.
pub fn extract_values(row: &NormalizedRow, keys: &[&str]) -> Vec<(String, f64)> {
    keys.iter()
        .filter_map(|key| {
            row.get(key)
                .and_then(CellValue::as_number)
                .map(|n| (key.to_string(), n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        assert!((calculate_percentage_change(120.0, 100.0) - 20.0).abs() < f64::EPSILON);
        assert!((calculate_percentage_change(80.0, 100.0) + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_change_negative_base() {
        // Change is measured against the magnitude of the base.
        assert!((calculate_percentage_change(-50.0, -100.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_change_zero_base() {
        assert_eq!(calculate_percentage_change(5.0, 0.0), f64::INFINITY);
        assert_eq!(calculate_percentage_change(-5.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(calculate_percentage_change(0.0, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1000000.0), "$1,000,000.00");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(-1234.5), "$-1,234.50");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(14.1), "14.10%");
        assert_eq!(format_percentage(-3.456), "-3.46%");
    }

    #[test]
    fn test_parse_table_text() {
        let text = "year revenue\n2020 100\n2021 120\nbad line with extra cols\n";
        let rows = parse_table_text(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("year"), Some(&CellValue::Number(2020.0)));
        assert_eq!(rows[1].get("revenue"), Some(&CellValue::Number(120.0)));
    }

    #[test]
    fn test_parse_table_text_empty() {
        assert!(parse_table_text("").is_empty());
        assert!(parse_table_text("\n  \n").is_empty());
    }

    #[test]
    fn test_extract_values() {
        let row: NormalizedRow = vec![
            ("a".to_string(), CellValue::Number(1.0)),
            ("b".to_string(), CellValue::Text("x".to_string())),
            ("c".to_string(), CellValue::Number(3.0)),
        ]
        .into_iter()
        .collect();

        let values = extract_values(&row, &["a", "b", "c", "missing"]);
        assert_eq!(values, vec![("a".to_string(), 1.0), ("c".to_string(), 3.0)]);
    }
}
