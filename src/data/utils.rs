use chrono::NaiveDate;
use std::{fs, path::Path};

use super::error::LoadError;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// `"Jan-2020"` style label for a month.
pub fn month_label(month: NaiveDate) -> String {
    month.format("%b-%Y").to_string()
}

/// Cast one text cell to a float. Blank cells are nulls.
pub fn parse_price_cell(raw: &str) -> Result<Option<f64>, String> {
    let cell = clean_str(raw);
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell == "<NA>" {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("`{cell}` is not a number"))
}

/// Read a whole resource, mapping io failures onto [`LoadError`].
pub fn read_resource(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_quotes_and_space() {
        assert_eq!(clean_str("  \"2020-01-01\" "), "2020-01-01");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str("abc"), "abc");
    }

    #[test]
    fn price_cells() {
        assert_eq!(parse_price_cell("105.5"), Ok(Some(105.5)));
        assert_eq!(parse_price_cell(" "), Ok(None));
        assert_eq!(parse_price_cell("NaN"), Ok(None));
        assert!(parse_price_cell("cheap").is_err());
    }

    #[test]
    fn labels_months() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(month_label(d), "Feb-2020");
    }
}
