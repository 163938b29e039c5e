use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a line-chart index cell and truncate it to the first of its month.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, the same with a `HH:MM:SS` time part,
/// and bare `YYYY-MM`. Anything finer than the month is discarded.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let date = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .or_else(|| parse_year_month(s))?;

    date.with_day(1)
}

fn parse_year_month(s: &str) -> Option<NaiveDate> {
    // "YYYY-MM"
    if s.len() != 7 || s.as_bytes()[4] != b'-' {
        return None;
    }
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(5..7)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn truncates_to_month() {
        assert_eq!(parse_month("2020-01-15"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_month("1990/07/01"), Some(ymd(1990, 7, 1)));
        assert_eq!(parse_month("2008-10-31 12:30:00"), Some(ymd(2008, 10, 1)));
        assert_eq!(parse_month("2021-03"), Some(ymd(2021, 3, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_month("Jan 2020"), None);
        assert_eq!(parse_month("2020-13-01"), None);
        assert_eq!(parse_month(""), None);
    }
}
