use chrono::{DateTime, Months, NaiveDate, Utc};

/// Expands a `YYYY-MM` value into the half-open UTC interval covering that
/// calendar month: `[month-01T00:00:00Z, next-month-01T00:00:00Z)`.
///
/// Returns `None` when the value does not name a real month; callers treat
/// that as "matches no rows" rather than rejecting the input.
pub fn month_range(month: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()?;
    let end = start.checked_add_months(Months::new(1))?;

    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_a_regular_month() {
        let (start, end) = month_range("2024-03").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-04-01T00:00:00+00:00");
    }

    #[test]
    fn december_rolls_over_into_the_next_year() {
        let (start, end) = month_range("2024-12").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn leap_february_is_fully_covered() {
        let (start, end) = month_range("2024-02").unwrap();
        assert!(start < "2024-02-29T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert!(end > "2024-02-29T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn malformed_input_yields_no_interval() {
        assert!(month_range("March-2024").is_none());
        assert!(month_range("2024-13").is_none());
        assert!(month_range("2024-00").is_none());
        assert!(month_range("2024-03-15").is_none());
        assert!(month_range("").is_none());
    }
}
