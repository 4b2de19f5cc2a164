use chrono::NaiveDate;

use crate::error::{Result, StmtError};
use crate::models::Row;

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Sort key of a row: its first cell parsed with `format`. Rows without a
/// date sort first.
fn date_key(row: &Row, format: &str) -> Result<NaiveDate> {
    match row.first().and_then(|c| c.as_deref()) {
        None | Some("") => Ok(NaiveDate::MIN),
        Some(raw) => NaiveDate::parse_from_str(raw, format).map_err(|_| StmtError::Date {
            value: raw.to_string(),
            format: format.to_string(),
        }),
    }
}

/// Check that every row carries a parseable date without reordering them.
pub fn validate_dates(rows: &[Row], format: &str) -> Result<()> {
    rows.iter().try_for_each(|row| date_key(row, format).map(|_| ()))
}

/// Stable ascending sort on the first-cell date. Every key is parsed before
/// sorting, so one malformed date fails the whole sort.
pub fn sort_by_date(rows: Vec<Row>, format: &str) -> Result<Vec<Row>> {
    let mut keyed = rows
        .into_iter()
        .map(|row| Ok((date_key(&row, format)?, row)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(date, _)| *date);
    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row;

    #[test]
    fn test_validate_dates_reports_first_bad_value() {
        let rows = vec![
            row(&["02/01/2024", "ok"]),
            row(&["", "no date"]),
            row(&["32/01/2024", "bad"]),
        ];
        let err = validate_dates(&rows, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, StmtError::Date { ref value, .. } if value == "32/01/2024"));
        assert!(validate_dates(&rows[..2], DEFAULT_DATE_FORMAT).is_ok());
    }

    fn firsts(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|r| r[0].clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_missing_dates_sort_first() {
        let rows = vec![row(&["", "a"]), row(&["15/01/2024", "b"]), row(&["01/01/2024", "c"])];
        let sorted = sort_by_date(rows, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(firsts(&sorted), vec!["", "01/01/2024", "15/01/2024"]);
    }

    #[test]
    fn test_absent_first_cell_sorts_first() {
        let rows = vec![row(&["02/02/2024", "a"]), vec![None, Some("b".into())]];
        let sorted = sort_by_date(rows, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(sorted[0][1].as_deref(), Some("b"));
    }

    #[test]
    fn test_sort_is_by_calendar_not_text() {
        let rows = vec![row(&["01/02/2024"]), row(&["31/01/2024"]), row(&["15/12/2023"])];
        let sorted = sort_by_date(rows, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(firsts(&sorted), vec!["15/12/2023", "31/01/2024", "01/02/2024"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = vec![
            row(&["05/01/2024", "first"]),
            row(&["04/01/2024", "early"]),
            row(&["05/01/2024", "second"]),
        ];
        let sorted = sort_by_date(rows, DEFAULT_DATE_FORMAT).unwrap();
        let labels: Vec<_> = sorted.iter().map(|r| r[1].clone().unwrap()).collect();
        assert_eq!(labels, vec!["early", "first", "second"]);
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let rows = vec![row(&["01/01/2024"]), row(&["LOYER"])];
        let err = sort_by_date(rows, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, StmtError::Date { ref value, .. } if value == "LOYER"));
    }

    #[test]
    fn test_single_row_is_still_parsed() {
        let rows = vec![row(&["Rentcontinued", "", "100,00"])];
        assert!(sort_by_date(rows, DEFAULT_DATE_FORMAT).is_err());
    }

    #[test]
    fn test_custom_format() {
        let rows = vec![row(&["2024-03-01"]), row(&["2024-01-09"])];
        let sorted = sort_by_date(rows, "%Y-%m-%d").unwrap();
        assert_eq!(firsts(&sorted), vec!["2024-01-09", "2024-03-01"]);
    }
}
