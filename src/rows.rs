use std::collections::BTreeSet;

use crate::models::Row;

/// Boilerplate phrases dropped from every statement by default: the totals
/// line, the closing balance line and repeats of the table header.
pub const DEFAULT_FILTER_STRINGS: &[&str] = &["Total des mouvements", "CREDITEUR", "Date valeur"];

pub fn default_filter_strings() -> Vec<String> {
    DEFAULT_FILTER_STRINGS.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Period stripping
// ---------------------------------------------------------------------------

/// Columns whose cells lose their `.` characters (thousands separators).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PeriodColumns {
    #[default]
    All,
    Only(BTreeSet<usize>),
}

impl PeriodColumns {
    pub fn from_indices(indices: &[usize]) -> Self {
        if indices.is_empty() {
            Self::All
        } else {
            Self::Only(indices.iter().copied().collect())
        }
    }

    fn applies_to(&self, column: usize) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&column),
        }
    }

    pub fn strip(&self, row: &mut Row) {
        for (i, cell) in row.iter_mut().enumerate() {
            if !self.applies_to(i) {
                continue;
            }
            if let Some(text) = cell {
                if text.contains('.') {
                    *text = text.replace('.', "");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filter / trim
// ---------------------------------------------------------------------------

fn is_excluded(row: &Row, filter_strings: &[String]) -> bool {
    row.iter()
        .flatten()
        .any(|cell| filter_strings.iter().any(|f| cell.contains(f.as_str())))
}

/// Keep rows in which no present cell contains any of `filter_strings`.
pub fn filter_rows(rows: Vec<Row>, filter_strings: &[String]) -> Vec<Row> {
    rows.into_iter()
        .filter(|row| !is_excluded(row, filter_strings))
        .collect()
}

/// Drop the leading cell of every row.
pub fn drop_first_column(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter()
        .map(|row| row.into_iter().skip(1).collect())
        .collect()
}
