/// One table cell. `None` is a cell the extractor found no text for.
pub type Cell = Option<String>;

/// An ordered, fixed-arity sequence of cells.
pub type Row = Vec<Cell>;

/// Rows of one PDF, pages concatenated in page order.
pub type Table = Vec<Row>;

/// True when the cell is absent or holds only whitespace.
pub fn is_blank(cell: Option<&Cell>) -> bool {
    cell.map_or(true, |c| c.as_deref().map_or(true, |s| s.trim().is_empty()))
}

/// Per-file numbers collected while converting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub pages: usize,
    pub tables: usize,
    pub rows_read: usize,
    pub rows_filtered: usize,
    pub rows_logical: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub files: Vec<FileReport>,
    pub rows_written: usize,
}

#[cfg(test)]
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Some(c.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&None)));
        assert!(is_blank(Some(&Some("   ".to_string()))));
        assert!(!is_blank(Some(&Some("01/01/2024".to_string()))));
    }
}
