use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::models::Row;

pub const DEFAULT_HEADER: &[&str] = &["date", "label", "credit", "debit"];

pub fn default_header() -> Vec<String> {
    DEFAULT_HEADER.iter().map(|s| s.to_string()).collect()
}

/// Write the header and rows as CSV. Absent cells are written empty.
/// Rows keep their own width even when it differs from the header's.
pub fn write_rows<W: Write>(writer: W, header: &[String], rows: &[Row]) -> Result<()> {
    if let Some(row) = rows.iter().find(|r| r.len() != header.len()) {
        warn!(
            header = header.len(),
            row = row.len(),
            "ledger rows do not match the header width"
        );
    }

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Create (or overwrite) the ledger file at `path`.
pub fn write_ledger(path: &Path, header: &[String], rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_rows(std::io::BufWriter::new(file), header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row;

    fn render(rows: &[Row]) -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf, &default_header(), rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_when_no_rows() {
        assert_eq!(render(&[]), "date,label,credit,debit\r\n");
    }

    #[test]
    fn test_quotes_separators_and_quotes() {
        let out = render(&[row(&["02/01/2024", "VIR \"LOYER\"", "1234,56", ""])]);
        assert_eq!(
            out,
            "date,label,credit,debit\r\n02/01/2024,\"VIR \"\"LOYER\"\"\",\"1234,56\",\r\n"
        );
    }

    #[test]
    fn test_absent_cells_written_empty() {
        let out = render(&[vec![Some("02/01/2024".into()), None, None, Some("5".into())]]);
        assert!(out.ends_with("02/01/2024,,,5\r\n"));
    }

    #[test]
    fn test_narrow_rows_are_written_as_is() {
        let out = render(&[row(&["Rentcontinued", "", "100,00 "])]);
        assert!(out.ends_with("\r\nRentcontinued,,\"100,00 \"\r\n"));
    }

    #[test]
    fn test_roundtrip_through_csv_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("ledger.csv");
        let rows = vec![
            row(&["02/01/2024", "CB \"MONOP\", PARIS", "", "12,30"]),
            row(&["05/01/2024", "VIR SEPA\nDUPONT", "1500,00", ""]),
        ];
        write_ledger(&path, &default_header(), &rows).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), DEFAULT_HEADER);
        let back: Vec<Row> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(|c| Some(c.to_string())).collect())
            .collect();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        std::fs::write(&path, "stale contents that are longer than the new file\n").unwrap();
        write_ledger(&path, &default_header(), &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "date,label,credit,debit\r\n");
    }
}
