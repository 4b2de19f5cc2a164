use std::path::Path;

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::debug;

use crate::error::{Result, StmtError};
use crate::layout::{extract_table, Glyph, LayoutOptions};
use crate::models::Table;
use crate::rows::PeriodColumns;

/// Rows pulled out of one PDF, plus what was seen on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfTables {
    pub rows: Table,
    pub pages: usize,
    pub tables: usize,
}

/// Anything that can turn a statement file into table rows.
pub trait TableSource {
    fn read_tables(&self, path: &Path) -> Result<PdfTables>;
}

// ---------------------------------------------------------------------------
// Glyph collection
// ---------------------------------------------------------------------------

/// Records every character pdf-extract draws on a page.
#[derive(Default)]
struct GlyphCollector {
    page_height: f64,
    glyphs: Vec<Glyph>,
}

type DevResult = std::result::Result<(), OutputError>;

impl OutputDev for GlyphCollector {
    fn begin_page(&mut self, _page_num: u32, media_box: &MediaBox, _art_box: Option<(f64, f64, f64, f64)>) -> DevResult {
        self.page_height = media_box.ury - media_box.lly;
        self.glyphs.clear();
        Ok(())
    }

    fn end_page(&mut self) -> DevResult {
        Ok(())
    }

    fn output_character(&mut self, trm: &Transform, width: f64, _spacing: f64, font_size: f64, char: &str) -> DevResult {
        // Font size scaled by the text rendering matrix.
        let sx = font_size * (trm.m11 + trm.m21);
        let sy = font_size * (trm.m12 + trm.m22);
        let size = (sx * sy).abs().sqrt();
        self.glyphs.push(Glyph {
            x: trm.m31,
            y: self.page_height - trm.m32,
            width: width * size,
            size,
            text: char.to_string(),
        });
        Ok(())
    }

    fn begin_word(&mut self) -> DevResult {
        Ok(())
    }

    fn end_word(&mut self) -> DevResult {
        Ok(())
    }

    fn end_line(&mut self) -> DevResult {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PdfTableReader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PdfTableReader {
    pub layout: LayoutOptions,
    pub periods: PeriodColumns,
}

impl PdfTableReader {
    pub fn new(periods: PeriodColumns) -> Self {
        Self {
            layout: LayoutOptions::default(),
            periods,
        }
    }

    fn open(path: &Path) -> Result<Document> {
        let pdf_err = |message: String| StmtError::Pdf {
            path: path.to_path_buf(),
            message,
        };
        let mut doc = Document::load(path).map_err(|e| pdf_err(e.to_string()))?;
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| pdf_err(format!("encrypted document: {e}")))?;
        }
        Ok(doc)
    }
}

impl TableSource for PdfTableReader {
    /// Primary table of every page, pages in order. Pages without a table
    /// are skipped.
    fn read_tables(&self, path: &Path) -> Result<PdfTables> {
        let doc = Self::open(path)?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut out = PdfTables {
            pages: page_numbers.len(),
            ..Default::default()
        };
        let mut collector = GlyphCollector::default();
        for page in page_numbers {
            pdf_extract::output_doc_page(&doc, &mut collector, page).map_err(|e| StmtError::Pdf {
                path: path.to_path_buf(),
                message: format!("page {page}: {e}"),
            })?;
            let Some(table) = extract_table(&collector.glyphs, &self.layout) else {
                debug!(page, "no table found");
                continue;
            };
            debug!(page, rows = table.len(), "table extracted");
            out.tables += 1;
            out.rows.extend(table.into_iter().map(|mut row| {
                self.periods.strip(&mut row);
                row
            }));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_a_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdf");
        let err = PdfTableReader::default().read_tables(&path).unwrap_err();
        assert!(matches!(err, StmtError::Pdf { .. }));
        assert!(err.to_string().contains("absent.pdf"));
    }

    #[test]
    fn test_garbage_file_is_a_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let err = PdfTableReader::default().read_tables(&path).unwrap_err();
        assert!(matches!(err, StmtError::Pdf { .. }));
    }

    #[cfg(feature = "sample")]
    mod rendered {
        use super::*;
        use crate::render::{render_statement, sample_statements};

        fn write_sample(dir: &Path) -> std::path::PathBuf {
            let statement = &sample_statements(1)[0];
            let path = dir.join("statement.pdf");
            std::fs::write(&path, render_statement(statement).unwrap()).unwrap();
            path
        }

        #[test]
        fn test_reads_every_page_of_a_rendered_statement() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_sample(dir.path());
            let tables = PdfTableReader::default().read_tables(&path).unwrap();
            assert!(tables.pages >= 2);
            assert_eq!(tables.tables, tables.pages);
            assert!(tables.rows.iter().all(|r| r.len() == 5));
            assert!(tables
                .rows
                .iter()
                .any(|r| r.iter().flatten().any(|c| c.contains("Total des mouvements"))));
        }

        #[test]
        fn test_periods_stripped_only_where_asked() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_sample(dir.path());

            let all = PdfTableReader::default().read_tables(&path).unwrap();
            assert!(all.rows.iter().flatten().flatten().all(|c| !c.contains('.')));

            let amounts_only = PdfTableReader::new(PeriodColumns::from_indices(&[3, 4]))
                .read_tables(&path)
                .unwrap();
            assert!(amounts_only
                .rows
                .iter()
                .any(|r| r[2].as_deref().is_some_and(|c| c.contains('.'))));
            assert!(amounts_only
                .rows
                .iter()
                .all(|r| r[3..].iter().flatten().all(|c| !c.contains('.'))));
        }
    }
}
