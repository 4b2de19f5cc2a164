use std::io::BufWriter;

use chrono::{Datelike, Duration, NaiveDate};
use printpdf::*;

use crate::error::{Result, StmtError};
use crate::fmt::amount;

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_LEFT: f32 = 15.0;
const TABLE_TOP: f32 = 55.0;
const FOOTER_Y: f32 = 287.0;
const ROW_H: f32 = 5.0;
const ROWS_PER_PAGE: usize = 14;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 14.0;
const SUBTITLE_SIZE: f32 = 10.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Column anchor: left edge for left-aligned text, right edge otherwise.
struct Col {
    x: f32,
    align: Align,
}

const COLS: &[Col] = &[
    Col { x: 15.0, align: Align::Left },
    Col { x: 40.0, align: Align::Left },
    Col { x: 65.0, align: Align::Left },
    Col { x: 160.0, align: Align::Right },
    Col { x: 195.0, align: Align::Right },
];

const HEADERS: &[&str] = &["Date", "Date valeur", "Operation", "Credit", "Debit"];

// ---------------------------------------------------------------------------
// Statement model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Entry {
    pub date: NaiveDate,
    pub value_date: NaiveDate,
    /// Label as printed, one element per line.
    pub label: Vec<String>,
    /// Positive for credits, negative for debits.
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub bank: String,
    pub account: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub opening_balance: f64,
    pub entries: Vec<Entry>,
}

impl Statement {
    pub fn file_name(&self) -> String {
        format!("releve-{}.pdf", self.to.format("%Y-%m"))
    }

    fn totals(&self) -> (f64, f64) {
        self.entries.iter().fold((0.0, 0.0), |(credit, debit), e| {
            if e.amount >= 0.0 {
                (credit + e.amount, debit)
            } else {
                (credit, debit - e.amount)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    page_number: usize,
    rows_on_page: usize,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| StmtError::Render(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| StmtError::Render(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            page_number: 1,
            rows_on_page: 0,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn page_header(&mut self, statement: &Statement) {
        self.y = MARGIN_TOP;
        self.text(&statement.bank, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 8.0;
        self.text(&statement.account, MARGIN_LEFT, SUBTITLE_SIZE, false);
        self.y += 6.0;
        let period = format!(
            "Releve du {} au {}",
            statement.from.format("%d/%m/%Y"),
            statement.to.format("%d/%m/%Y")
        );
        self.text(&period, MARGIN_LEFT, SUBTITLE_SIZE, false);

        self.y = FOOTER_Y;
        self.text(&format!("Page {}", self.page_number), 95.0, FONT_SIZE, false);

        self.y = TABLE_TOP;
        self.table_row(HEADERS, true);
        self.y += 2.0;
        self.rows_on_page = 0;
    }

    fn new_page(&mut self, statement: &Statement) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.page_number += 1;
        self.page_header(statement);
    }

    fn ensure_rows(&mut self, needed: usize, statement: &Statement) {
        if self.rows_on_page + needed > ROWS_PER_PAGE {
            self.new_page(statement);
        }
    }

    /// Empty strings leave their column blank.
    fn table_row(&mut self, values: &[&str], bold: bool) {
        for (col, value) in COLS.iter().zip(values) {
            if value.is_empty() {
                continue;
            }
            let x = match col.align {
                Align::Left => col.x,
                Align::Right => col.x - approx_text_width(value, FONT_SIZE),
            };
            self.text(value, x, FONT_SIZE, bold);
        }
        self.y += ROW_H;
        self.rows_on_page += 1;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| StmtError::Render(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| StmtError::Render(e.to_string()))
    }
}

/// Render a statement: header block on every page, one table row per
/// label line, totals and closing balance at the end.
pub fn render_statement(statement: &Statement) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(&statement.file_name())?;
    pdf.page_header(statement);

    for entry in &statement.entries {
        pdf.ensure_rows(entry.label.len().max(1), statement);
        let date = entry.date.format("%d/%m/%Y").to_string();
        let value_date = entry.value_date.format("%d/%m/%Y").to_string();
        let money = amount(entry.amount.abs());
        let (credit, debit) = if entry.amount >= 0.0 {
            (money.as_str(), "")
        } else {
            ("", money.as_str())
        };
        let first = entry.label.first().map(String::as_str).unwrap_or("");
        pdf.table_row(&[date.as_str(), value_date.as_str(), first, credit, debit], false);
        for line in entry.label.iter().skip(1) {
            pdf.table_row(&["", "", line.as_str(), "", ""], false);
        }
    }

    let (credit, debit) = statement.totals();
    let balance = statement.opening_balance + credit - debit;
    pdf.ensure_rows(2, statement);
    let (total_credit, total_debit) = (amount(credit), amount(debit));
    pdf.table_row(&["", "", "Total des mouvements", total_credit.as_str(), total_debit.as_str()], true);
    let closing = format!(
        "SOLDE {} AU {}",
        if balance >= 0.0 { "CREDITEUR" } else { "DEBITEUR" },
        statement.to.format("%d/%m/%Y")
    );
    let balance_text = amount(balance.abs());
    let (credit, debit) = if balance >= 0.0 {
        (balance_text.as_str(), "")
    } else {
        ("", balance_text.as_str())
    };
    pdf.table_row(&["", "", closing.as_str(), credit, debit], true);

    pdf.to_bytes()
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

struct SampleEntry {
    day: u32,
    /// Days between the operation and its value date.
    lag: i64,
    label: &'static [&'static str],
    amount: f64,
}

const SAMPLE_ENTRIES: &[SampleEntry] = &[
    SampleEntry { day: 1, lag: 1, label: &["VIR SEPA M. DURAND", "LOYER"], amount: -850.00 },
    SampleEntry { day: 2, lag: 1, label: &["PRLV SEPA ELECTRICITE", "DE FRANCE"], amount: -78.40 },
    SampleEntry { day: 3, lag: 0, label: &["CB MONOP. PARIS 11"], amount: -23.15 },
    SampleEntry { day: 5, lag: 2, label: &["VIR SALAIRE SARL ATELIER"], amount: 2650.00 },
    SampleEntry { day: 6, lag: 0, label: &["CB SNCF INTERNET"], amount: -112.00 },
    SampleEntry { day: 8, lag: 1, label: &["PRLV SEPA FREE MOBILE"], amount: -19.99 },
    SampleEntry { day: 9, lag: 0, label: &["RETRAIT DAB PARIS"], amount: -60.00 },
    SampleEntry { day: 11, lag: 1, label: &["CHQ 0001042"], amount: -1200.00 },
    SampleEntry { day: 12, lag: 0, label: &["CB PHARMACIE DU CENTRE"], amount: -14.70 },
    SampleEntry { day: 14, lag: 2, label: &["VIR INST M. MARTIN", "REMBOURSEMENT DINER"], amount: 45.00 },
    SampleEntry { day: 15, lag: 0, label: &["PRLV SEPA MUTUELLE", "SANTE ADHERENT 4471"], amount: -62.30 },
    SampleEntry { day: 17, lag: 1, label: &["CB CARREFOUR MARKET"], amount: -87.64 },
    SampleEntry { day: 19, lag: 0, label: &["FRAIS TENUE DE COMPTE"], amount: -2.50 },
    SampleEntry { day: 21, lag: 1, label: &["CB AMAZON EU SARL"], amount: -34.99 },
    SampleEntry { day: 23, lag: 0, label: &["VIR SEPA CAF"], amount: 310.00 },
    SampleEntry { day: 25, lag: 2, label: &["PRLV SEPA ASSURANCE", "HABITATION"], amount: -21.80 },
    SampleEntry { day: 27, lag: 0, label: &["CB BOULANGERIE"], amount: -6.40 },
    SampleEntry { day: 28, lag: 1, label: &["VIR EPARGNE LIVRET A"], amount: -300.00 },
];

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(y, m, 1).and_then(|d| d.pred_opt())
}

/// `count` monthly statements starting January 2024, newest first so the
/// converter has something to reorder.
pub fn sample_statements(count: usize) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut balance = 1500.0;
    for i in 0..count {
        let year = 2024 + (i / 12) as i32;
        let month = (i % 12) as u32 + 1;
        let (Some(from), Some(to)) = (
            NaiveDate::from_ymd_opt(year, month, 1),
            last_day_of_month(year, month),
        ) else {
            continue;
        };
        let scale = 1.0 + 0.05 * (i % 6) as f64;
        let entries: Vec<Entry> = SAMPLE_ENTRIES
            .iter()
            .filter_map(|s| {
                let date = NaiveDate::from_ymd_opt(year, month, s.day.min(to.day()))?;
                Some(Entry {
                    date,
                    value_date: date + Duration::days(s.lag),
                    label: s.label.iter().map(|l| l.to_string()).collect(),
                    amount: (s.amount * scale * 100.0).round() / 100.0,
                })
            })
            .collect();
        let statement = Statement {
            bank: "BANQUE MUTUELLE DU CENTRE".to_string(),
            account: "Compte courant no 00012345601".to_string(),
            from,
            to,
            opening_balance: balance,
            entries,
        };
        let (credit, debit) = statement.totals();
        balance += credit - debit;
        statements.push(statement);
    }
    statements.reverse();
    statements
}
