//! Table detection over positioned glyphs.
//!
//! Glyphs are grouped into text lines by baseline, each line is cut into
//! chunks at wide horizontal gaps, and the primary table of a page is the
//! longest run of lines holding two or more chunks. Column bands come from
//! the union of chunk extents over those lines; every chunk of the run is
//! then placed in the band it overlaps most.

use std::ops::Range;

use crate::models::{Row, Table};

/// One drawn character, in points, with `y` growing down the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub size: f64,
    pub text: String,
}

/// Thresholds are fractions of the font size unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Baseline drift still counted as the same line.
    pub line_tolerance: f64,
    /// Gap that inserts a space inside a chunk.
    pub word_gap: f64,
    /// Gap that starts a new chunk.
    pub column_gap: f64,
    /// Vertical distance between lines that ends a table.
    pub max_row_spacing: f64,
    /// Single-chunk lines allowed in a row inside a table (a line count).
    pub max_continuation_lines: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            word_gap: 0.15,
            column_gap: 1.0,
            max_row_spacing: 3.0,
            max_continuation_lines: 3,
        }
    }
}

#[derive(Debug, Clone)]
struct Chunk {
    x0: f64,
    x1: f64,
    text: String,
}

#[derive(Debug, Clone)]
struct TextLine {
    y: f64,
    size: f64,
    chunks: Vec<Chunk>,
}

impl TextLine {
    fn is_tabular(&self) -> bool {
        self.chunks.len() >= 2
    }
}

// ---------------------------------------------------------------------------
// Lines and chunks
// ---------------------------------------------------------------------------

fn group_lines<'a>(glyphs: &'a [Glyph], opts: &LayoutOptions) -> Vec<Vec<&'a Glyph>> {
    let mut sorted: Vec<&Glyph> = glyphs
        .iter()
        .filter(|g| !g.text.trim().is_empty())
        .collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<&Glyph>> = Vec::new();
    let mut line_y = 0.0;
    for g in sorted {
        let tolerance = g.size.max(1.0) * opts.line_tolerance;
        match lines.last_mut() {
            Some(line) if (g.y - line_y).abs() <= tolerance => line.push(g),
            _ => {
                line_y = g.y;
                lines.push(vec![g]);
            }
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

fn chunk_line(glyphs: &[&Glyph], opts: &LayoutOptions) -> TextLine {
    let size = glyphs.iter().map(|g| g.size).fold(1.0, f64::max);
    let y = glyphs.first().map_or(0.0, |g| g.y);

    let mut chunks: Vec<Chunk> = Vec::new();
    for g in glyphs {
        let end = g.x + g.width;
        match chunks.last_mut() {
            Some(chunk) if g.x - chunk.x1 <= size * opts.column_gap => {
                if g.x - chunk.x1 > size * opts.word_gap {
                    chunk.text.push(' ');
                }
                chunk.text.push_str(&g.text);
                chunk.x1 = chunk.x1.max(end);
            }
            _ => chunks.push(Chunk {
                x0: g.x,
                x1: end,
                text: g.text.clone(),
            }),
        }
    }
    TextLine { y, size, chunks }
}

// ---------------------------------------------------------------------------
// Table region and columns
// ---------------------------------------------------------------------------

fn keep_longest(best: Option<Range<usize>>, candidate: Range<usize>) -> Option<Range<usize>> {
    match best {
        Some(b) if b.len() >= candidate.len() => Some(b),
        _ => Some(candidate),
    }
}

/// Longest run of tabular lines, with the continuation lines between and
/// directly after them.
fn table_region(lines: &[TextLine], opts: &LayoutOptions) -> Option<Range<usize>> {
    let mut best = None;
    // (first line, last tabular line) of the run being built
    let mut current: Option<(usize, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some((start, last)) = current {
            let prev = &lines[i - 1];
            let too_far = line.y - prev.y > opts.max_row_spacing * line.size.max(prev.size);
            let too_many = !line.is_tabular() && i - last > opts.max_continuation_lines;
            if too_many {
                best = keep_longest(best, start..last + 1);
                current = None;
            } else if too_far {
                best = keep_longest(best, start..i);
                current = None;
            }
        }
        if line.is_tabular() {
            current = Some((current.map_or(i, |(start, _)| start), i));
        }
    }
    if let Some((start, _)) = current {
        best = keep_longest(best, start..lines.len());
    }
    best
}

fn column_bands(lines: &[TextLine]) -> Vec<(f64, f64)> {
    let mut spans: Vec<(f64, f64)> = lines
        .iter()
        .filter(|l| l.is_tabular())
        .flat_map(|l| l.chunks.iter().map(|c| (c.x0, c.x1)))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut bands: Vec<(f64, f64)> = Vec::new();
    for (x0, x1) in spans {
        match bands.last_mut() {
            Some(band) if x0 <= band.1 => band.1 = band.1.max(x1),
            _ => bands.push((x0, x1)),
        }
    }
    bands
}

/// Horizontal overlap; negative for disjoint spans (minus the gap).
fn overlap(chunk: &Chunk, band: &(f64, f64)) -> f64 {
    chunk.x1.min(band.1) - chunk.x0.max(band.0)
}

fn to_row(line: &TextLine, bands: &[(f64, f64)]) -> Row {
    let mut row: Row = vec![None; bands.len()];
    for chunk in &line.chunks {
        let Some((idx, _)) = bands
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| overlap(chunk, a).total_cmp(&overlap(chunk, b)))
        else {
            continue;
        };
        if let Some(cell) = row.get_mut(idx) {
            *cell = Some(match cell.take() {
                Some(prev) => format!("{prev} {}", chunk.text),
                None => chunk.text.clone(),
            });
        }
    }
    row
}

/// Primary table of one page, or `None` when no line splits into columns.
pub fn extract_table(glyphs: &[Glyph], opts: &LayoutOptions) -> Option<Table> {
    let lines: Vec<TextLine> = group_lines(glyphs, opts)
        .iter()
        .map(|l| chunk_line(l, opts))
        .collect();
    let region = table_region(&lines, opts)?;
    let lines = &lines[region];
    let bands = column_bands(lines);
    Some(lines.iter().map(|l| to_row(l, &bands)).collect())
}
