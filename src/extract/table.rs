// src/extract/table.rs

/// A 2D grid of string cells produced by the extraction backend for one
/// page region of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Ordered column headers (possibly duplicated/empty).
    pub headers: Vec<String>,
    /// Ordered rows of string cells, one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tuning knobs for stream-style table detection.
///
/// The source reports have no ruled borders, so tables are inferred from
/// whitespace alignment across consecutive lines of page text.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Minimum consecutive tabular lines that constitute a table.
    pub min_rows: usize,
    /// Minimum column count for a line to count as tabular and for an
    /// inferred grid to be kept.
    pub min_columns: usize,
    /// Fraction of block lines that must be blank at a character position
    /// for it to vote as part of a column gutter. Lower tolerates the
    /// inconsistent spacing in the source PDFs.
    pub alignment_tolerance: f32,
    /// Minimum width (in characters) of an interior whitespace gutter.
    pub min_gap: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_columns: 2,
            alignment_tolerance: 0.8,
            min_gap: 2,
        }
    }
}

/// Detects zero or more tables in one page of extracted text.
///
/// Consecutive lines that split into enough whitespace-separated cells form
/// a block; each block's column boundaries are inferred by voting on blank
/// character positions, and every block line is cut at those boundaries.
pub fn detect_tables(text: &str, options: &StreamOptions) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<char>> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if cell_count(line, options.min_gap) >= options.min_columns {
            block.push(line.chars().collect());
        } else if !block.is_empty() {
            if let Some(table) = table_from_block(&block, options) {
                tables.push(table);
            }
            block.clear();
        }
    }
    if let Some(table) = table_from_block(&block, options) {
        tables.push(table);
    }

    tables
}

/// Number of cells a line would split into, counting runs of at least
/// `min_gap` spaces inside the trimmed line as separators.
fn cell_count(line: &str, min_gap: usize) -> usize {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let mut cells = 1;
    let mut run = 0;
    for c in trimmed.chars() {
        if c == ' ' {
            run += 1;
        } else {
            if run >= min_gap {
                cells += 1;
            }
            run = 0;
        }
    }
    cells
}

fn table_from_block(block: &[Vec<char>], options: &StreamOptions) -> Option<RawTable> {
    if block.len() < options.min_rows {
        return None;
    }
    let width = block.iter().map(|line| line.len()).max()?;
    let needed = (options.alignment_tolerance * block.len() as f32).ceil() as usize;

    // Vote per character position: a position is part of a gutter when it is
    // blank (or past the end of the line) in enough of the block's lines.
    let mut gutter = vec![false; width];
    for (pos, slot) in gutter.iter_mut().enumerate() {
        let blank = block
            .iter()
            .filter(|line| line.get(pos).map_or(true, |c| *c == ' '))
            .count();
        *slot = blank >= needed;
    }

    let spans = column_spans(&gutter, options.min_gap);
    if spans.len() < options.min_columns {
        return None;
    }

    let rows: Vec<Vec<String>> = block
        .iter()
        .map(|line| {
            spans
                .iter()
                .map(|&(start, end)| {
                    let end = end.min(line.len());
                    if start >= end {
                        String::new()
                    } else {
                        line[start..end].iter().collect::<String>().trim().to_string()
                    }
                })
                .collect()
        })
        .collect();

    // Report tables carry multi-line header text that cannot be reliably
    // attributed to columns, so columns are labelled positionally. Header
    // lines survive here as ordinary rows and are removed downstream by the
    // serial-number row filter.
    let headers = (0..spans.len()).map(|i| i.to_string()).collect();

    Some(RawTable { headers, rows })
}

/// Splits gutter votes into column spans. A gutter run separates columns
/// when it is at least `min_gap` wide; runs touching either edge of the
/// block are margins regardless of width.
fn column_spans(gutter: &[bool], min_gap: usize) -> Vec<(usize, usize)> {
    let width = gutter.len();
    let mut separators: Vec<(usize, usize)> = Vec::new();
    let mut pos = 0;
    while pos < width {
        if !gutter[pos] {
            pos += 1;
            continue;
        }
        let start = pos;
        while pos < width && gutter[pos] {
            pos += 1;
        }
        if start == 0 || pos == width || pos - start >= min_gap {
            separators.push((start, pos));
        }
    }

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end) in separators {
        if start > cursor {
            spans.push((cursor, start));
        }
        cursor = end;
    }
    if cursor < width {
        spans.push((cursor, width));
    }
    spans
}
