// CSV Loader
// Best-effort ingestion: sniffed parse → comma parse → line split → column split

use crate::error::{LoadError, Result};
use crate::record::{Table, UniversityRecord, COLUMNS};
use csv::{ReaderBuilder, Trim};
use encoding_rs::Encoding;
use std::fmt;
use std::path::Path;

/// Western single-byte charset the dataset is published in
pub const DEFAULT_ENCODING: &str = "latin1";

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_SAMPLE_LINES: usize = 10;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Which step of the fallback chain produced the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Delimiter detected from the content
    Sniffed { delimiter: u8 },
    /// Plain comma-delimited parse
    Comma,
    /// Raw lines, one layer of enclosing quotes stripped, split on commas
    LineSplit,
    /// The single mis-parsed column split into cells
    ColumnSplit,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sniffed { delimiter } => write!(
                f,
                "sniffed delimiter '{}'",
                (*delimiter as char).escape_default()
            ),
            Strategy::Comma => write!(f, "comma delimiter"),
            Strategy::LineSplit => write!(f, "line split"),
            Strategy::ColumnSplit => write!(f, "column split"),
        }
    }
}

/// A normalized table plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub strategy: Strategy,
    /// Column count before truncation to the five known columns
    pub source_columns: usize,
}

/// Header plus rows, every row padded to the header width.
#[derive(Debug, Clone, Default)]
struct Grid {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn width(&self) -> usize {
        self.header.len()
    }
}

/// One line of the raw file as seen by the line-split strategy
#[derive(Debug, Clone)]
pub struct LinePreview {
    pub number: usize,
    pub raw: String,
    pub stripped: String,
    pub parts: Vec<String>,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Read, decode and parse a universities file.
pub fn load_universities(path: &Path, encoding: &str) -> Result<Loaded> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode(&bytes, encoding)?;
    let loaded = parse_text(&text)?;

    tracing::info!(
        path = %path.display(),
        records = loaded.table.len(),
        columns = loaded.source_columns,
        strategy = %loaded.strategy,
        "loaded universities"
    );

    Ok(loaded)
}

/// Decode raw bytes with an encoding label such as `latin1` or `utf-8`.
pub fn decode(bytes: &[u8], label: &str) -> Result<String> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = used.name(), "input contained malformed sequences");
    }

    Ok(text.into_owned())
}

/// Run the fallback chain over decoded text.
pub fn parse_text(text: &str) -> Result<Loaded> {
    let (first, strategy) = first_pass(text)?;
    tracing::debug!(columns = first.width(), %strategy, "first pass");

    if first.width() == COLUMNS.len() {
        return normalize(first, strategy);
    }

    tracing::debug!(
        columns = first.width(),
        "unexpected column count, splitting raw lines"
    );

    match split_lines(text)? {
        Some(grid) => normalize(grid, Strategy::LineSplit),
        None => {
            tracing::debug!("header has too few fields, splitting first column");
            normalize(split_first_column(&first)?, Strategy::ColumnSplit)
        }
    }
}

/// Pick the candidate delimiter that occurs most consistently across the
/// first non-blank lines. `None` when no candidate occurs at all.
pub fn sniff_delimiter(text: &str) -> Option<u8> {
    let sample: Vec<&str> = non_blank_lines(text).take(SNIFF_SAMPLE_LINES).collect();
    if sample.is_empty() {
        return None;
    }

    let mut best: Option<(u8, f32)> = None;

    for &delimiter in &DELIMITER_CANDIDATES {
        let counts: Vec<f32> = sample
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count() as f32)
            .collect();

        let mean = counts.iter().sum::<f32>() / counts.len() as f32;
        if mean == 0.0 {
            continue;
        }

        let variance =
            counts.iter().map(|c| (c - mean).powi(2)).sum::<f32>() / counts.len() as f32;
        let score = mean / (1.0 + variance.sqrt());

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((delimiter, score));
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

/// Trim a line and remove one layer of matching enclosing quotes.
pub fn strip_line_quotes(line: &str) -> &str {
    let line = line.trim();

    for quote in ['"', '\''] {
        if line.starts_with(quote) && line.ends_with(quote) {
            // A lone quote character strips to an empty line
            return line.get(1..line.len() - 1).unwrap_or("");
        }
    }

    line
}

/// First `limit` non-blank lines, raw and quote-stripped, with their comma parts.
pub fn preview_lines(text: &str, limit: usize) -> Vec<LinePreview> {
    non_blank_lines(text)
        .take(limit)
        .enumerate()
        .map(|(i, raw)| {
            let stripped = strip_line_quotes(raw);
            LinePreview {
                number: i + 1,
                raw: raw.to_string(),
                stripped: stripped.to_string(),
                parts: stripped.split(',').map(str::to_string).collect(),
            }
        })
        .collect()
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Steps 1 and 2: sniffed delimiter, then plain commas. A comma failure is fatal.
fn first_pass(text: &str) -> Result<(Grid, Strategy)> {
    let sniffed = sniff_delimiter(text)
        .ok_or(LoadError::NoDelimiter)
        .and_then(|delimiter| {
            parse_delimited(text, delimiter).map(|grid| (grid, Strategy::Sniffed { delimiter }))
        });

    match sniffed {
        Ok(found) => Ok(found),
        Err(err) => {
            tracing::warn!(error = %err, "sniffed parse failed, retrying with commas");
            let grid = parse_delimited(text, b',')?;
            Ok((grid, Strategy::Comma))
        }
    }
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<Grid> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        if record.len() > header.len() {
            return Err(LoadError::RaggedRow {
                line: record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 2),
                expected: header.len(),
                found: record.len(),
            });
        }

        rows.push(pad(record.iter(), header.len()));
    }

    Ok(Grid { header, rows })
}

/// Step 3: `None` when the header line has fewer than five fields.
fn split_lines(text: &str) -> Result<Option<Grid>> {
    let lines: Vec<&str> = non_blank_lines(text).map(strip_line_quotes).collect();
    let (first, rest) = lines.split_first().ok_or(LoadError::Empty)?;

    let header: Vec<String> = first.split(',').map(str::to_string).collect();
    if header.len() < COLUMNS.len() {
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(rest.len());

    for (index, line) in rest.iter().enumerate() {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() > header.len() {
            return Err(LoadError::RaggedRow {
                line: index + 2,
                expected: header.len(),
                found: cells.len(),
            });
        }
        rows.push(pad(cells, header.len()));
    }

    Ok(Some(Grid { header, rows }))
}

/// Step 4: split the first column of the first-pass table on commas.
fn split_first_column(first: &Grid) -> Result<Grid> {
    let split: Vec<Vec<String>> = first
        .rows
        .iter()
        .map(|row| {
            row.first()
                .map(String::as_str)
                .unwrap_or("")
                .split(',')
                .map(clean_cell)
                .collect()
        })
        .collect();

    let width = split.iter().map(Vec::len).max().unwrap_or(0);
    if width < COLUMNS.len() {
        return Err(LoadError::TooFewColumns { found: width });
    }

    Ok(Grid {
        header: (0..width).map(|i| i.to_string()).collect(),
        rows: split.into_iter().map(|row| pad(row, width)).collect(),
    })
}

fn normalize(grid: Grid, strategy: Strategy) -> Result<Loaded> {
    let source_columns = grid.width();
    if source_columns < COLUMNS.len() {
        return Err(LoadError::TooFewColumns {
            found: source_columns,
        });
    }

    if source_columns > COLUMNS.len() {
        tracing::debug!(
            dropped = source_columns - COLUMNS.len(),
            "truncating extra columns"
        );
    }

    let records = grid
        .rows
        .iter()
        .map(|row| UniversityRecord::from_cells(row))
        .collect();

    Ok(Loaded {
        table: Table::new(records),
        strategy,
        source_columns,
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

fn pad<I, S>(cells: I, width: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row: Vec<String> = cells.into_iter().map(|c| c.as_ref().to_string()).collect();
    row.resize(width, String::new());
    row
}

/// Whitespace, then residual double quotes, then residual single quotes.
fn clean_cell(cell: &str) -> String {
    cell.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
name,country,city,website,fields
MIT,USA,\"Cambridge, MA\",https://mit.edu,Computer Science|Physics
Oxford,UK,Oxford,https://ox.ac.uk,Law|Physics
";

    fn names(loaded: &Loaded) -> Vec<&str> {
        loaded
            .table
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    #[test]
    fn test_well_formed_file_keeps_column_order() {
        let loaded = parse_text(WELL_FORMED).unwrap();

        assert_eq!(loaded.strategy, Strategy::Sniffed { delimiter: b',' });
        assert_eq!(loaded.source_columns, 5);
        assert_eq!(loaded.table.len(), 2);

        let mit = &loaded.table.records()[0];
        assert_eq!(mit.name, "MIT");
        assert_eq!(mit.country, "USA");
        assert_eq!(mit.city, "Cambridge, MA");
        assert_eq!(mit.website, "https://mit.edu");
        assert_eq!(mit.fields, "Computer Science|Physics");
    }

    #[test]
    fn test_semicolon_file_is_sniffed() {
        let text = "name;country;city;website;fields\nETH;Switzerland;Zurich;https://ethz.ch;Engineering\n";
        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.strategy, Strategy::Sniffed { delimiter: b';' });
        assert_eq!(loaded.table.records()[0].city, "Zurich");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let text = "name,country,city,website,fields\nMIT,USA\n";
        let loaded = parse_text(text).unwrap();

        let mit = &loaded.table.records()[0];
        assert_eq!(mit.country, "USA");
        assert_eq!(mit.city, "");
        assert_eq!(mit.fields, "");
    }

    #[test]
    fn test_quoted_lines_fall_back_to_line_split() {
        let text = "\
\"name,country,city,website,fields\"
\"MIT,USA,Cambridge,https://mit.edu,Computer Science|Physics\"
\"Oxford,UK,Oxford,https://ox.ac.uk,Law\"
";
        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.strategy, Strategy::LineSplit);
        assert_eq!(names(&loaded), vec!["MIT", "Oxford"]);
        assert_eq!(loaded.table.records()[0].fields, "Computer Science|Physics");
    }

    #[test]
    fn test_inner_quote_layer_is_preserved() {
        let text = "\
\"name,country,city,website,fields\"
\"'MIT',USA,Cambridge,https://mit.edu,Physics\"
";
        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.strategy, Strategy::LineSplit);
        assert_eq!(loaded.table.records()[0].name, "'MIT'");
    }

    #[test]
    fn test_single_column_is_split_and_cleaned() {
        let text = "\
universities
\"'MIT', 'USA', Cambridge, https://mit.edu, Physics\"
\"Oxford, UK, Oxford, https://ox.ac.uk, Law\"
";
        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.strategy, Strategy::ColumnSplit);
        let mit = &loaded.table.records()[0];
        assert_eq!(mit.name, "MIT");
        assert_eq!(mit.country, "USA");
        assert_eq!(mit.city, "Cambridge");
        assert_eq!(mit.fields, "Physics");
        assert_eq!(loaded.table.records()[1].website, "https://ox.ac.uk");
    }

    #[test]
    fn test_seven_columns_are_truncated() {
        let text = "\
name,country,city,website,fields,rank,founded
MIT,USA,Cambridge,https://mit.edu,Physics,1,1861
";
        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.source_columns, 7);
        let mit = &loaded.table.records()[0];
        assert_eq!(mit.fields, "Physics");
        assert_eq!(mit.website, "https://mit.edu");
    }

    #[test]
    fn test_ragged_sniffed_parse_falls_back_to_commas() {
        // Semicolons score higher than commas here, but the last row has one too many
        let text = "\
name,country,city,website,fields;notes;rank
MIT,USA,Cambridge,https://mit.edu,Physics;top;1
Oxford,UK,Oxford,https://ox.ac.uk,Law;old;2
Sorbonne;Paris;France;4
";
        assert_eq!(sniff_delimiter(text), Some(b';'));

        let loaded = parse_text(text).unwrap();

        assert_eq!(loaded.strategy, Strategy::Comma);
        assert_eq!(loaded.source_columns, 5);
        assert_eq!(names(&loaded), vec!["MIT", "Oxford", "Sorbonne;Paris;France;4"]);
        assert_eq!(loaded.table.records()[0].country, "USA");
        assert_eq!(loaded.table.records()[2].country, "");
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(parse_text(""), Err(LoadError::Empty)));
        assert!(matches!(parse_text("   \n\n  \n"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_too_few_columns_is_fatal() {
        let err = parse_text("a,b,c\n1,2,3\n").unwrap_err();
        assert!(matches!(err, LoadError::TooFewColumns { .. }));
    }

    #[test]
    fn test_ragged_line_split_is_fatal() {
        let text = "\
\"name,country,city,website,fields\"
\"MIT,USA,Cambridge,https://mit.edu,Physics,extra\"
";
        let err = parse_text(text).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                expected: 5,
                found: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a,b,c\nd,e,f"), Some(b','));
        assert_eq!(sniff_delimiter("a;b;c\nd;e;f"), Some(b';'));
        assert_eq!(sniff_delimiter("a\tb\tc\nd\te\tf"), Some(b'\t'));
        assert_eq!(sniff_delimiter("name,fields\nMIT,CS|Physics|Law"), Some(b','));
        assert_eq!(sniff_delimiter("abc\ndef"), None);
        assert_eq!(sniff_delimiter(""), None);
    }

    #[test]
    fn test_strip_line_quotes() {
        assert_eq!(strip_line_quotes("\"a,b\""), "a,b");
        assert_eq!(strip_line_quotes("  'a,b'  "), "a,b");
        assert_eq!(strip_line_quotes("\"'a,b'\""), "'a,b'");
        assert_eq!(strip_line_quotes("\"a,b'"), "\"a,b'");
        assert_eq!(strip_line_quotes("a,b"), "a,b");
        assert_eq!(strip_line_quotes("\""), "");
        assert_eq!(strip_line_quotes(" ' "), "");
        assert_eq!(strip_line_quotes("\"\""), "");
    }

    #[test]
    fn test_decode_latin1() {
        let bytes = b"Universit\xe9 de Gen\xe8ve";
        assert_eq!(decode(bytes, "latin1").unwrap(), "Université de Genève");
    }

    #[test]
    fn test_decode_unknown_label() {
        assert!(matches!(
            decode(b"abc", "klingon"),
            Err(LoadError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_preview_lines() {
        let previews = preview_lines("\"a,b\"\n\n'c,d,e'\nf\n", 2);

        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].number, 1);
        assert_eq!(previews[0].stripped, "a,b");
        assert_eq!(previews[0].parts, vec!["a", "b"]);
        assert_eq!(previews[1].raw, "'c,d,e'");
        assert_eq!(previews[1].parts.len(), 3);
    }
}
