//! CSV ingest into an in-memory `Dataset`.
//!
//! This module is responsible for turning an arbitrary loan-level CSV into a
//! rectangular table of trimmed string cells with per-column type inference.
//!
//! Design goals:
//! - **Schema-light**: no required columns here; the analyses pick columns later
//! - **Row-level validation** (skip malformed rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no statistics here

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::ColumnKind;
use crate::error::AppError;

/// Cell spellings treated as missing values.
const MISSING_TOKENS: [&str; 9] = ["", "na", "n/a", "nan", "null", "none", "#n/a", "<na>", "-nan"];

/// Upper bound on distinct levels for a column to count as a grouping factor.
const MAX_FACTOR_LEVELS: usize = 50;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
    /// `false` when the row was kept (padded) despite the problem.
    pub skipped: bool,
}

/// Rows dropped outright because of a [`RowError`].
pub fn skipped_rows(errors: &[RowError]) -> usize {
    errors.iter().filter(|e| e.skipped).count()
}

/// A loaded table: headers, string cells, inferred column kinds.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_errors: Vec<RowError>,
    kinds: Vec<ColumnKind>,
}

impl Dataset {
    /// Build a dataset from already-split records.
    ///
    /// Every row must have exactly one cell per header.
    pub fn from_records(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, AppError> {
        let name = name.into();
        if headers.is_empty() {
            return Err(AppError::usage(format!("Dataset '{name}' has no columns.")));
        }

        let mut seen = HashSet::new();
        for h in &headers {
            if h.is_empty() {
                return Err(AppError::usage(format!("Dataset '{name}' has an empty column name.")));
            }
            if !seen.insert(h.as_str()) {
                return Err(AppError::usage(format!("Dataset '{name}' has a duplicate column: `{h}`")));
            }
        }

        if let Some(bad) = rows.iter().position(|r| r.len() != headers.len()) {
            return Err(AppError::usage(format!(
                "Dataset '{name}': row {} has {} cells, expected {}.",
                bad + 1,
                rows[bad].len(),
                headers.len()
            )));
        }

        let kinds = (0..headers.len()).map(|c| infer_kind(&rows, c)).collect();

        Ok(Self {
            name,
            headers,
            rows,
            row_errors: Vec::new(),
            kinds,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// First `n` rows (`df.head(n)`).
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Resolve a column by name: exact match first, then case-insensitive.
    pub fn column_index(&self, name: &str) -> Result<usize, AppError> {
        let wanted = name.trim();
        if let Some(idx) = self.headers.iter().position(|h| h == wanted) {
            return Ok(idx);
        }
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::usage(format!(
                    "Missing column `{wanted}` in '{}'. Available: {}",
                    self.name,
                    self.headers.join(", ")
                ))
            })
    }

    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        self.kinds[idx]
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    /// Categorical columns that look like grouping factors rather than ids.
    ///
    /// Falls back to every categorical column when none qualifies.
    pub fn factor_columns(&self) -> Vec<&str> {
        let factors: Vec<&str> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.kinds[*idx] == ColumnKind::Categorical)
            .filter(|(idx, _)| {
                let levels = self.distinct_levels(*idx);
                (2..=MAX_FACTOR_LEVELS).contains(&levels) && levels < self.n_rows()
            })
            .map(|(_, h)| h.as_str())
            .collect();

        if factors.is_empty() {
            self.categorical_columns()
        } else {
            factors
        }
    }

    /// Number of distinct non-missing values in a column.
    pub fn distinct_levels(&self, col: usize) -> usize {
        (0..self.n_rows())
            .filter_map(|r| self.cell(r, col))
            .collect::<HashSet<_>>()
            .len()
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.headers
            .iter()
            .zip(&self.kinds)
            .filter(|(_, k)| **k == kind)
            .map(|(h, _)| h.as_str())
            .collect()
    }

    /// Cell value, or `None` when the cell is missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !is_missing(s))
    }

    /// Cell parsed as a finite number.
    pub fn numeric_cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).and_then(parse_finite)
    }
}

/// Load a CSV file from disk.
pub fn read_csv_path(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();
    read_csv(name, file)
}

/// Load a CSV from any reader (file, HTTP body, in-memory bytes).
pub fn read_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Dataset, AppError> {
    let name = name.into();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers of '{name}': {e}")))?
        .clone();
    let headers = normalize_headers(&headers);
    if headers.iter().all(String::is_empty) {
        return Err(AppError::usage(format!("CSV '{name}' has no header row.")));
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line and lines are 1-based.
        let line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                    skipped: true,
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        if record.len() > headers.len() {
            row_errors.push(RowError {
                line,
                message: format!("Expected {} fields, saw {}.", headers.len(), record.len()),
                skipped: true,
            });
            continue;
        }

        if record.len() < headers.len() {
            row_errors.push(RowError {
                line,
                message: format!(
                    "Expected {} fields, saw {}; padded with missing cells.",
                    headers.len(),
                    record.len()
                ),
                skipped: false,
            });
        }
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(AppError::no_data(format!("CSV '{name}' contains no data rows.")));
    }

    tracing::debug!(
        dataset = %name,
        rows = rows.len(),
        cols = headers.len(),
        skipped = skipped_rows(&row_errors),
        padded = row_errors.len() - skipped_rows(&row_errors),
        "loaded csv"
    );

    let mut dataset = Dataset::from_records(name, headers, rows)?;
    dataset.row_errors = row_errors;
    Ok(dataset)
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        // Excel likes to prefix the first header with a UTF-8 BOM.
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect()
}

fn infer_kind(rows: &[Vec<String>], col: usize) -> ColumnKind {
    let mut present = 0usize;
    for row in rows {
        let cell = row[col].as_str();
        if is_missing(cell) {
            continue;
        }
        if parse_finite(cell).is_none() {
            return ColumnKind::Categorical;
        }
        present += 1;
    }
    if present == 0 {
        ColumnKind::Categorical
    } else {
        ColumnKind::Numeric
    }
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

fn parse_finite(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}race,rate,decision\nA,5.1,Approved\nB,6.2,Denied\nB,,Approved\n";

    #[test]
    fn strips_bom_and_infers_kinds() {
        let ds = read_csv("t.csv", CSV.as_bytes()).unwrap();
        assert_eq!(ds.headers, vec!["race", "rate", "decision"]);
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column_kind(0), ColumnKind::Categorical);
        assert_eq!(ds.column_kind(1), ColumnKind::Numeric);
        assert_eq!(ds.numeric_columns(), vec!["rate"]);
        assert_eq!(ds.categorical_columns(), vec!["race", "decision"]);
    }

    #[test]
    fn empty_and_na_cells_are_missing() {
        let ds = read_csv("t.csv", "g,v\nA,NA\nB,\nC,1.5\n".as_bytes()).unwrap();
        assert_eq!(ds.cell(0, 1), None);
        assert_eq!(ds.cell(1, 1), None);
        assert_eq!(ds.numeric_cell(2, 1), Some(1.5));
        assert_eq!(ds.column_kind(1), ColumnKind::Numeric);
    }

    #[test]
    fn long_rows_are_reported_and_short_rows_padded() {
        let ds = read_csv("t.csv", "a,b\n1,2,3\n4\n5,6\n".as_bytes()).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.row_errors.len(), 2);
        assert_eq!(ds.row_errors[0].line, 2);
        assert!(ds.row_errors[0].skipped);
        assert_eq!(ds.rows[0], vec!["4".to_string(), String::new()]);

        let short = &ds.row_errors[1];
        assert_eq!(short.line, 3);
        assert!(!short.skipped);
        assert!(short.message.contains("padded"));
        assert_eq!(skipped_rows(&ds.row_errors), 1);
    }

    #[test]
    fn header_only_csv_is_no_data() {
        let err = read_csv("t.csv", "a,b\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NO_DATA);
    }

    #[test]
    fn column_lookup_falls_back_to_case_insensitive() {
        let ds = read_csv("t.csv", CSV.as_bytes()).unwrap();
        assert_eq!(ds.column_index("Rate").unwrap(), 1);
        let err = ds.column_index("apr").unwrap_err();
        assert!(err.message().contains("Missing column `apr`"));
    }

    #[test]
    fn factor_columns_skip_identifiers() {
        let ds = read_csv("t.csv", "id,g,v\nx1,A,1\nx2,A,2\nx3,B,3\n".as_bytes()).unwrap();
        assert_eq!(ds.factor_columns(), vec!["g"]);

        let ids_only = read_csv("t.csv", "id,v\nx1,1\nx2,2\n".as_bytes()).unwrap();
        assert_eq!(ids_only.factor_columns(), vec!["id"]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = read_csv("t.csv", "a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(err.message().contains("duplicate column"));
    }
}
