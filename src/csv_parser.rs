//! CSV loading with automatic type inference.
//!
//! Parses CSV text into a [`DataFrame`](crate::dataframe::DataFrame),
//! inferring each column's type from its content. The inference priority
//! is: Numeric → Boolean → Categorical → Text.
//!
//! - RFC 4180 quoting (delimiters, doubled quotes and newlines inside quotes)
//! - CRLF line endings and a leading BOM are accepted
//! - Null markers: empty, `NA`, `N/A`, `NULL`, `None`, `NaN`, ... (cells are
//!   kept verbatim, so a single space is a value, not a null)
//!
//! # Example
//!
//! ```
//! use u_eda::csv_parser::CsvParser;
//! use u_eda::dataframe::DataType;
//!
//! let csv = "CustomerID,Contract,Churn Score\n\
//!            3668-QPYBK,Month-to-month,86\n\
//!            9237-HQITU,Month-to-month,67\n\
//!            9305-CDSKC,Month-to-month,86\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.column(0).unwrap().data_type(), DataType::Text);
//! assert_eq!(df.column(1).unwrap().data_type(), DataType::Categorical);
//! assert_eq!(df.column(2).unwrap().data_type(), DataType::Numeric);
//! ```

use crate::dataframe::{Column, DataFrame, DataType, ValidityBitmap};
use crate::error::EdaError;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Cell values treated as missing, compared verbatim.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A column becomes Categorical when its unique-value ratio is below this.
const CATEGORICAL_THRESHOLD: f64 = 0.5;

/// Upper bound on dictionary size for Categorical columns.
const MAX_CATEGORICAL_UNIQUE: usize = 1000;

/// CSV parser configuration and entry point.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvParser {
    /// Comma delimiter, header row, standard null markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row names the columns.
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Replaces the null markers.
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Reads and parses a CSV file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataFrame, EdaError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        self.parse_str(&content)
    }

    /// Parses CSV text into a DataFrame.
    pub fn parse_str(&self, input: &str) -> Result<DataFrame, EdaError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let rows = self.split_records(input);

        let Some(first) = rows.first() else {
            return Ok(DataFrame::new());
        };
        let (headers, body, first_line) = if self.has_header {
            (first.clone(), &rows[1..], 2)
        } else {
            let headers: Vec<String> = (0..first.len()).map(|i| format!("col_{i}")).collect();
            (headers, &rows[..], 1)
        };
        if body.is_empty() {
            return Ok(DataFrame::new());
        }

        let n_cols = headers.len();
        let mut cells: Vec<Vec<&str>> = vec![Vec::with_capacity(body.len()); n_cols];
        for (offset, row) in body.iter().enumerate() {
            if row.len() != n_cols {
                return Err(EdaError::CsvParse {
                    line: first_line + offset,
                    message: format!("expected {n_cols} fields, got {}", row.len()),
                });
            }
            for (col, field) in row.iter().enumerate() {
                cells[col].push(field.as_str());
            }
        }

        let mut df = DataFrame::new();
        for (name, raw) in headers.into_iter().zip(cells.iter()) {
            let column = self.build_column(raw);
            debug!(column = %name, data_type = %column.data_type(), nulls = column.null_count(), "inferred column");
            df.add_column(name, column)?;
        }
        Ok(df)
    }

    // ── Tokenizer ────────────────────────────────────────────────

    /// Splits raw text into records of unquoted fields.
    ///
    /// Blank lines before the first record and after the last are dropped.
    fn split_records(&self, input: &str) -> Vec<Vec<String>> {
        let delim = self.delimiter as char;
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = input.chars().peekable();

        let mut end_record = |row: &mut Vec<String>, field: &mut String| {
            row.push(std::mem::take(field));
            let blank = row.iter().all(|f| f.is_empty());
            if blank && rows.is_empty() {
                row.clear();
            } else {
                rows.push(std::mem::take(row));
            }
        };

        while let Some(c) = chars.next() {
            if quoted {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    _ => field.push(c),
                }
                continue;
            }
            match c {
                '"' if field.is_empty() => quoted = true,
                c if c == delim => row.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => end_record(&mut row, &mut field),
                _ => field.push(c),
            }
        }
        if !field.is_empty() || !row.is_empty() {
            end_record(&mut row, &mut field);
        }
        drop(end_record);

        while rows.last().is_some_and(|r| r.iter().all(|f| f.is_empty())) {
            rows.pop();
        }
        rows
    }

    // ── Column building ──────────────────────────────────────────

    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    fn build_column(&self, values: &[&str]) -> Column {
        let n = values.len();
        let nulls: Vec<bool> = values.iter().map(|v| self.is_null(v)).collect();
        let present: Vec<&str> = values
            .iter()
            .zip(&nulls)
            .filter(|(_, &null)| !null)
            .map(|(&v, _)| v)
            .collect();

        if present.is_empty() {
            return Column::numeric(vec![0.0; n], ValidityBitmap::all_invalid(n));
        }

        match infer_type(&present) {
            DataType::Numeric => {
                let (vals, validity) = collect_cells(values, &nulls, |v| v.trim().parse().unwrap_or(0.0));
                Column::numeric(vals, validity)
            }
            DataType::Boolean => {
                let (vals, validity) =
                    collect_cells(values, &nulls, |v| v.eq_ignore_ascii_case("true"));
                Column::boolean(vals, validity)
            }
            DataType::Categorical => {
                let mut lookup: HashMap<&str, u32> = HashMap::new();
                let mut dictionary: Vec<String> = Vec::new();
                let (indices, validity) = collect_cells(values, &nulls, |v| {
                    *lookup.entry(v).or_insert_with(|| {
                        dictionary.push(v.to_string());
                        (dictionary.len() - 1) as u32
                    })
                });
                Column::categorical(dictionary, indices, validity)
            }
            DataType::Text => {
                let (vals, validity) = collect_cells(values, &nulls, str::to_string);
                Column::text(vals, validity)
            }
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helper functions ──────────────────────────────────────────────────

/// Most specific type that fits every present value.
fn infer_type(present: &[&str]) -> DataType {
    // Surrounding spaces are tolerated in numbers, but a blank cell is not a number.
    if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        return DataType::Numeric;
    }
    if present
        .iter()
        .all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"))
    {
        return DataType::Boolean;
    }
    let unique: HashSet<&str> = present.iter().copied().collect();
    let ratio = unique.len() as f64 / present.len() as f64;
    if ratio < CATEGORICAL_THRESHOLD && unique.len() <= MAX_CATEGORICAL_UNIQUE {
        DataType::Categorical
    } else {
        DataType::Text
    }
}

/// Converts present cells with `convert`; null cells get the default placeholder.
fn collect_cells<'a, T: Default>(
    values: &[&'a str],
    nulls: &[bool],
    mut convert: impl FnMut(&'a str) -> T,
) -> (Vec<T>, ValidityBitmap) {
    let mut out = Vec::with_capacity(values.len());
    let mut validity = ValidityBitmap::empty();
    for (&v, &null) in values.iter().zip(nulls) {
        if null {
            out.push(T::default());
        } else {
            out.push(convert(v));
        }
        validity.push(!null);
    }
    (out, validity)
}

// ── Tests ─────────────────────────────────────────────────────────────
