//! Column-major DataFrame for tabular data.
//!
//! The [`DataFrame`] stores named, typed columns side by side. Each column
//! carries a [`ValidityBitmap`] so that missing cells survive loading and
//! are skipped by every statistic downstream.
//!
//! # Column Types
//!
//! | Type | Storage | Use case |
//! |------|---------|----------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` + bitmap | Scores, charges, coordinates |
//! | [`Boolean`](Column::Boolean) | `Vec<bool>` + bitmap | Yes/no style flags |
//! | [`Categorical`](Column::Categorical) | Dictionary + `Vec<u32>` | Contract type, payment method |
//! | [`Text`](Column::Text) | `Vec<String>` + bitmap | Identifiers, free-form reasons |
//!
//! # Example
//!
//! ```
//! use u_eda::dataframe::{Column, DataFrame, ValidityBitmap};
//!
//! let mut df = DataFrame::new();
//! df.add_column(
//!     "Churn Score".to_string(),
//!     Column::numeric(vec![86.0, 67.0, 27.0], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.numeric_columns().count(), 1);
//! ```

use crate::error::EdaError;
use std::collections::HashMap;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap, one bit per row (1 = present, 0 = null).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let mut bits = vec![u64::MAX; len.div_ceil(64)];
        if let Some(last) = bits.last_mut() {
            let tail = len % 64;
            if tail != 0 {
                *last = (1u64 << tail) - 1;
            }
        }
        Self { bits, len }
    }

    /// Creates a bitmap where all `len` positions are null.
    pub fn all_invalid(len: usize) -> Self {
        Self {
            bits: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Creates an empty bitmap.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Returns `true` if row `idx` holds a value.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Marks row `idx` as null.
    #[inline]
    pub fn set_invalid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Appends one row.
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        if idx / 64 >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[idx / 64] |= 1u64 << (idx % 64);
        }
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of null rows.
    pub fn null_count(&self) -> usize {
        self.len - self.valid_count()
    }

    /// Number of rows holding a value.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the indices of rows holding a value.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_valid(i))
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Semantic data type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Integer or floating values (stored as `f64`).
    Numeric,
    /// `true`/`false` values.
    Boolean,
    /// Low-cardinality strings (dictionary-encoded).
    Categorical,
    /// High-cardinality or free-form strings.
    Text,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Numeric => "Numeric",
            Self::Boolean => "Boolean",
            Self::Categorical => "Categorical",
            Self::Text => "Text",
        };
        f.write_str(name)
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with a validity bitmap.
///
/// Null positions hold a placeholder (0.0, false, index 0, empty string)
/// that must never be read without checking validity first.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    Boolean {
        values: Vec<bool>,
        validity: ValidityBitmap,
    },
    /// `dictionary` holds distinct values in first-appearance order;
    /// `indices` maps each row into it.
    Categorical {
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    },
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    pub fn numeric(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric { values, validity }
    }

    pub fn boolean(values: Vec<bool>, validity: ValidityBitmap) -> Self {
        Self::Boolean { values, validity }
    }

    pub fn categorical(
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    ) -> Self {
        Self::Categorical {
            dictionary,
            indices,
            validity,
        }
    }

    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Returns the data type of this column.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { .. } => DataType::Numeric,
            Self::Boolean { .. } => DataType::Boolean,
            Self::Categorical { .. } => DataType::Categorical,
            Self::Text { .. } => DataType::Text,
        }
    }

    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. }
            | Self::Boolean { validity, .. }
            | Self::Categorical { validity, .. }
            | Self::Text { validity, .. } => validity,
        }
    }

    pub fn len(&self) -> usize {
        self.validity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Raw numeric storage (nulls included as placeholders).
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Numeric value at `idx`, `None` when null or not numeric.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, validity } if validity.is_valid(idx) => Some(values[idx]),
            _ => None,
        }
    }

    /// Valid numeric values with nulls dropped.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric { values, validity } => {
                Some(validity.valid_indices().map(|i| values[i]).collect())
            }
            _ => None,
        }
    }

    /// Aligned values of two numeric columns over the rows where both are present.
    ///
    /// ```
    /// use u_eda::dataframe::{Column, ValidityBitmap};
    ///
    /// let mut va = ValidityBitmap::all_valid(3);
    /// va.set_invalid(1);
    /// let a = Column::numeric(vec![1.0, 0.0, 3.0], va);
    /// let b = Column::numeric(vec![4.0, 5.0, 6.0], ValidityBitmap::all_valid(3));
    /// let (xs, ys) = a.numeric_pairs(&b).unwrap();
    /// assert_eq!(xs, vec![1.0, 3.0]);
    /// assert_eq!(ys, vec![4.0, 6.0]);
    /// ```
    pub fn numeric_pairs(&self, other: &Column) -> Option<(Vec<f64>, Vec<f64>)> {
        let (a, b) = (self.as_numeric()?, other.as_numeric()?);
        let n = self.len().min(other.len());
        Some(
            (0..n)
                .filter(|&i| self.is_valid(i) && other.is_valid(i))
                .map(|i| (a[i], b[i]))
                .unzip(),
        )
    }

    /// Category or text label at `idx`.
    pub fn label_at(&self, idx: usize) -> Option<&str> {
        if !self.is_valid(idx) {
            return None;
        }
        match self {
            Self::Categorical {
                dictionary,
                indices,
                ..
            } => dictionary.get(indices[idx] as usize).map(String::as_str),
            Self::Text { values, .. } => Some(&values[idx]),
            _ => None,
        }
    }

    /// Whether every valid value of a numeric column is a whole number.
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Numeric { values, validity } => validity
                .valid_indices()
                .all(|i| values[i].is_finite() && values[i].fract() == 0.0),
            _ => false,
        }
    }

    /// Renders one cell for a preview table. Nulls render as `NaN`.
    pub fn display_at(&self, idx: usize, integral: bool) -> String {
        if !self.is_valid(idx) {
            return "NaN".to_string();
        }
        match self {
            Self::Numeric { values, .. } if integral => format!("{}", values[idx] as i64),
            Self::Numeric { values, .. } => format!("{}", values[idx]),
            Self::Boolean { values, .. } => (if values[idx] { "True" } else { "False" }).to_string(),
            Self::Categorical { .. } | Self::Text { .. } => {
                self.label_at(idx).unwrap_or_default().to_string()
            }
        }
    }

    /// Counts per distinct value in first-appearance order, nulls excluded.
    ///
    /// Numeric columns are counted by their display form.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let validity = self.validity();
        match self {
            Self::Categorical {
                dictionary,
                indices,
                ..
            } => {
                let mut counts = vec![0usize; dictionary.len()];
                let mut order = Vec::new();
                for i in validity.valid_indices() {
                    let k = indices[i] as usize;
                    if counts[k] == 0 {
                        order.push(k);
                    }
                    counts[k] += 1;
                }
                order
                    .into_iter()
                    .map(|k| (dictionary[k].clone(), counts[k]))
                    .collect()
            }
            _ => {
                let integral = self.is_integral();
                let mut slots: HashMap<String, usize> = HashMap::new();
                let mut out: Vec<(String, usize)> = Vec::new();
                for i in validity.valid_indices() {
                    let key = self.display_at(i, integral);
                    match slots.get(&key) {
                        Some(&slot) => out[slot].1 += 1,
                        None => {
                            slots.insert(key.clone(), out.len());
                            out.push((key, 1));
                        }
                    }
                }
                out
            }
        }
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Column-major table of equally long, named columns.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named column.
    ///
    /// Fails with [`EdaError::DimensionMismatch`] when the column length
    /// differs from the rows already present.
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), EdaError> {
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(EdaError::DimensionMismatch {
                expected: self.row_count,
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Looks up a column that must exist and be numeric.
    pub fn numeric_column(&self, name: &str) -> Result<&Column, EdaError> {
        let col = self
            .column_by_name(name)
            .ok_or_else(|| EdaError::ColumnNotFound {
                name: name.to_string(),
            })?;
        match col.data_type() {
            DataType::Numeric => Ok(col),
            _ => Err(EdaError::NonNumericColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Iterates over `(name, column)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// The numeric-only projection: booleans, categoricals and text are skipped.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.iter()
            .filter(|(_, col)| col.data_type() == DataType::Numeric)
    }

    /// Column names with their inferred types.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.iter().map(|(n, c)| (n, c.data_type())).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
