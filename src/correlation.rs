//! Pearson correlation across the numeric columns of a DataFrame.
//!
//! Missing cells are handled pairwise: each coefficient uses only the rows
//! where both columns hold a value. A pair without at least two shared
//! observations, or with a constant column, has no defined coefficient
//! and is reported as NaN.
//!
//! ```
//! use u_eda::correlation::correlation_matrix;
//! use u_eda::csv_parser::CsvParser;
//!
//! let csv = "Tenure Months,Churn Score,Contract\n\
//!            2,86,Month-to-month\n8,67,Month-to-month\n28,86,Two year\n49,84,One year\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let corr = correlation_matrix(&df);
//!
//! assert_eq!(corr.len(), 2); // Contract is not numeric
//! assert!((corr.get(0, 0) - 1.0).abs() < 1e-12);
//! assert_eq!(corr.get(0, 1), corr.get(1, 0));
//! ```

use crate::dataframe::{Column, DataFrame};
use crate::table::{format_value, render_grid};
use tracing::debug;

/// Minimum shared observations for a defined coefficient.
const MIN_PAIRED: usize = 2;

/// Symmetric correlation matrix over named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    /// Row-major `n × n` coefficients.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Number of variables (rows = columns).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Variable names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coefficient at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    /// Smallest and largest finite coefficient, `None` when nothing is defined.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Console table with six decimals per coefficient.
    pub fn format_table(&self) -> String {
        let mut header = vec![String::new()];
        header.extend(self.names.iter().cloned());
        let rows = (0..self.len())
            .map(|i| {
                let mut row = vec![self.names[i].clone()];
                row.extend((0..self.len()).map(|j| format_value(self.get(i, j), 6)));
                row
            })
            .collect();
        render_grid(header, rows)
    }
}

/// Computes Pearson correlation over every numeric column of `df`.
pub fn correlation_matrix(df: &DataFrame) -> CorrelationMatrix {
    let (names, columns): (Vec<String>, Vec<&Column>) = df
        .numeric_columns()
        .map(|(name, col)| (name.to_string(), col))
        .unzip();

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pairwise_pearson(columns[i], columns[j]);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    debug!(variables = n, "computed correlation matrix");
    CorrelationMatrix { names, values }
}

/// Pearson coefficient over the rows where both columns are present.
fn pairwise_pearson(a: &Column, b: &Column) -> f64 {
    let Some((xs, ys)) = a.numeric_pairs(b) else {
        return f64::NAN;
    };
    if xs.len() < MIN_PAIRED || is_constant(&xs) || is_constant(&ys) {
        return f64::NAN;
    }
    if std::ptr::eq(a, b) {
        return 1.0;
    }

    u_analytics::correlation::pearson(&xs, &ys).map_or(f64::NAN, |pr| pr.r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

// ── Tests ─────────────────────────────────────────────────────────────
