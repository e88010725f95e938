//! Dataset summaries printed before any chart is drawn.
//!
//! [`preprocess`] gathers the four console sections of a run: descriptive
//! statistics per numeric column, the first and last rows, and the
//! correlation matrix. The DataFrame itself is left untouched.
//!
//! ```
//! use u_eda::csv_parser::CsvParser;
//! use u_eda::summary::describe;
//!
//! let csv = "Churn Score,Contract\n86,Month-to-month\n67,Two year\nNA,One year\n27,Two year\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let stats = describe(&df);
//!
//! assert_eq!(stats.len(), 1);
//! assert_eq!(stats[0].count, 3);
//! assert_eq!(stats[0].max, 86.0);
//! ```

use crate::config::EdaConfig;
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::dataframe::DataFrame;
use crate::table::{format_value, render_grid, titled};
use std::fmt;
use std::ops::Range;
use tracing::info;

/// Row labels of the describe table, in print order.
const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ── Describe ─────────────────────────────────────────────────────────

/// Descriptive statistics for one numeric column (valid values only).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub name: String,
    /// Number of valid values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1).
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    fn from_values(name: &str, valid: &[f64]) -> Self {
        let stat = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Self {
            name: name.to_string(),
            count: valid.len(),
            mean: stat(u_numflow::stats::mean(valid)),
            std_dev: if valid.len() >= 2 {
                stat(u_numflow::stats::std_dev(valid))
            } else {
                f64::NAN
            },
            min: stat(u_numflow::stats::min(valid)),
            q1: stat(u_numflow::stats::quantile(valid, 0.25)),
            median: stat(u_numflow::stats::quantile(valid, 0.5)),
            q3: stat(u_numflow::stats::quantile(valid, 0.75)),
            max: stat(u_numflow::stats::max(valid)),
        }
    }

    /// Values in [`DESCRIBE_ROWS`] order.
    fn row_values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std_dev,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Summarises every numeric column of `df`.
pub fn describe(df: &DataFrame) -> Vec<NumericSummary> {
    df.numeric_columns()
        .map(|(name, col)| {
            let valid = col.valid_numeric_values().unwrap_or_default();
            NumericSummary::from_values(name, &valid)
        })
        .collect()
}

/// Statistics as rows, columns as columns, six decimals.
pub fn format_describe(summaries: &[NumericSummary]) -> String {
    if summaries.is_empty() {
        return "No numeric columns".to_string();
    }
    let mut header = vec![String::new()];
    header.extend(summaries.iter().map(|s| s.name.clone()));

    let columns: Vec<[f64; 8]> = summaries.iter().map(NumericSummary::row_values).collect();
    let rows = DESCRIBE_ROWS
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let mut row = vec![label.to_string()];
            row.extend(columns.iter().map(|c| format_value(c[k], 6)));
            row
        })
        .collect();
    render_grid(header, rows)
}

// ── Row previews ─────────────────────────────────────────────────────

/// Renders the rows in `rows` (clamped to the frame) with their index.
pub fn format_preview(df: &DataFrame, rows: Range<usize>) -> String {
    let end = rows.end.min(df.row_count());
    let start = rows.start.min(end);

    let mut header = vec![String::new()];
    header.extend(df.column_names().iter().cloned());

    let integral: Vec<bool> = df.iter().map(|(_, col)| col.is_integral()).collect();
    let body = (start..end)
        .map(|r| {
            let mut row = vec![r.to_string()];
            row.extend(
                df.iter()
                    .zip(&integral)
                    .map(|((_, col), &int)| col.display_at(r, int)),
            );
            row
        })
        .collect();
    render_grid(header, body)
}

/// The first `n` rows.
pub fn format_head(df: &DataFrame, n: usize) -> String {
    format_preview(df, 0..n)
}

/// The last `n` rows.
pub fn format_tail(df: &DataFrame, n: usize) -> String {
    let total = df.row_count();
    format_preview(df, total.saturating_sub(n)..total)
}

// ── Preprocess ───────────────────────────────────────────────────────

/// Console sections produced before charting.
#[derive(Debug, Clone)]
pub struct PreprocessReport {
    pub summaries: Vec<NumericSummary>,
    pub describe: String,
    pub head: String,
    pub tail: String,
    pub correlation: CorrelationMatrix,
}

impl fmt::Display for PreprocessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", titled("Summary Statistics", &self.describe))?;
        writeln!(f, "{}\n", titled("Head", &self.head))?;
        writeln!(f, "{}\n", titled("Tail", &self.tail))?;
        write!(
            f,
            "{}",
            titled("Correlation Matrix", &self.correlation.format_table())
        )
    }
}

/// Builds the describe/head/tail/correlation sections for `df`.
pub fn preprocess(df: &DataFrame, config: &EdaConfig) -> PreprocessReport {
    info!(
        rows = df.row_count(),
        columns = df.column_count(),
        "summarising dataset"
    );
    let summaries = describe(df);
    let describe = format_describe(&summaries);
    PreprocessReport {
        summaries,
        describe,
        head: format_head(df, config.preview_rows),
        tail: format_tail(df, config.preview_rows),
        correlation: correlation_matrix(df),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::CsvParser;

    fn customers() -> DataFrame {
        let csv = "\
CustomerID,Contract,Tenure Months,Monthly Charges,Churn Score
3668-QPYBK,Month-to-month,2,53.85,86
9237-HQITU,Month-to-month,2,70.7,67
9305-CDSKC,Month-to-month,8,99.65,86
7892-POOKP,Month-to-month,28,104.8,84
0280-XJGEX,Month-to-month,49,103.7,89
4190-MFLUW,Month-to-month,10,55.2,78
8779-QRDMV,One year,1,39.65,100
";
        CsvParser::new().parse_str(csv).unwrap()
    }

    #[test]
    fn describe_matches_hand_computation() {
        let stats = describe(&customers());
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Tenure Months", "Monthly Charges", "Churn Score"]);

        let tenure = &stats[0];
        assert_eq!(tenure.count, 7);
        assert!((tenure.mean - 100.0 / 7.0).abs() < 1e-12);
        assert_eq!(tenure.min, 1.0);
        assert_eq!(tenure.max, 49.0);
        // Sorted: 1 2 2 8 10 28 49
        assert!((tenure.median - 8.0).abs() < 1e-12);
        assert!((tenure.q1 - 2.0).abs() < 1e-12);
        assert!((tenure.q3 - 19.0).abs() < 1e-12);
    }

    #[test]
    fn describe_single_value_has_undefined_std() {
        let df = CsvParser::new().parse_str("x\n5\nNA\n").unwrap();
        let stats = describe(&df);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].mean, 5.0);
        assert!(stats[0].std_dev.is_nan());
    }

    #[test]
    fn describe_table_layout() {
        let text = format_describe(&describe(&customers()));
        let labels: Vec<&str> = text
            .lines()
            .skip(2)
            .map(|l| l.split('|').next().unwrap_or("").trim())
            .collect();
        assert_eq!(labels, DESCRIBE_ROWS.to_vec());
        assert!(text.contains("7.000000"));
        assert_eq!(format_describe(&[]), "No numeric columns");
    }

    #[test]
    fn head_and_tail_rows() {
        let df = customers();
        let head = format_head(&df, 5);
        assert!(head.contains("3668-QPYBK"));
        assert!(head.contains("0280-XJGEX"));
        assert!(!head.contains("4190-MFLUW"));

        let tail = format_tail(&df, 5);
        assert!(!tail.contains("9237-HQITU"));
        assert!(tail.contains("9305-CDSKC"));
        assert!(tail.contains("8779-QRDMV"));
        // Integral columns print without a fractional part.
        assert!(tail.contains("100"));
        assert!(!tail.contains("100.0"));
    }

    #[test]
    fn preview_clamps_to_frame() {
        let df = customers();
        let text = format_preview(&df, 5..50);
        // header + separator + rows 5 and 6
        assert_eq!(text.lines().count(), 4);
        assert_eq!(format_tail(&df, 100).lines().count(), 2 + 7);
    }

    #[test]
    fn preprocess_sections_in_order() {
        let report = preprocess(&customers(), &EdaConfig::default());
        assert_eq!(report.correlation.len(), 3);
        let text = report.to_string();
        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("Summary Statistics") < pos("Head"));
        assert!(pos("Head") < pos("Tail"));
        assert!(pos("Tail") < pos("Correlation Matrix"));
    }
}
