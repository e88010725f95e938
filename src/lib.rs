//! # u-eda
//!
//! Exploratory data analysis for tabular customer datasets.
//!
//! A run loads a CSV, prints descriptive statistics, row previews and a
//! correlation matrix, draws three charts (a location scatter, a
//! correlation heatmap, a category bar chart) and closes with the moments
//! of one target column plus a plain-language reading of its shape.
//!
//! ## Modules
//!
//! - [`dataframe`] — Column-major tabular data model (DataFrame, Column, DataType)
//! - [`csv_parser`] — CSV parsing with automatic type inference
//! - [`summary`] — describe table, head/tail previews, preprocessing report
//! - [`correlation`] — Pairwise Pearson correlation matrix
//! - [`moments`] — Mean, standard deviation, skewness, excess kurtosis and their interpretation
//! - [`plots`] — Relational, categorical and statistical PNG charts
//! - [`pipeline`] — End-to-end run
//! - [`config`] — Run configuration
//! - [`logging`] — Tracing subscriber setup
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use u_eda::csv_parser::CsvParser;
//! use u_eda::dataframe::DataType;
//! use u_eda::moments::{statistical_analysis, SkewShape};
//!
//! let csv = "Contract,Churn Score\nMonth-to-month,1\nTwo year,1\nOne year,1\nTwo year,1\nTwo year,10\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//!
//! assert_eq!(df.row_count(), 5);
//! assert_eq!(df.schema()[1].1, DataType::Numeric);
//!
//! let m = statistical_analysis(&df, "Churn Score").unwrap();
//! assert_eq!(m.shape().0, SkewShape::HighlyRight);
//! ```

pub mod config;
pub mod correlation;
pub mod csv_parser;
pub mod dataframe;
pub mod error;
pub mod logging;
pub mod moments;
pub mod pipeline;
pub mod plots;
pub mod summary;
mod table;

pub use config::EdaConfig;
pub use error::EdaError;
pub use pipeline::{run, RunSummary};
