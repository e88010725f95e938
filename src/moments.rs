//! Distribution moments of a single column and their interpretation.
//!
//! The four moments use the same estimators as common data-frame
//! libraries: sample standard deviation (n − 1), bias-corrected skewness
//! (G1) and bias-corrected excess kurtosis (G2).
//!
//! # Example
//!
//! ```
//! use u_eda::moments::{writing, Moments};
//!
//! let m = Moments::from_values(&[1.0, 1.0, 1.0, 1.0, 10.0]);
//! assert!((m.skewness - 5f64.sqrt()).abs() < 1e-9);
//!
//! let text = writing(&m, "Churn Score");
//! assert!(text.ends_with("The data is highly right-skewed and leptokurtic (more peaked)."));
//! ```

use crate::dataframe::DataFrame;
use crate::error::EdaError;
use std::fmt;
use tracing::{info, warn};

/// Minimum observations for each moment to be defined.
const MIN_FOR_STD: usize = 2;
const MIN_FOR_SKEW: usize = 3;
const MIN_FOR_KURT: usize = 4;

/// |skewness| beyond which a distribution counts as highly skewed.
const HIGH_SKEW: f64 = 2.0;

/// Mean, standard deviation, skewness and excess kurtosis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

impl Moments {
    /// Computes all four moments; any moment lacking enough values is NaN.
    /// A constant sample has skewness and excess kurtosis 0.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        let at_least = |min: usize, v: Option<f64>| {
            if n >= min {
                v.unwrap_or(f64::NAN)
            } else {
                f64::NAN
            }
        };
        let std_dev = at_least(MIN_FOR_STD, u_numflow::stats::std_dev(values));
        // Zero spread has no asymmetry and no excess tail weight.
        let flat = std_dev == 0.0;
        let shape = |min: usize, v: Option<f64>| {
            if flat && n >= min {
                0.0
            } else {
                at_least(min, v)
            }
        };
        Self {
            mean: at_least(1, u_numflow::stats::mean(values)),
            std_dev,
            skewness: shape(MIN_FOR_SKEW, u_numflow::stats::skewness(values)),
            excess_kurtosis: shape(MIN_FOR_KURT, u_numflow::stats::kurtosis(values)),
        }
    }

    /// Skewness and tail classification of these moments.
    pub fn shape(&self) -> (SkewShape, TailShape) {
        (
            SkewShape::classify(self.skewness),
            TailShape::classify(self.excess_kurtosis),
        )
    }
}

/// Computes the moments of `column` over its present values.
///
/// Fails when the column is missing or not numeric.
pub fn statistical_analysis(df: &DataFrame, column: &str) -> Result<Moments, EdaError> {
    let values = df
        .numeric_column(column)?
        .valid_numeric_values()
        .unwrap_or_default();

    let moments = Moments::from_values(&values);
    if moments.excess_kurtosis.is_nan() {
        warn!(
            column,
            observations = values.len(),
            "too few observations for every moment to be defined"
        );
    }
    info!(
        column,
        mean = moments.mean,
        std_dev = moments.std_dev,
        skewness = moments.skewness,
        excess_kurtosis = moments.excess_kurtosis,
        "computed moments"
    );
    Ok(moments)
}

// ── Interpretation ───────────────────────────────────────────────────

/// Asymmetry class of a skewness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkewShape {
    HighlyRight,
    HighlyLeft,
    SlightlyRight,
    SlightlyLeft,
    Symmetrical,
}

impl SkewShape {
    /// Thresholds are checked in order: above 2, below −2, above 0, below 0.
    /// Exactly zero and NaN fall through to [`SkewShape::Symmetrical`].
    pub fn classify(skewness: f64) -> Self {
        if skewness > HIGH_SKEW {
            Self::HighlyRight
        } else if skewness < -HIGH_SKEW {
            Self::HighlyLeft
        } else if skewness > 0.0 {
            Self::SlightlyRight
        } else if skewness < 0.0 {
            Self::SlightlyLeft
        } else {
            Self::Symmetrical
        }
    }
}

impl fmt::Display for SkewShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HighlyRight => "highly right-skewed",
            Self::HighlyLeft => "highly left-skewed",
            Self::SlightlyRight => "slightly right-skewed",
            Self::SlightlyLeft => "slightly left-skewed",
            Self::Symmetrical => "symmetrical",
        })
    }
}

/// Tail class of an excess kurtosis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailShape {
    Leptokurtic,
    Platykurtic,
    Mesokurtic,
}

impl TailShape {
    /// Positive is leptokurtic, negative platykurtic; zero and NaN mesokurtic.
    pub fn classify(excess_kurtosis: f64) -> Self {
        if excess_kurtosis > 0.0 {
            Self::Leptokurtic
        } else if excess_kurtosis < 0.0 {
            Self::Platykurtic
        } else {
            Self::Mesokurtic
        }
    }
}

impl fmt::Display for TailShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leptokurtic => "leptokurtic (more peaked)",
            Self::Platykurtic => "platykurtic (flatter)",
            Self::Mesokurtic => "mesokurtic (normal distribution)",
        })
    }
}

/// Two-line report of the moments of `column` and the distribution shape.
pub fn writing(moments: &Moments, column: &str) -> String {
    let (skew, tail) = moments.shape();
    format!(
        "For the attribute {column}:\n\
         Mean = {}, Standard Deviation = {}, Skewness = {}, Excess Kurtosis = {}.\n\
         The data is {skew} and {tail}.",
        two_places(moments.mean),
        two_places(moments.std_dev),
        two_places(moments.skewness),
        two_places(moments.excess_kurtosis),
    )
}

/// Two decimals; NaN is written `nan`.
fn two_places(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.2}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
