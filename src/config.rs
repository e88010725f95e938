//! Run configuration.
//!
//! Defaults describe the customer churn dataset: `data.csv` in the working
//! directory, `Churn Score` as the analysis target, charts written next to
//! the data.
//!
//! ```
//! use u_eda::config::EdaConfig;
//!
//! let config = EdaConfig::default()
//!     .data_path("telco.csv")
//!     .target_column("CLTV")
//!     .render_charts(false);
//! assert_eq!(config.target_column, "CLTV");
//! assert_eq!(config.category_column, "Contract");
//! ```

use std::path::PathBuf;

/// Settings for one end-to-end run.
#[derive(Debug, Clone, PartialEq)]
pub struct EdaConfig {
    /// CSV file to load. Default: `data.csv`.
    pub data_path: PathBuf,
    /// Column whose moments are computed and interpreted. Default: `Churn Score`.
    pub target_column: String,
    /// Directory that receives the PNG charts. Default: `.`.
    pub output_dir: PathBuf,
    /// Scatter x axis. Default: `Longitude`.
    pub longitude_column: String,
    /// Scatter y axis. Default: `Latitude`.
    pub latitude_column: String,
    /// Scatter colour scale. Default: `Churn Score`.
    pub color_column: String,
    /// Column counted in the bar chart. Default: `Contract`.
    pub category_column: String,
    /// Rows shown in the head and tail previews. Default: 5.
    pub preview_rows: usize,
    /// Whether to draw charts at all. Default: true.
    pub render_charts: bool,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            target_column: "Churn Score".to_string(),
            output_dir: PathBuf::from("."),
            longitude_column: "Longitude".to_string(),
            latitude_column: "Latitude".to_string(),
            color_column: "Churn Score".to_string(),
            category_column: "Contract".to_string(),
            preview_rows: 5,
            render_charts: true,
        }
    }
}

impl EdaConfig {
    /// Sets the CSV file to load.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Sets the analysis target column.
    pub fn target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Sets the chart output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the scatter plot's x, y and colour columns.
    pub fn scatter_columns(
        mut self,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.longitude_column = longitude.into();
        self.latitude_column = latitude.into();
        self.color_column = color.into();
        self
    }

    /// Sets the bar chart's category column.
    pub fn category_column(mut self, name: impl Into<String>) -> Self {
        self.category_column = name.into();
        self
    }

    /// Sets the number of preview rows.
    pub fn preview_rows(mut self, n: usize) -> Self {
        self.preview_rows = n;
        self
    }

    /// Enables or disables chart rendering.
    pub fn render_charts(mut self, on: bool) -> Self {
        self.render_charts = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_customer_dataset() {
        let c = EdaConfig::default();
        assert_eq!(c.data_path, PathBuf::from("data.csv"));
        assert_eq!(c.target_column, "Churn Score");
        assert_eq!(c.color_column, "Churn Score");
        assert_eq!(c.longitude_column, "Longitude");
        assert_eq!(c.latitude_column, "Latitude");
        assert_eq!(c.preview_rows, 5);
        assert!(c.render_charts);
    }

    #[test]
    fn builder_overrides() {
        let c = EdaConfig::default()
            .output_dir("/tmp/charts")
            .scatter_columns("lon", "lat", "score")
            .category_column("Payment Method")
            .preview_rows(3);
        assert_eq!(c.output_dir, PathBuf::from("/tmp/charts"));
        assert_eq!(c.longitude_column, "lon");
        assert_eq!(c.color_column, "score");
        assert_eq!(c.category_column, "Payment Method");
        assert_eq!(c.preview_rows, 3);
    }
}
