//! Chart rendering.
//!
//! Each chart is split into a pure data step ([`scatter_points`],
//! [`category_counts`], [`correlation_matrix`]) and a drawing step that
//! writes a PNG through the plotters bitmap backend. Only the drawing step
//! needs system fonts.

use crate::config::EdaConfig;
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::dataframe::DataFrame;
use crate::error::EdaError;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const RELATIONAL_PLOT: &str = "relational_plot.png";
pub const CATEGORICAL_PLOT: &str = "categorical_plot.png";
pub const STATISTICAL_PLOT: &str = "statistical_plot.png";

const RELATIONAL_SIZE: (u32, u32) = (1000, 600);
const CATEGORICAL_SIZE: (u32, u32) = (800, 500);
const STATISTICAL_SIZE: (u32, u32) = (1000, 600);

/// Width reserved on the right for a colour bar.
const COLORBAR_WIDTH: u32 = 120;
const COLORBAR_STEPS: usize = 128;

const FONT: &str = "sans-serif";
const POINT_ALPHA: f64 = 0.5;

/// Seaborn "deep" palette, used for categorical bars.
const DEEP: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

fn plot_err<E: Display>(e: E) -> EdaError {
    EdaError::Plot(e.to_string())
}

// ── Colormap ─────────────────────────────────────────────────────────

/// Continuous colour scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Diverging blue → grey → red.
    Coolwarm,
}

impl Colormap {
    fn anchors(self) -> &'static [(f64, (u8, u8, u8))] {
        match self {
            Self::Coolwarm => &[
                (0.0, (59, 76, 192)),
                (0.25, (141, 176, 254)),
                (0.5, (221, 220, 220)),
                (0.75, (244, 154, 123)),
                (1.0, (180, 4, 38)),
            ],
        }
    }

    /// Colour at position `t`, clamped into `[0, 1]`. NaN maps to the midpoint.
    ///
    /// ```
    /// use plotters::style::RGBColor;
    /// use u_eda::plots::Colormap;
    ///
    /// assert_eq!(Colormap::Coolwarm.sample(0.0), RGBColor(59, 76, 192));
    /// assert_eq!(Colormap::Coolwarm.sample(7.0), RGBColor(180, 4, 38));
    /// ```
    pub fn sample(self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let anchors = self.anchors();
        let k = anchors
            .windows(2)
            .position(|w| t <= w[1].0)
            .unwrap_or(anchors.len() - 2);
        let (t0, c0) = anchors[k];
        let (t1, c1) = anchors[k + 1];
        let f = (t - t0) / (t1 - t0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
        RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2))
    }
}

/// Position of `value` inside `lo..=hi`; a degenerate range maps to 0.5.
fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.5
    }
}

/// Axis range around `lo..=hi` with a 5% margin.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

fn chart_path(output_dir: &Path, name: &str) -> Result<PathBuf, EdaError> {
    std::fs::create_dir_all(output_dir)?;
    Ok(output_dir.join(name))
}

// ── Relational: scatter ──────────────────────────────────────────────

/// One scatter marker: position plus the value that picks its colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Rows with all three scatter columns present.
///
/// Fails when a column is missing or not numeric, or no row survives.
pub fn scatter_points(df: &DataFrame, config: &EdaConfig) -> Result<Vec<ScatterPoint>, EdaError> {
    let xs = df.numeric_column(&config.longitude_column)?;
    let ys = df.numeric_column(&config.latitude_column)?;
    let cs = df.numeric_column(&config.color_column)?;

    let points: Vec<ScatterPoint> = (0..df.row_count())
        .filter_map(|r| {
            Some(ScatterPoint {
                x: xs.numeric_at(r)?,
                y: ys.numeric_at(r)?,
                value: cs.numeric_at(r)?,
            })
        })
        .collect();

    let skipped = df.row_count() - points.len();
    if skipped > 0 {
        warn!(skipped, "rows with missing scatter values left out");
    }
    if points.is_empty() {
        return Err(EdaError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }
    Ok(points)
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Longitude/latitude scatter coloured by the colour column.
pub fn plot_relational_plot(
    df: &DataFrame,
    config: &EdaConfig,
    output_dir: &Path,
) -> Result<PathBuf, EdaError> {
    let points = scatter_points(df, config)?;
    let path = chart_path(output_dir, RELATIONAL_PLOT)?;

    let (x_lo, x_hi) = extent(points.iter().map(|p| p.x));
    let (y_lo, y_hi) = extent(points.iter().map(|p| p.y));
    let value_range = extent(points.iter().map(|p| p.value));
    let title = format!(
        "Customer Location ({} & {}) vs {}",
        config.latitude_column, config.longitude_column, config.color_column
    );

    {
        let root = BitMapBackend::new(&path, RELATIONAL_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let (main, bar) = root.split_horizontally(RELATIONAL_SIZE.0 - COLORBAR_WIDTH);

        let mut chart = ChartBuilder::on(&main)
            .caption(&title, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(padded(x_lo, x_hi), padded(y_lo, y_hi))
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(config.longitude_column.as_str())
            .y_desc(config.latitude_column.as_str())
            .label_style((FONT, 14))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(points.iter().map(|p| {
                let color = Colormap::Coolwarm.sample(normalize(p.value, value_range));
                Circle::new((p.x, p.y), 4, color.mix(POINT_ALPHA).filled())
            }))
            .map_err(plot_err)?;

        draw_colorbar(&bar, value_range, Some(&config.color_column))?;
        root.present().map_err(plot_err)?;
    }

    info!(path = %path.display(), points = points.len(), "wrote relational plot");
    Ok(path)
}

/// Vertical gradient with value ticks on its right edge.
fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    (lo, hi): (f64, f64),
    label: Option<&str>,
) -> Result<(), EdaError> {
    let span = if hi > lo { lo..hi } else { padded(lo, hi) };
    let (start, width) = (span.start, span.end - span.start);

    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_left(10)
        .margin_right(5)
        .right_y_label_area_size(if label.is_some() { 70 } else { 50 })
        .build_cartesian_2d(0f64..1f64, span)
        .map_err(plot_err)?;

    bar.draw_series((0..COLORBAR_STEPS).map(|k| {
        let a = start + width * k as f64 / COLORBAR_STEPS as f64;
        let b = start + width * (k + 1) as f64 / COLORBAR_STEPS as f64;
        let t = (k as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, a), (1.0, b)], Colormap::Coolwarm.sample(t).filled())
    }))
    .map_err(plot_err)?;

    let tick = |v: &f64| format!("{v:.2}");
    let mut mesh = bar.configure_mesh();
    mesh.disable_mesh()
        .disable_x_axis()
        .x_labels(0)
        .y_labels(6)
        .y_label_formatter(&tick)
        .label_style((FONT, 12));
    if let Some(label) = label {
        mesh.y_desc(label);
    }
    mesh.draw().map_err(plot_err)
}

// ── Categorical: bar counts ──────────────────────────────────────────

/// Counts per category of `column` in first-appearance order.
pub fn category_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>, EdaError> {
    let col = df
        .column_by_name(column)
        .ok_or_else(|| EdaError::ColumnNotFound {
            name: column.to_string(),
        })?;
    let counts = col.value_counts();
    if counts.is_empty() {
        return Err(EdaError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }
    Ok(counts)
}

/// Bar chart of how many customers fall into each category.
pub fn plot_categorical_plot(
    df: &DataFrame,
    config: &EdaConfig,
    output_dir: &Path,
) -> Result<PathBuf, EdaError> {
    let counts = category_counts(df, &config.category_column)?;
    let path = chart_path(output_dir, CATEGORICAL_PLOT)?;

    let labels: Vec<&str> = counts.iter().map(|(label, _)| label.as_str()).collect();
    let top = counts.iter().map(|&(_, c)| c).max().unwrap_or(0) as u32;
    let axis_label = format!("{} Type", config.category_column);
    let title = format!("Customer Count by {axis_label}");

    {
        let root = BitMapBackend::new(&path, CATEGORICAL_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (FONT, 22))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0usize..labels.len() - 1).into_segmented(),
                0u32..top + top / 10 + 1,
            )
            .map_err(plot_err)?;

        let label_of = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).copied().unwrap_or_default().to_string()
            }
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&label_of)
            .x_desc(axis_label.as_str())
            .y_desc("Number of Customers")
            .label_style((FONT, 14))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .margin(25)
                    .style_func(|v, _| match v {
                        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                            DEEP[*i % DEEP.len()].filled()
                        }
                        SegmentValue::Last => DEEP[0].filled(),
                    })
                    .data(counts.iter().enumerate().map(|(i, &(_, c))| (i, c as u32))),
            )
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
    }

    info!(path = %path.display(), categories = labels.len(), "wrote categorical plot");
    Ok(path)
}

// ── Statistical: correlation heatmap ─────────────────────────────────

/// Black on light cells, white on dark ones.
fn annotation_color(cell: RGBColor) -> &'static RGBColor {
    let luma = 0.299 * cell.0 as f64 + 0.587 * cell.1 as f64 + 0.114 * cell.2 as f64;
    if luma < 128.0 {
        &WHITE
    } else {
        &BLACK
    }
}

/// Annotated heatmap of the numeric correlation matrix.
pub fn plot_statistical_plot(df: &DataFrame, output_dir: &Path) -> Result<PathBuf, EdaError> {
    let corr = correlation_matrix(df);
    if corr.is_empty() {
        return Err(EdaError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }
    let path = chart_path(output_dir, STATISTICAL_PLOT)?;
    draw_heatmap(&corr, &path)?;
    info!(path = %path.display(), variables = corr.len(), "wrote statistical plot");
    Ok(path)
}

fn draw_heatmap(corr: &CorrelationMatrix, path: &Path) -> Result<(), EdaError> {
    let n = corr.len();
    let range = corr.value_range().unwrap_or((-1.0, 1.0));
    let longest = corr.names().iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let label_area = (longest as u32 * 7 + 10).clamp(40, 200);

    let root = BitMapBackend::new(path, STATISTICAL_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (main, bar) = root.split_horizontally(STATISTICAL_SIZE.0 - COLORBAR_WIDTH);

    let mut chart = ChartBuilder::on(&main)
        .caption("Correlation Heatmap", (FONT, 22))
        .margin(15)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
        .map_err(plot_err)?;

    // Row 0 sits at the top.
    let cell = |i: usize, j: usize| {
        let y = (n - i - 1) as f64;
        [(j as f64, y), (j as f64 + 1.0, y + 1.0)]
    };
    let defined = || {
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| corr.get(i, j).is_finite())
    };

    chart
        .draw_series(defined().map(|(i, j)| {
            let color = Colormap::Coolwarm.sample(normalize(corr.get(i, j), range));
            Rectangle::new(cell(i, j), color.filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series((0..n).flat_map(|i| {
            (0..n).map(move |j| Rectangle::new(cell(i, j), WHITE.stroke_width(1)))
        }))
        .map_err(plot_err)?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart
        .draw_series(defined().map(|(i, j)| {
            let v = corr.get(i, j);
            let fill = Colormap::Coolwarm.sample(normalize(v, range));
            let style = TextStyle::from((FONT, 13).into_font())
                .pos(centered)
                .color(annotation_color(fill));
            let [(x0, y0), _] = cell(i, j);
            Text::new(format!("{v:.2}"), (x0 + 0.5, y0 + 0.5), style)
        }))
        .map_err(plot_err)?;

    // Tick labels go on the root area so they can sit outside the plot.
    let y_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    let x_style = TextStyle::from((FONT, 13).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center))
        .transform(FontTransform::Rotate90);
    for (k, name) in corr.names().iter().enumerate() {
        let (px, _) = chart.backend_coord(&(k as f64 + 0.5, 0.0));
        let (_, py) = chart.backend_coord(&(0.0, (n - k - 1) as f64 + 0.5));
        let (left, bottom) = chart.backend_coord(&(0.0, 0.0));
        root.draw(&Text::new(name.as_str(), (px, bottom + 6), x_style.clone()))
            .map_err(plot_err)?;
        root.draw(&Text::new(name.as_str(), (left - 6, py), y_style.clone()))
            .map_err(plot_err)?;
    }

    draw_colorbar(&bar, range, None)?;
    root.present().map_err(plot_err)
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::CsvParser;

    fn customers() -> DataFrame {
        let csv = "\
CustomerID,Contract,Latitude,Longitude,Tenure Months,Churn Score
3668-QPYBK,Month-to-month,33.964131,-118.272783,2,86
9237-HQITU,Month-to-month,34.059281,-118.30742,2,67
9305-CDSKC,Two year,34.048013,-118.293953,8,86
7892-POOKP,Month-to-month,NA,-118.315709,28,84
0280-XJGEX,One year,34.099869,-118.326843,49,89
4190-MFLUW,Two year,34.089953,-118.294824,10,NA
";
        CsvParser::new().parse_str(csv).unwrap()
    }

    #[test]
    fn coolwarm_anchors_and_clamping() {
        let cm = Colormap::Coolwarm;
        assert_eq!(cm.sample(0.0), RGBColor(59, 76, 192));
        assert_eq!(cm.sample(0.5), RGBColor(221, 220, 220));
        assert_eq!(cm.sample(1.0), RGBColor(180, 4, 38));
        assert_eq!(cm.sample(-3.0), cm.sample(0.0));
        assert_eq!(cm.sample(42.0), cm.sample(1.0));
        assert_eq!(cm.sample(f64::NAN), cm.sample(0.5));
    }

    #[test]
    fn coolwarm_interpolates_between_anchors() {
        // Halfway between (59,76,192) and (141,176,254).
        assert_eq!(Colormap::Coolwarm.sample(0.125), RGBColor(100, 126, 223));
    }

    #[test]
    fn normalize_degenerate_range() {
        assert_eq!(normalize(5.0, (0.0, 10.0)), 0.5);
        assert_eq!(normalize(3.0, (3.0, 3.0)), 0.5);
        assert_eq!(normalize(0.0, (0.0, 10.0)), 0.0);
    }

    #[test]
    fn padded_range_widens_constant_axis() {
        let r = padded(2.0, 2.0);
        assert!(r.start < 2.0 && r.end > 2.0);
        let r = padded(0.0, 10.0);
        assert!((r.start + 0.5).abs() < 1e-12);
        assert!((r.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn scatter_skips_incomplete_rows() {
        let points = scatter_points(&customers(), &EdaConfig::default()).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].value, 86.0);
        assert!((points[0].x + 118.272783).abs() < 1e-9);
        assert!((points[3].y - 34.099869).abs() < 1e-9);
    }

    #[test]
    fn scatter_column_errors() {
        let df = customers();
        let config = EdaConfig::default().scatter_columns("Longitude", "Contract", "Churn Score");
        assert!(matches!(
            scatter_points(&df, &config),
            Err(EdaError::NonNumericColumn { .. })
        ));
        let config = EdaConfig::default().scatter_columns("Lon", "Latitude", "Churn Score");
        assert!(matches!(
            scatter_points(&df, &config),
            Err(EdaError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn category_counts_first_appearance_order() {
        let counts = category_counts(&customers(), "Contract").unwrap();
        assert_eq!(
            counts,
            vec![
                ("Month-to-month".to_string(), 3),
                ("Two year".to_string(), 2),
                ("One year".to_string(), 1),
            ]
        );
        assert!(matches!(
            category_counts(&customers(), "Payment Method"),
            Err(EdaError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn heatmap_needs_numeric_columns() {
        let df = CsvParser::new().parse_str("a,b\nx,y\nz,w\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            plot_statistical_plot(&df, dir.path()),
            Err(EdaError::InsufficientData { .. })
        ));
        assert!(!dir.path().join(STATISTICAL_PLOT).exists());
    }

    #[test]
    fn annotation_contrast() {
        assert_eq!(*annotation_color(RGBColor(180, 4, 38)), WHITE);
        assert_eq!(*annotation_color(RGBColor(221, 220, 220)), BLACK);
    }

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    /// A chart either lands as a PNG or fails as a plot error, never anything else.
    fn assert_png_or_plot_error(result: Result<PathBuf, EdaError>, name: &str) {
        match result {
            Ok(path) => {
                assert_eq!(path.file_name().unwrap(), name);
                let bytes = std::fs::read(&path).unwrap();
                assert_eq!(&bytes[..4], &PNG_MAGIC, "{} is not a PNG", path.display());
            }
            Err(EdaError::Plot(_)) => {}
            Err(other) => panic!("unexpected error drawing {name}: {other}"),
        }
    }

    #[test]
    fn chart_writers_reach_the_backend() {
        let df = customers();
        let config = EdaConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("charts");

        assert_png_or_plot_error(plot_relational_plot(&df, &config, &out), RELATIONAL_PLOT);
        assert_png_or_plot_error(plot_statistical_plot(&df, &out), STATISTICAL_PLOT);
        assert_png_or_plot_error(plot_categorical_plot(&df, &config, &out), CATEGORICAL_PLOT);
        assert!(out.is_dir());
    }

    #[test]
    fn chart_writers_reject_bad_columns_before_drawing() {
        let df = customers();
        let dir = tempfile::tempdir().unwrap();

        let config = EdaConfig::default().scatter_columns("Longitude", "Latitude", "CLTV");
        assert!(matches!(
            plot_relational_plot(&df, &config, dir.path()),
            Err(EdaError::ColumnNotFound { .. })
        ));
        let config = EdaConfig::default().category_column("Payment Method");
        assert!(matches!(
            plot_categorical_plot(&df, &config, dir.path()),
            Err(EdaError::ColumnNotFound { .. })
        ));
        assert!(!dir.path().join(RELATIONAL_PLOT).exists());
        assert!(!dir.path().join(CATEGORICAL_PLOT).exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_all_three_charts() {
        let df = customers();
        let config = EdaConfig::default();
        let dir = tempfile::tempdir().unwrap();

        let charts = [
            plot_relational_plot(&df, &config, dir.path()).unwrap(),
            plot_statistical_plot(&df, dir.path()).unwrap(),
            plot_categorical_plot(&df, &config, dir.path()).unwrap(),
        ];
        for chart in &charts {
            let size = std::fs::metadata(chart).unwrap().len();
            assert!(size > 0, "{} is empty", chart.display());
        }
        assert_eq!(charts[0].file_name().unwrap(), RELATIONAL_PLOT);
    }
}
