use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use u_eda::config::EdaConfig;
use u_eda::logging::init_tracing;
use u_eda::pipeline::run;

/// Exploratory data analysis of a customer churn CSV.
#[derive(Parser)]
#[command(name = "u-eda")]
#[command(about = "Summaries, charts and distribution moments for a tabular dataset")]
#[command(version)]
struct Cli {
    /// CSV file to analyse
    #[arg(value_name = "PATH", default_value = "data.csv")]
    data: PathBuf,

    /// Column whose distribution is interpreted
    #[arg(short, long, default_value = "Churn Score")]
    target: String,

    /// Directory for the PNG charts
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Scatter x axis
    #[arg(long, default_value = "Longitude")]
    longitude: String,

    /// Scatter y axis
    #[arg(long, default_value = "Latitude")]
    latitude: String,

    /// Scatter colour column
    #[arg(long, default_value = "Churn Score")]
    color: String,

    /// Column counted in the bar chart
    #[arg(long, default_value = "Contract")]
    category: String,

    /// Rows shown in the head and tail previews
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,
}

impl From<Cli> for EdaConfig {
    fn from(cli: Cli) -> Self {
        EdaConfig::default()
            .data_path(cli.data)
            .target_column(cli.target)
            .output_dir(cli.output_dir)
            .scatter_columns(cli.longitude, cli.latitude, cli.color)
            .category_column(cli.category)
            .preview_rows(cli.preview_rows)
            .render_charts(!cli.no_charts)
    }
}

fn main() -> ExitCode {
    init_tracing();
    let config = EdaConfig::from(Cli::parse());

    match run(&config) {
        Ok(summary) => {
            tracing::info!(
                rows = summary.rows,
                columns = summary.columns,
                charts = summary.charts.len(),
                "analysis complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
