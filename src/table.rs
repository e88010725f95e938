//! ASCII table rendering for console output.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

/// Renders a header row plus data rows as a table.
///
/// The first column is the row label; every other column is right-aligned.
pub fn render_grid(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::psql());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Prefixes `body` with an underlined title.
pub fn titled(title: &str, body: &str) -> String {
    format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), body)
}

/// Fixed-point rendering with `NaN` for undefined values.
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_contains_cells() {
        let out = render_grid(
            vec!["".into(), "Churn Score".into()],
            vec![vec!["mean".into(), "58.699418".into()]],
        );
        assert!(out.contains("Churn Score"));
        assert!(out.contains("58.699418"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn title_underline_matches_length() {
        let out = titled("Head", "x");
        assert_eq!(out, "Head\n====\nx");
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(0.123456789, 6), "0.123457");
        assert_eq!(format_value(f64::NAN, 2), "NaN");
        assert_eq!(format_value(-1.0, 2), "-1.00");
    }
}
