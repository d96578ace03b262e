//! Colored formatter implementation with terminal color support
//!
//! Grid cells are tinted by how close their mean comes to the best pair of
//! the same matrix, a terminal stand-in for a heatmap color scale.

use super::formatter::{grid_rows, write_err, FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{error::Result, scanner::ScanSummary, stats::MatrixStatistics, types::TestKind};
use colored::*;
use std::fmt::Write as _;

/// Throughput band of a cell relative to the matrix maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputBand {
    High,   // >= 75% of the best mean
    Medium, // >= 40%
    Low,
    Empty,
}

impl ThroughputBand {
    /// Band for `mean` given the largest mean of the matrix
    pub fn classify(mean: Option<f64>, max_mean: f64) -> Self {
        match mean {
            None => Self::Empty,
            Some(_) if max_mean <= 0.0 => Self::Low,
            Some(mean) => {
                let ratio = mean / max_mean;
                if ratio >= 0.75 {
                    Self::High
                } else if ratio >= 0.4 {
                    Self::Medium
                } else {
                    Self::Low
                }
            }
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::High => Color::Green,
            Self::Medium => Color::Yellow,
            Self::Low => Color::Red,
            Self::Empty => Color::BrightBlack,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options),
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn with_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    fn colors_enabled(&self) -> bool {
        self.plain_formatter.options().enable_color
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.colors_enabled() {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Color) -> String {
        if self.colors_enabled() {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(write_err)?;
        writeln!(output, "  {}  ", self.bold(title, self.color_scheme.header)).map_err(write_err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(write_err)?;

        Ok(output)
    }

    fn format_grid(&self, run_id: &str, kind: TestKind, stats: &MatrixStatistics) -> Result<String> {
        let mut output = self.format_header(&format!("{} {}", run_id, kind.label()))?;
        output.push('\n');

        if stats.implementations().is_empty() {
            output.push_str(&self.colorize("No results", self.color_scheme.warning));
            output.push('\n');
            return Ok(output);
        }

        let implementations = stats.implementations();
        let max_mean = stats.max_mean();
        let (header, rows) = grid_rows(stats);

        let table = self.plain_formatter.render_table(&header, &rows, |row, col, text| match (row, col) {
            (None, _) | (Some(_), 0) => self.bold(&text, self.color_scheme.header),
            (Some(row), col) => {
                let client = &implementations[row];
                let server = &implementations[col - 1];
                let mean = stats.cell(client, server).map(|cell| cell.mean);
                self.colorize(&text, ThroughputBand::classify(mean, max_mean).color())
            }
        });
        output.push_str(&table);

        let footer = self.plain_formatter.grid_footer(stats)?;
        output.push_str(&self.colorize(&footer, self.color_scheme.info));
        Ok(output)
    }

    fn format_scan_summary(&self, summary: &ScanSummary) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", self.bold("Crawl Summary:", self.color_scheme.header)).map_err(write_err)?;
        writeln!(output, "{}", self.colorize("─────────────", self.color_scheme.border)).map_err(write_err)?;
        writeln!(output, "Listed runs:    {}", summary.listed).map_err(write_err)?;
        writeln!(output, "Already stored: {}", summary.already_known).map_err(write_err)?;

        let new_runs = summary.processed.len().to_string();
        let new_color = if summary.processed.is_empty() {
            self.color_scheme.info
        } else {
            self.color_scheme.success
        };
        write!(output, "New runs:       {}", self.bold(&new_runs, new_color)).map_err(write_err)?;
        for run_id in &summary.processed {
            write!(output, "\n  {}", self.colorize(run_id, self.color_scheme.success)).map_err(write_err)?;
        }
        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}
