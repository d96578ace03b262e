//! Core formatting trait and the plain text implementation
//!
//! Grids are laid out on plain cell text first; styled formatters decorate
//! the already padded cells so ANSI codes never disturb column widths.

use crate::{
    error::{AppError, Result},
    scanner::ScanSummary,
    stats::{CellStatistics, MatrixStatistics},
    types::TestKind,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format one matrix as a client x server grid
    fn format_grid(&self, run_id: &str, kind: TestKind, stats: &MatrixStatistics) -> Result<String>;

    /// Format the outcome of a crawl
    fn format_scan_summary(&self, summary: &ScanSummary) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Widest a single column may grow
    pub max_column_width: usize,
    /// Append min/max and sample counts below each grid
    pub show_details: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            table_borders: true,
            max_column_width: 24,
            show_details: false,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Table layout computed from plain cell text
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub widths: Vec<usize>,
    pub borders: bool,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Text shown in a grid cell
pub fn cell_text(stats: Option<&CellStatistics>) -> String {
    match stats {
        Some(stats) => format!("{:.0} ± {:.0}", stats.mean, stats.std_dev),
        None => "-".to_string(),
    }
}

/// Header row followed by one row per client
pub fn grid_rows(stats: &MatrixStatistics) -> (RowData, Vec<RowData>) {
    let implementations = stats.implementations();
    let mut header = vec!["client \\ server".to_string()];
    header.extend(implementations.iter().cloned());

    let rows = implementations
        .iter()
        .map(|client| {
            let mut row = vec![client.clone()];
            row.extend(
                implementations
                    .iter()
                    .map(|server| cell_text(stats.cell(client, server))),
            );
            row
        })
        .collect();

    (header, rows)
}

pub(crate) fn write_err(e: std::fmt::Error) -> AppError {
    AppError::report(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Calculate column widths over header and rows
    pub fn calculate_layout(&self, header: &[String], rows: &[RowData]) -> TableLayout {
        let columns = rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let widths = (0..columns)
            .map(|idx| {
                header
                    .get(idx)
                    .into_iter()
                    .chain(rows.iter().filter_map(|row| row.get(idx)))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .min(self.options.max_column_width)
            })
            .collect();

        TableLayout {
            widths,
            borders: self.options.table_borders,
        }
    }

    /// Render a table, passing each padded cell through `style`
    ///
    /// `style` receives the row index (`None` for the header), the column
    /// index and the padded text.
    pub fn render_table<F>(&self, header: &[String], rows: &[RowData], style: F) -> String
    where
        F: Fn(Option<usize>, usize, String) -> String,
    {
        let layout = self.calculate_layout(header, rows);
        let mut output = String::new();

        if layout.borders {
            output.push_str(&Self::horizontal_border(&layout.widths));
            output.push('\n');
        }
        output.push_str(&self.render_row(header, &layout, |col, text| style(None, col, text)));
        output.push('\n');
        if layout.borders {
            output.push_str(&Self::horizontal_border(&layout.widths));
            output.push('\n');
        }

        for (row_idx, row) in rows.iter().enumerate() {
            output.push_str(&self.render_row(row, &layout, |col, text| style(Some(row_idx), col, text)));
            output.push('\n');
        }

        if layout.borders {
            output.push_str(&Self::horizontal_border(&layout.widths));
            output.push('\n');
        }

        output
    }

    fn render_row<F>(&self, data: &[String], layout: &TableLayout, style: F) -> String
    where
        F: Fn(usize, String) -> String,
    {
        let mut row = String::new();
        if layout.borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(layout.widths.iter()).enumerate() {
            let alignment = if idx == 0 { Alignment::Left } else { Alignment::Right };
            let padded = style(idx, Self::align_text(cell, width, alignment));

            if layout.borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn horizontal_border(widths: &[usize]) -> String {
        let mut border = String::new();
        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }
        border
    }

    /// Align text within specified width
    pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.chars().take(width).collect();
        }

        let padding = width - len;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        }
    }

    /// Lines printed under a grid
    pub fn grid_footer(&self, stats: &MatrixStatistics) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Populated pairs: {}/{}", stats.populated(), stats.capacity()).map_err(write_err)?;

        if let Some((client, server, best)) = stats.best_pair() {
            writeln!(output, "Best pair:  {} -> {} ({:.0} kbps)", client, server, best.mean).map_err(write_err)?;
        }
        if let Some((client, server, worst)) = stats.worst_pair() {
            writeln!(output, "Worst pair: {} -> {} ({:.0} kbps)", client, server, worst.mean).map_err(write_err)?;
        }

        if self.options.show_details {
            for client in stats.implementations() {
                for server in stats.implementations() {
                    if let Some(cell) = stats.cell(client, server) {
                        writeln!(
                            output,
                            "  {} -> {}: n={} min={} max={}",
                            client, server, cell.count, cell.min, cell.max
                        )
                        .map_err(write_err)?;
                    }
                }
            }
        }

        Ok(output)
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(write_err)?;
        writeln!(output, "  {}  ", title).map_err(write_err)?;
        write!(output, "{}", border).map_err(write_err)?;

        Ok(output)
    }

    fn format_grid(&self, run_id: &str, kind: TestKind, stats: &MatrixStatistics) -> Result<String> {
        let mut output = self.format_header(&format!("{} {}", run_id, kind.label()))?;
        output.push('\n');

        if stats.implementations().is_empty() {
            output.push_str("No results\n");
            return Ok(output);
        }

        let (header, rows) = grid_rows(stats);
        output.push_str(&self.render_table(&header, &rows, |_, _, text| text));
        output.push_str(&self.grid_footer(stats)?);
        Ok(output)
    }

    fn format_scan_summary(&self, summary: &ScanSummary) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Crawl Summary:").map_err(write_err)?;
        writeln!(output, "-------------").map_err(write_err)?;
        writeln!(output, "Listed runs:    {}", summary.listed).map_err(write_err)?;
        writeln!(output, "Already stored: {}", summary.already_known).map_err(write_err)?;
        write!(output, "New runs:       {}", summary.processed.len()).map_err(write_err)?;
        for run_id in &summary.processed {
            write!(output, "\n  {}", run_id).map_err(write_err)?;
        }
        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
