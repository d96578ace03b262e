//! Output formatting and display system
//!
//! Report grids and crawl summaries are rendered either as plain text (for
//! files and scripts) or colored for the terminal.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter, ThroughputBand};
pub use formatter::{
    cell_text, grid_rows, Alignment, FormattingOptions, OutputFormatter, PlainFormatter, RowData,
    TableLayout,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter + Send + Sync> {
        let options = FormattingOptions {
            enable_color,
            show_details: verbose,
            ..FormattingOptions::default()
        };

        if enable_color && ColoredFormatter::supports_color() {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(FormattingOptions {
                enable_color: false,
                ..options
            }))
        }
    }

    /// Formatter for text written to report files
    pub fn create_plain_formatter() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        })
    }
}
