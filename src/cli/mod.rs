//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Configuration priority (highest to lowest):
  1. Command-line arguments
  2. QIC_* environment variables (a .env file in the working directory is loaded first)
  3. The JSON file given with --config
  4. Built-in defaults

Examples:
  qic -c config.json                 crawl new runs into data_dir
  qic -c config.json --strict crawl  abort a run on malformed sub-test output
  qic -c config.json report          write summary tables for stored runs";

/// QUIC interop crawler - collects goodput matrices from the interop runner
#[derive(Parser, Debug, Clone)]
#[command(name = "qic")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override the interop runner root (URL or local mirror directory)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Maximum number of servers crawled at once
    #[arg(long, global = true, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(short, long, global = true, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Abort a run on malformed output or transport errors
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once the configuration is loaded
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Crawl runs that are listed remotely but not stored yet (default)
    Crawl,
    /// Write summary tables for stored runs that have none yet
    Report,
}

impl Cli {
    /// Subcommand to run, crawl when none was given
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Crawl)
    }

    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.config.is_none() {
            return Err("Must specify a configuration file via -c/--config".to_string());
        }

        if let Some(ref base_url) = self.base_url {
            if base_url.trim().is_empty() {
                return Err("--base-url cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line:\n");
        summary.push_str(&format!("  Command: {:?}\n", self.command()));
        if let Some(ref config) = self.config {
            summary.push_str(&format!("  Config file: {}\n", config.display()));
        }
        if let Some(ref base_url) = self.base_url {
            summary.push_str(&format!("  Base URL override: {}\n", base_url));
        }
        if let Some(ref data_dir) = self.data_dir {
            summary.push_str(&format!("  Data dir override: {}\n", data_dir.display()));
        }
        if let Some(concurrency) = self.concurrency {
            summary.push_str(&format!("  Concurrency override: {}\n", concurrency));
        }
        summary.push_str(&format!("  Strict: {}\n", self.strict));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 600 {
                Err("Duration cannot exceed 600 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Concurrency must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid concurrency: {}", s)),
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["qic", "-c", "config.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.command(), Command::Crawl);
        assert!(!cli.strict);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "qic",
            "--config",
            "c.json",
            "--debug",
            "--verbose",
            "--no-color",
            "--base-url",
            "https://interop.example.org",
            "--data-dir",
            "/tmp/data",
            "--concurrency",
            "4",
            "--timeout",
            "15",
            "--strict",
            "report",
        ]);

        assert!(cli.debug);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(!cli.use_colors());
        assert_eq!(cli.base_url.as_deref(), Some("https://interop.example.org"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(cli.concurrency, Some(4));
        assert_eq!(cli.timeout, Some(15));
        assert!(cli.strict);
        assert_eq!(cli.command(), Command::Report);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["qic", "crawl", "-c", "c.json", "--strict"]);
        assert_eq!(cli.command(), Command::Crawl);
        assert!(cli.strict);
        assert!(cli.config.is_some());
    }

    #[test]
    fn test_missing_config_rejected() {
        let cli = Cli::parse_from(["qic", "crawl"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(parse_duration("30"), Ok(30));
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("601").is_err());
        assert!(parse_duration("+5").is_err());
        assert!(parse_duration("0x10").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_concurrency_parsing() {
        assert_eq!(parse_concurrency("8"), Ok(8));
        assert!(parse_concurrency("0").is_err());
        assert!(parse_concurrency("-1").is_err());
        assert!(Cli::try_parse_from(["qic", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from(["qic", "-c", "c.json", "--concurrency", "3"]);
        let summary = cli.get_config_summary();
        assert!(summary.contains("Config file: c.json"));
        assert!(summary.contains("Concurrency override: 3"));
        assert!(summary.contains("Command: Crawl"));
    }
}
