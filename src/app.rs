//! Main application orchestration and execution

use crate::{
    cli::{Cli, Command},
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    executor::{AggregationConfig, MatrixAggregator},
    fetch::create_fetcher,
    logging::LoggerFactory,
    models::Config,
    output::OutputFormatterFactory,
    report::{ReportGenerator, ReportSummary},
    scanner::{FetcherRunLister, RunScanner, ScanSummary},
    storage::{JsonArtifactStore, ManifestRegistry},
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        if config.debug {
            eprintln!("{}", crate::build_info::summary());
            eprintln!("{}", self.cli.get_config_summary());
            eprintln!("Configuration Summary:\n{}\n", display_config_summary(&config));
        }

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        match self.cli.command() {
            Command::Crawl => {
                crawl(&config).await?;
            }
            Command::Report => {
                report(&config).await?;
            }
        }

        Ok(())
    }
}

/// Crawl every listed run that is not stored yet
pub async fn crawl(config: &Config) -> Result<ScanSummary> {
    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("CRAWL").await;

    let fetcher = create_fetcher(config)?;
    logger.add_context_field("base", fetcher.base()).await;
    crate::log_debug!(logger, "Fetching from {} ({})", fetcher.base(), fetcher.describe());
    crate::log_debug!(logger, "QUIC impls with both client and server: {:?}", config.implementations());

    let lister = FetcherRunLister::new(fetcher.clone());
    let aggregator = MatrixAggregator::new(fetcher, logger.clone(), AggregationConfig::from(config));
    let store = JsonArtifactStore::new(&config.data_dir);
    let mut registry = ManifestRegistry::load(&config.data_dir)?;

    let summary = RunScanner::new(&lister, &aggregator, &store, &mut registry, &logger)
        .scan(&config.implementations())
        .await?;

    // A missing listing means nothing to do and nothing to say
    if !summary.listing_unavailable {
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        println!("{}", formatter.format_scan_summary(&summary)?);
    }

    Ok(summary)
}

/// Write summary tables for stored runs that have none yet
pub async fn report(config: &Config) -> Result<ReportSummary> {
    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("REPORT").await;

    let report_dir = config.report_dir();
    let store = JsonArtifactStore::new(&config.data_dir);
    let stored = ManifestRegistry::load(&config.data_dir)?;
    let mut reported = ManifestRegistry::load(&report_dir)?;

    let console = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    let mut generator = ReportGenerator::new(&store, &report_dir, &logger);
    if config.enable_color {
        generator = generator.with_console(&*console);
    }

    let summary = generator.generate(&stored, &mut reported).await?;

    let message = format!(
        "Reported {} of {} pending runs into {}",
        summary.reported.len(),
        summary.pending,
        report_dir.display()
    );
    if summary.missing.is_empty() {
        println!("{}", console.format_success(&message)?);
    } else {
        println!("{}", console.format_warning(&message)?);
        for run_id in &summary.missing {
            println!("{}", console.format_error(&format!("No artifact for {}", run_id))?);
        }
    }

    Ok(summary)
}
