//! Configuration assembly from the config file, environment and CLI

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
};

/// Configuration parser that layers file, environment and CLI arguments
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let path = self
            .cli
            .config
            .as_deref()
            .ok_or_else(|| AppError::config("No configuration file given (use -c/--config)"))?;

        let mut config = Config::load_from_file(path)?;

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = base_url.clone();
        }

        if let Some(ref data_dir) = self.cli.data_dir {
            config.data_dir = data_dir.clone();
        }

        if let Some(concurrency) = self.cli.concurrency {
            config.concurrency = concurrency;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if self.cli.strict {
            config.strict = true;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Base URL: {}", config.base_url));
    summary.push(format!("Data Dir: {}", config.data_dir.display()));
    summary.push(format!("Report Dir: {}", config.report_dir().display()));
    summary.push(format!("Implementations: {}", config.implementations().join(", ")));
    let excluded = config.excluded_implementations();
    if !excluded.is_empty() {
        summary.push(format!("Excluded: {}", excluded.join(", ")));
    }
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Concurrency: {}", config.concurrency));
    if let Some(ref proxy) = config.proxy {
        summary.push(format!("Proxy: {}", proxy));
    }
    summary.push(format!("Strict: {}", config.strict));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
