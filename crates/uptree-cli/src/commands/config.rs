//! Config command - inspect and validate configuration

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use uptree_core::config::Config;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Check the configuration for problems
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        match self {
            ConfigCommand::Show => {
                let config = Config::load_or_default(config_path);
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&config)?);
                } else {
                    print!("{}", serde_yaml::to_string(&config)?);
                }
            }
            ConfigCommand::Validate => {
                let config = Config::load_or_default(config_path);
                let errors = config.validate();
                if errors.is_empty() {
                    formatter.success("Configuration is valid");
                } else {
                    for error in &errors {
                        formatter.error(&error.to_string());
                    }
                    anyhow::bail!("{} configuration error(s)", errors.len());
                }
            }
            ConfigCommand::Path => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "path": config_path.display().to_string(),
                    }));
                } else {
                    println!("{}", config_path.display());
                }
            }
        }

        Ok(())
    }
}
