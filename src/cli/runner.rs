//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::HarvestConfig;
use crate::engine::HarvestEngine;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                term,
                year,
                page_size,
                max_records,
                output,
                api_key,
            } => {
                let config = self.resolve_config(
                    term.as_deref(),
                    year.as_deref(),
                    *page_size,
                    *max_records,
                    output.clone(),
                    api_key.clone(),
                )?;
                self.harvest(config).await
            }
            Commands::Count {
                term,
                year,
                page_size,
            } => {
                let config =
                    self.resolve_config(term.as_deref(), year.as_deref(), *page_size, None, None, None)?;
                self.count(config).await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file (when given) and fold CLI overrides on top
    fn resolve_config(
        &self,
        term: Option<&str>,
        year: Option<&str>,
        page_size: Option<u64>,
        max_records: Option<usize>,
        output: Option<PathBuf>,
        api_key: Option<String>,
    ) -> Result<HarvestConfig> {
        let mut config = match (&self.cli.config, term) {
            (Some(path), _) => HarvestConfig::from_yaml_file(path)?,
            (None, Some(term)) => {
                let year = year.ok_or_else(|| {
                    Error::config("--year is required when no config file is given")
                })?;
                HarvestConfig::for_year(term, year)
            }
            (None, None) => {
                return Err(Error::config(
                    "no configuration: pass --config or --term with --year",
                ))
            }
        };

        if let Some(term) = term {
            config.query.term = term.to_string();
        }
        if let Some(year) = year {
            config.query.mindate = year.to_string();
            config.query.maxdate = year.to_string();
        }
        if let Some(page_size) = page_size {
            config.page_size = page_size;
        }
        if let Some(max_records) = max_records {
            config.max_records = max_records;
        }
        if let Some(output) = output {
            config.output = output;
        }
        if api_key.is_some() {
            config.api_key = api_key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Execute a full harvest
    async fn harvest(&self, config: HarvestConfig) -> Result<()> {
        let output = config.output.clone();
        let engine = HarvestEngine::from_config(config)?;
        let stats = engine.run().await?;

        println!("{stats}");
        println!("report written to {}", output.display());
        Ok(())
    }

    /// Report the total count and page count without fetching any pages
    async fn count(&self, config: HarvestConfig) -> Result<()> {
        let engine = HarvestEngine::from_config(config)?;
        let (total, pages) = engine.count().await?;

        println!("{total} records across {pages} pages");
        Ok(())
    }

    /// Validate the configuration file
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("validate requires --config"))?;
        let config = HarvestConfig::from_yaml_file(path)?;

        info!(
            term = config.query.term,
            mindate = config.query.mindate,
            maxdate = config.query.maxdate,
            "configuration is valid"
        );
        println!("{} is valid", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let cli = parse(&[
            "pubharvest",
            "run",
            "--term",
            "cancer",
            "--year",
            "2014",
            "--page-size",
            "100",
            "--max-records",
            "500",
        ]);
        let runner = Runner::new(cli);

        let Commands::Run {
            term,
            year,
            page_size,
            max_records,
            output,
            api_key,
        } = &runner.cli.command
        else {
            panic!("expected run command");
        };
        let config = runner
            .resolve_config(
                term.as_deref(),
                year.as_deref(),
                *page_size,
                *max_records,
                output.clone(),
                api_key.clone(),
            )
            .unwrap();

        assert_eq!(config.query.term, "cancer");
        assert_eq!(config.query.mindate, "2014");
        assert_eq!(config.query.maxdate, "2014");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_records, 500);
    }

    #[test]
    fn test_resolve_config_requires_year_without_file() {
        let cli = parse(&["pubharvest", "run", "--term", "cancer"]);
        let runner = Runner::new(cli);
        let result = runner.resolve_config(Some("cancer"), None, None, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_config_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "query:\n  term: '2014'\n  mindate: '2014'\n  maxdate: '2014'\n"
        )
        .unwrap();
        let path = file.path().to_path_buf();

        let cli = Cli::try_parse_from([
            "pubharvest",
            "--config",
            path.to_str().unwrap(),
            "run",
            "--term",
            "heart",
            "--page-size",
            "25",
        ])
        .unwrap();
        let runner = Runner::new(cli);
        let config = runner
            .resolve_config(Some("heart"), None, Some(25), None, None, None)
            .unwrap();

        assert_eq!(config.query.term, "heart");
        assert_eq!(config.query.mindate, "2014");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_resolve_config_rejects_missing_everything() {
        let cli = parse(&["pubharvest", "count"]);
        let runner = Runner::new(cli);
        assert!(runner
            .resolve_config(None, None, None, None, None, None)
            .is_err());
    }
}
