//! Command-line interface

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, SpamError};
use crate::pipeline::SpamPipeline;
use crate::server::ApiError;

#[derive(Parser, Debug)]
#[command(name = "spam-filter")]
#[command(version)]
#[command(about = "Classify email text as spam or not spam", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a single email and print the result as JSON
    Predict {
        /// Email text
        text: Option<String>,

        /// Read the email text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Print the normalized form of an email (no model required)
    Normalize {
        /// Email text
        text: Option<String>,
    },

    /// Check that linguistic resources can be found
    CheckResources,

    /// Run the HTTP prediction API
    Serve {
        /// Address to bind, overrides server.bind_addr
        #[arg(long)]
        bind: Option<String>,

        /// Frontend directory, overrides server.static_dir
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Spinner shown on stderr while artifacts load
pub struct ProgressReporter {
    enabled: bool,
    spinner_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        Self {
            enabled,
            spinner_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Load the full pipeline, showing a spinner unless logs are verbose
pub fn load_pipeline(config: &Config, reporter: &ProgressReporter) -> Result<SpamPipeline> {
    let pb = reporter.add_spinner("Loading vocabulary, WordNet and model...");
    let result = SpamPipeline::from_config(config);
    pb.finish_and_clear();
    result
}

/// Resolve the email text for `predict`: positional text first, then `--file`
pub async fn read_email_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    match file {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => Err(SpamError::MissingInput),
    }
}

/// Serialize a value as a single JSON line on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Report an error the way `predict` callers expect: `{"error": ...}` on stdout
pub fn print_json_error(error: &SpamError) -> Result<()> {
    print_json(&ApiError::new(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::parse_from(["spam-filter", "predict", "Subject: hi there"]);
        match cli.command {
            Commands::Predict { text, file } => {
                assert_eq!(text.as_deref(), Some("Subject: hi there"));
                assert!(file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["spam-filter", "serve", "--bind", "127.0.0.1:9000", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Serve { bind: Some(ref b), .. } if b == "127.0.0.1:9000"
        ));
    }

    #[test]
    fn test_predict_text_and_file_conflict() {
        let result = Cli::try_parse_from(["spam-filter", "predict", "text", "--file", "a.txt"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_email_text() {
        assert_eq!(
            read_email_text(Some("body".to_string()), None).await.unwrap(),
            "body"
        );

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "from file").unwrap();
        assert_eq!(
            read_email_text(None, Some(file.path())).await.unwrap(),
            "from file"
        );

        let err = read_email_text(None, None).await.unwrap_err();
        assert!(matches!(err, SpamError::MissingInput));
    }

    #[test]
    fn test_hidden_spinner_when_disabled() {
        let reporter = ProgressReporter::new(false);
        let pb = reporter.add_spinner("loading");
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
