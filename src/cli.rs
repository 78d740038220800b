//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Salesight - natural-language sales analytics over POS order data
///
/// Ask questions about your order history in plain English. Metrics are
/// computed locally and narrated through a local AI model.
///
/// Examples:
///   salesight "how much did we make yesterday"
///   salesight "top 3 items last week" --model qwen2.5:14b
///   salesight --no-narrate "sales by employee" --format json
///   salesight                      (interactive prompt)
///   salesight --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Question to answer
    ///
    /// When omitted, an interactive prompt is started instead.
    #[arg(value_name = "QUESTION")]
    pub query: Option<String>,

    /// Ollama model to use for narration
    ///
    /// Can also be set via SALESIGHT_MODEL env var or .salesight.toml config.
    #[arg(short, long, default_value = "llama3.2:latest", env = "SALESIGHT_MODEL")]
    pub model: String,

    /// Ollama API endpoint URL
    #[arg(long, default_value = "http://localhost:11434", env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Orders API base URL
    ///
    /// If not specified, falls back to the config file, then
    /// http://localhost:8080.
    #[arg(long, value_name = "URL", env = "SALESIGHT_API_URL")]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesight.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text, json)
    ///
    /// JSON emits the computed facts instead of a narrated answer.
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Temperature for LLM responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.1")]
    pub temperature: f32,

    /// Request timeout in seconds for the narration call
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Answer from computed facts only, without calling the LLM
    #[arg(long)]
    pub no_narrate: bool,

    /// Generate a default .salesight.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Narrated or templated text (default)
    #[default]
    Text,
    /// Computed facts as JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate Ollama URL format (not needed when narration is off)
        if !self.no_narrate
            && !self.ollama_url.starts_with("http://")
            && !self.ollama_url.starts_with("https://")
        {
            return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            query: Some("how much did we make yesterday".to_string()),
            model: "llama3.2:latest".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            api_url: None,
            config: None,
            verbose: false,
            quiet: false,
            format: OutputFormat::Text,
            temperature: 0.1,
            timeout: None,
            no_narrate: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_ollama_url() {
        let mut args = make_args();
        args.ollama_url = "localhost:11434".to_string();
        assert!(args.validate().is_err());

        // Narration off skips the Ollama URL check
        args.no_narrate = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = Some("pos.local:9000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = 1.5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
