//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// ClaimLens - LLM-powered claim extractor for tech digests
///
/// Paste a daily tech feed, newsletter, or synthesis post and get back
/// typed claims with a significance-ranked dashboard. Markdown/JSON
/// reports. Built in Rust.
///
/// Examples:
///   claimlens digest.txt
///   cat digest.txt | claimlens --format json
///   claimlens digest.txt --model gemini-2.5-pro -o dashboard.md
///   claimlens digest.txt --dry-run
///   claimlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input file containing the source text
    ///
    /// Use `-` (or omit the argument) to read from stdin.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Gemini model to use for extraction
    ///
    /// Can also be set via CLAIMLENS_MODEL env var or .claimlens.toml config.
    #[arg(
        short,
        long,
        default_value = "gemini-3-flash-preview",
        env = "CLAIMLENS_MODEL"
    )]
    pub model: String,

    /// Gemini API key
    ///
    /// Required for extraction. Usually supplied via the environment.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Gemini API endpoint URL
    #[arg(
        long,
        default_value = "https://generativelanguage.googleapis.com/v1beta",
        env = "GEMINI_API_URL"
    )]
    pub api_url: String,

    /// Output file path for the report
    ///
    /// When omitted the report is written to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .claimlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Temperature for model responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.2")]
    pub temperature: f32,

    /// Request timeout in seconds
    ///
    /// How long to wait for the model to respond. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: read and validate the input without calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// Print an example input and exit
    #[arg(long)]
    pub example: bool,

    /// Generate a default .claimlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for informational modes
        if self.init_config || self.example {
            return Ok(());
        }

        // Validate API URL format
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("API URL must start with 'http://' or 'https://'".to_string());
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

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if input.as_os_str() != "-" && !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns true when input should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        match self.input {
            None => true,
            Some(ref path) => path.as_os_str() == "-",
        }
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
            input: None,
            model: "gemini-3-flash-preview".to_string(),
            api_key: Some("key".to_string()),
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            temperature: 0.2,
            timeout: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            example: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = "localhost:1234".to_string();
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
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/nonexistent/digest.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_reads_stdin() {
        let mut args = make_args();
        assert!(args.reads_stdin());

        args.input = Some(PathBuf::from("-"));
        assert!(args.reads_stdin());

        args.input = Some(PathBuf::from("digest.txt"));
        assert!(!args.reads_stdin());
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
