//! ClaimLens - LLM-powered claim extractor for tech digests
//!
//! A CLI tool that sends free-form tech digest text to the Gemini API
//! with a strict response schema, validates the returned claims, and
//! renders a significance-ranked dashboard report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (configuration, transport, malformed response)

mod analysis;
mod cli;
mod config;
mod extractor;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use extractor::{ClaimExtractor, ExtractorConfig};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Digest, DigestMetadata};
use session::AnalysisSession;
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle informational modes early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }
    if args.example {
        print!("{}", extractor::prompt::EXAMPLE_INPUT);
        return Ok(());
    }

    // Initialize logging
    init_logging(&args);

    info!("ClaimLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .claimlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".claimlens.toml");

    if path.exists() {
        eprintln!("⚠️  .claimlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .claimlens.toml")?;

    println!("✅ Created .claimlens.toml with default settings.");
    println!("   Edit it to customize model, timeout, and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete extraction and reporting workflow.
async fn run_analysis(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Read the source text
    let source = read_input(&args)?;
    if source.trim().is_empty() {
        anyhow::bail!("Input is empty; nothing to analyze");
    }
    info!("Read {} chars of source text", source.len());

    // Handle --dry-run: validate input and exit
    if args.dry_run {
        return handle_dry_run(&source, &config);
    }

    // Step 2: Build the extraction session
    let extractor_config = ExtractorConfig {
        api_key: config.model.api_key.clone().unwrap_or_default(),
        model: config.model.name.clone(),
        api_url: config.model.api_url.clone(),
        temperature: config.model.temperature,
        timeout_seconds: config.model.timeout_seconds,
    };

    if !args.quiet {
        println!("🔬 Extracting claims...");
        println!("   Model: {}", config.model.name);
        println!("   Timeout: {}s", config.model.timeout_seconds);
    }

    let extractor = ClaimExtractor::with_http(extractor_config).map_err(anyhow::Error::from)?;
    let mut session = AnalysisSession::new(extractor);

    // Step 3: Run the extraction with a spinner
    let start_time = Instant::now();
    let spinner = make_spinner(args.quiet);

    let result = session.analyze(&source).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    result.map_err(anyhow::Error::from)?;
    let claims = session.claims().to_vec();
    let duration = start_time.elapsed().as_secs_f64();

    // Step 4: Build the digest
    let stats = session.stats().unwrap_or_default();
    let metadata = DigestMetadata {
        analysis_date: Utc::now(),
        model_used: config.model.name.clone(),
        source_chars: source.chars().count(),
        total_claims: claims.len(),
        duration_seconds: duration,
    };

    let digest = Digest {
        metadata,
        claims,
        stats,
    };

    // Step 5: Generate and write the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&digest)?,
        OutputFormat::Markdown => report::generate_markdown_report(&digest, &config.report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;

            if !args.quiet {
                print_summary(&digest, duration);
                println!("\n✅ Digest complete! Report saved to: {}", path);
            }
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}

/// Print the terminal summary block.
fn print_summary(digest: &Digest, duration: f64) {
    println!("\n📊 Digest Summary:");
    println!("   Claims extracted: {}", digest.stats.total);
    if digest.stats.total > 0 {
        println!(
            "   Avg. significance: {:.1}/10 | Predictions: {}",
            digest.stats.avg_significance, digest.stats.predictions
        );
    }
    println!("   Duration: {:.1}s", duration);
}

/// Handle --dry-run: show what would be sent, without calling the model.
fn handle_dry_run(source: &str, config: &Config) -> Result<()> {
    println!("\n🔍 Dry run: no model call will be made.\n");
    println!("   Model: {}", config.model.name);
    println!("   API URL: {}", config.model.api_url);
    println!(
        "   Credential: {}",
        if config.model.api_key.is_some() {
            "configured"
        } else {
            "missing (set GEMINI_API_KEY)"
        }
    );
    println!("   Source length: {} chars", source.chars().count());
    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Create the extraction spinner unless running quiet.
fn make_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Waiting for the model...");
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .claimlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Read the source text from the input file or stdin.
fn read_input(args: &Args) -> Result<String> {
    if args.reads_stdin() {
        debug!("Reading source text from stdin");
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        // validate() guarantees input is Some and exists here
        let path = args.input.as_ref().expect("input path checked by validate");
        debug!("Reading source text from {}", path.display());
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))
    }
}
