//! Probe-Batch main entry point
//!
//! This is the command-line interface for the Probe-Batch request runner.

use clap::Parser;
use probe_batch::batch::{run_batch, BatchExecutor, BatchRequest, ExecutorSettings, HttpProbe};
use probe_batch::challenge::{ChallengeProvider, PromptChallengeProvider, StaticChallengeProvider};
use probe_batch::config::{load_config_with_hash, Config};
use probe_batch::output::{print_progress, print_summary, BatchSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Probe-Batch: a paced, challenge-aware request runner
///
/// Sends COUNT sequential requests to the configured endpoint, one per
/// pacing interval. When the server asks for a CAPTCHA the batch pauses
/// until a challenge token is supplied, then carries on where it stopped.
#[derive(Parser, Debug)]
#[command(name = "probe-batch")]
#[command(version)]
#[command(about = "A paced, challenge-aware request runner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Number of requests to send
    #[arg(value_name = "COUNT", required_unless_present = "dry_run")]
    count: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Challenge token to use instead of prompting for one
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Validate config and show what would be sent without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // Reject bad or oversized counts before anything is sent
    let count = cli.count.as_deref().unwrap_or_default();
    let request = match count
        .parse::<BatchRequest>()
        .and_then(|r| r.check_limit(config.probe.max_batch_size))
    {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Rejected batch size: {}", e);
            return Err(e.into());
        }
    };

    handle_batch(config, request, cli.token).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("probe_batch=info,warn"),
            1 => EnvFilter::new("probe_batch=debug,info"),
            2 => EnvFilter::new("probe_batch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Probe-Batch Dry Run ===\n");

    println!("Probe:");
    println!("  Endpoint: {}", config.probe.endpoint);
    println!("  Request interval: {}ms", config.probe.request_interval_ms);
    if config.probe.request_timeout_ms > 0 {
        println!("  Request timeout: {}ms", config.probe.request_timeout_ms);
    } else {
        println!("  Request timeout: none");
    }
    println!("  Credential header: {}", config.probe.credential_header);
    println!("  Max batch size: {}", config.probe.max_batch_size);

    println!("\nUser Agent:");
    println!("  {}/{}", config.user_agent.name, config.user_agent.version);

    println!("\nChallenge:");
    println!("  Site key: {}", config.challenge.site_key);
    if let Some(script_url) = &config.challenge.script_url {
        println!("  Widget script: {}", script_url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main batch run
async fn handle_batch(
    config: Config,
    request: BatchRequest,
    token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let probe = HttpProbe::from_config(&config)?;
    let executor = BatchExecutor::new(probe, ExecutorSettings::from(&config.probe));

    let provider: Box<dyn ChallengeProvider> = match token {
        Some(token) => Box::new(StaticChallengeProvider::new(token)),
        None => Box::new(PromptChallengeProvider::stdio(
            config.challenge.script_url.clone(),
        )),
    };

    tracing::info!(
        "Sending {} requests to {} every {}ms",
        request.total_count(),
        config.probe.endpoint,
        config.probe.request_interval_ms
    );

    let progress = tokio::spawn(print_progress(executor.subscribe()));

    let result = run_batch(
        &executor,
        provider.as_ref(),
        &config.challenge.site_key,
        i64::from(request.total_count()),
    )
    .await;

    let last_state = executor.snapshot();
    drop(executor);
    if let Err(e) = progress.await? {
        tracing::warn!("Progress output failed: {}", e);
    }

    print_summary(&BatchSummary::from_state(&last_state));

    match result {
        Ok(_) => {
            tracing::info!("Batch completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Batch failed: {}", e);
            Err(e.into())
        }
    }
}
