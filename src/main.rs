//! fanout - fetch a list of URLs through the batch client
//!
//! Reads one URL per line, dispatches them in fan-out waves and prints one
//! JSON line per decoded response, keyed by its URL.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fanout_http::utils::logging::{LogFormat, init_subscriber};
use fanout_http::{
    BatchClient, BatchSettings, HttpRequest, ReqwestTransport, SyncedRequest, TracingLogger,
    TransportConfig, Validate,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "fanout",
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about = "Fetch many URLs concurrently in fixed-width waves with retry backoff"
)]
struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FANOUT_VERBOSE")]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "FANOUT_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every URL listed in a file and print the JSON bodies
    Fetch(FetchArgs),

    /// Check a settings file without sending anything
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// File with one URL per line, or `-` for stdin
    #[arg(short, long, env = "FANOUT_URLS")]
    urls: PathBuf,

    /// YAML settings file; FANOUT_* environment variables override it
    #[arg(short, long, env = "FANOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60", env = "FANOUT_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Print a summary of failed URLs to stderr
    #[arg(long)]
    report: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// YAML settings file
    #[arg(short, long, env = "FANOUT_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_subscriber(format, directive);

    let result = match cli.command {
        Commands::Fetch(args) => run_fetch(args).await,
        Commands::Validate(args) => run_validate(args).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_settings(path: Option<&Path>) -> Result<BatchSettings> {
    let settings = match path {
        Some(path) => BatchSettings::from_file(path)
            .await
            .with_context(|| format!("loading settings from {}", path.display()))?
            .apply_env()?,
        None => BatchSettings::from_env()?,
    };
    Ok(settings)
}

async fn read_urls(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("reading URLs from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading URLs from {}", path.display()))?
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn run_fetch(args: FetchArgs) -> Result<ExitCode> {
    let settings = load_settings(args.config.as_deref()).await?;
    let config = settings.into_config(TracingLogger::shared());

    let transport = ReqwestTransport::new(&TransportConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        ..TransportConfig::default()
    })?;
    let client: BatchClient<serde_json::Value> = BatchClient::new(config, Arc::new(transport))?;

    let mut items = Vec::new();
    for url in read_urls(&args.urls).await? {
        match HttpRequest::get(&url) {
            Ok(request) => items.push(SyncedRequest::with_key(request, url)),
            Err(e) => warn!("Skipping {}: {}", url, e),
        }
    }

    info!(
        "Dispatching {} requests in waves of {}",
        items.len(),
        client.config().iteration_step
    );
    let report = client.dispatch_with_report(items).await;

    for synced in &report.results {
        println!("{}", serde_json::to_string(synced)?);
    }

    if args.report {
        eprintln!(
            "{} succeeded, {} failed ({} waves + {} tail) in {:?}",
            report.summary.succeeded,
            report.summary.failed,
            report.summary.waves,
            report.summary.tail,
            report.summary.total_duration
        );
        for failure in &report.failures {
            eprintln!(
                "  {}: {}",
                failure.sync_key.as_deref().unwrap_or("<unknown>"),
                failure.error
            );
        }
    }

    if report.is_total_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn run_validate(args: ValidateArgs) -> Result<ExitCode> {
    let settings = load_settings(Some(&args.config)).await?;
    let config = settings.clone().into_config(TracingLogger::shared());
    if let Err(message) = config.validate() {
        anyhow::bail!(message);
    }

    let missing = config.missing_backoff_keys();
    println!("{}", serde_yaml::to_string(&settings)?);
    if !missing.is_empty() {
        println!("# no backoff configured for attempts left: {:?}", missing);
    }
    Ok(ExitCode::SUCCESS)
}
