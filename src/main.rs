//! CLI entry point for the API Health Rater tool.
//!
//! Provides subcommands for scoring a single batch of request metrics and
//! for polling a metrics endpoint on a schedule.

use anyhow::Result;
use api_health_rater::{
    fetch::{
        BasicClient,
        auth::{ApiKey, UrlParam},
        fetch_bytes,
    },
    output::{append_report, to_json},
    parser::parse_batch,
    scoring::report::analyze,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "api_health_rater")]
#[command(about = "A tool to score API request metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AuthArgs {
    /// Optional: API key for the metrics endpoint (sent as a Bearer header
    /// unless --api-key-param is also given)
    #[arg(long)]
    api_key: Option<String>,

    /// Optional: send the API key as this URL query parameter instead of a
    /// header
    #[arg(long)]
    api_key_param: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a metrics batch from a JSON file or URL
    Score {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Optional: CSV file to append flattened score rows to
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Poll a metrics endpoint on a schedule, appending scores to a CSV
    Poll {
        /// URL serving the metrics batch
        url: String,

        /// CSV file to append score rows to
        #[arg(short, long, default_value = "scores.csv")]
        output: String,

        /// Sample rate: query the endpoint every X seconds
        #[arg(short = 'r', long, default_value_t = 60)]
        sample_rate: u64,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        num_samples: usize,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/api_health_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("api_health_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            source,
            output,
            auth,
        } => {
            let bytes = fetcher(&source, &auth).await?;
            let samples = parse_batch(&bytes)?;
            let report = analyze(&samples);

            println!("{}", to_json(&report)?);

            if let Some(path) = output {
                append_report(&path, &report)?;
            }
        }
        Commands::Poll {
            url,
            output,
            sample_rate,
            num_samples,
            auth,
        } => {
            poll(&url, &output, sample_rate, num_samples, &auth).await?;
        }
    }

    Ok(())
}

/// Loads a metrics batch from a local file path or fetches it over HTTP,
/// applying the configured endpoint authentication.
#[tracing::instrument(skip(auth), fields(source = %source))]
async fn fetcher(source: &str, auth: &AuthArgs) -> Result<Vec<u8>> {
    if !source.starts_with("http") {
        return Ok(std::fs::read(source)?);
    }

    let client = BasicClient::new();
    match (&auth.api_key, &auth.api_key_param) {
        (Some(key), Some(param)) => {
            let client = UrlParam {
                inner: client,
                param_name: param.clone(),
                key: key.clone(),
            };
            fetch_bytes(&client, source).await
        }
        (Some(key), None) => {
            let client = ApiKey::bearer(client, key.clone());
            fetch_bytes(&client, source).await
        }
        _ => fetch_bytes(&client, source).await,
    }
}

/// Repeatedly fetches and scores a metrics endpoint at a fixed interval,
/// appending flattened score rows to a CSV file.
#[tracing::instrument(skip(auth), fields(url, output, sample_rate, num_samples))]
async fn poll(
    url: &str,
    output: &str,
    sample_rate: u64,
    num_samples: usize,
    auth: &AuthArgs,
) -> Result<()> {
    if num_samples == 0 {
        info!(sample_rate, "Sampling infinitely. Press Ctrl+C to stop.");
    } else {
        info!(num_samples, sample_rate, "Starting sample collection");
    }

    if let Some(dir) = Path::new(output).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut sample_count = 0;

    loop {
        // Check if we've reached the sample limit (0 = infinite)
        if num_samples > 0 && sample_count >= num_samples {
            break;
        }

        sample_count += 1;

        info!(
            sample = sample_count,
            total = if num_samples == 0 {
                None
            } else {
                Some(num_samples)
            },
            "Starting sample round"
        );

        match fetcher(url, auth).await {
            Ok(bytes) => match parse_batch(&bytes) {
                Ok(samples) => {
                    let report = analyze(&samples);
                    let scored: usize = report.values().map(|g| g.len()).sum();
                    if let Err(e) = append_report(output, &report) {
                        error!(error = %e, "Failed to write score rows");
                    } else {
                        info!(samples = samples.len(), buckets = scored, "Batch scored");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Metrics batch rejected");
                }
            },
            Err(e) => {
                error!(error = %e, "Metrics fetch failed");
            }
        }

        // If not the last sample, wait before next iteration
        if num_samples == 0 || sample_count < num_samples {
            info!(sample_rate, "Waiting before next sample");
            tokio::time::sleep(tokio::time::Duration::from_secs(sample_rate)).await;
        }
    }

    info!(output, "Finished polling");
    Ok(())
}
