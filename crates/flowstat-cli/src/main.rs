//! flowstat - run one status query against a JSON status snapshot.
//!
//! ```text
//! flowstat --snapshot demos/snapshot.json "processor:all:health,stats; systemdiagnostics:heap"
//! ```
//!
//! The report goes to stdout, logs go to stderr (`RUST_LOG` filters them).

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use flowstat_core::app::{ReporterConfig, StatusReporter, UnknownKindPolicy};
use flowstat_core::impls::{InMemoryStatusProvider, StatusSnapshot};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flowstat")]
#[command(about = "Query component status from a status snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Status snapshot to query (JSON)
    #[arg(long, short, env = "FLOWSTAT_SNAPSHOT")]
    snapshot: PathBuf,

    /// Status query, e.g. `processor:all:health,stats;instance:health`
    query: String,

    /// Reporter configuration file (JSON); flags below override it
    #[arg(long, env = "FLOWSTAT_CONFIG")]
    config: Option<PathBuf>,

    /// Emit a diagnostic block for unknown target kinds instead of skipping them
    #[arg(long, env = "FLOWSTAT_STRICT")]
    strict: bool,

    /// strftime layout for bulletin timestamps
    #[arg(long, env = "FLOWSTAT_TIMESTAMP_FORMAT")]
    timestamp_format: Option<String>,

    /// Give up on the whole query after this many milliseconds
    #[arg(long, env = "FLOWSTAT_TIMEOUT_MS", default_value_t = 5_000)]
    timeout_ms: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = reporter_config(&cli)?;
    debug!(?config, "reporter configuration");

    let raw = fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let snapshot = StatusSnapshot::from_json(&raw)
        .with_context(|| format!("parsing snapshot {}", cli.snapshot.display()))?;
    info!(
        processors = snapshot.processors.len(),
        connections = snapshot.connections.len(),
        "loaded status snapshot"
    );

    let provider = InMemoryStatusProvider::new(snapshot);
    let reporter = StatusReporter::new(config);
    let report = tokio::time::timeout(
        Duration::from_millis(cli.timeout_ms),
        reporter.report(Some(&provider), &cli.query),
    )
    .await
    .with_context(|| format!("status query timed out after {} ms", cli.timeout_ms))?;

    println!("{report}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) first, then command-line overrides.
fn reporter_config(cli: &Cli) -> Result<ReporterConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ReporterConfig::default(),
    };

    if cli.strict {
        config = config.with_unknown_kinds(UnknownKindPolicy::Report);
    }
    if let Some(format) = &cli.timestamp_format {
        config = config.with_bulletin_timestamp_format(format.clone());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowstat_core::app::config::DEFAULT_BULLETIN_TIMESTAMP_FORMAT;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "flowstat",
            "--snapshot",
            "snap.json",
            "--strict",
            "--timestamp-format",
            "%Y-%m-%d",
            "processor:all:health",
        ])
        .unwrap();
        let config = reporter_config(&cli).unwrap();
        assert_eq!(config.unknown_kinds, UnknownKindPolicy::Report);
        assert_eq!(config.bulletin_timestamp_format, "%Y-%m-%d");
        assert_eq!(cli.timeout_ms, 5_000);
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let cli = Cli::try_parse_from(["flowstat", "-s", "snap.json", "instance:health"]).unwrap();
        let config = reporter_config(&cli).unwrap();
        assert_eq!(config.unknown_kinds, UnknownKindPolicy::Skip);
        assert_eq!(config.bulletin_timestamp_format, DEFAULT_BULLETIN_TIMESTAMP_FORMAT);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "flowstat",
            "-s",
            "snap.json",
            "--config",
            "/nonexistent/flowstat.json",
            "instance:health",
        ])
        .unwrap();
        let err = reporter_config(&cli).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[tokio::test]
    async fn demo_snapshot_answers_queries() {
        let snapshot = StatusSnapshot::from_json(include_str!("../demos/snapshot.json")).unwrap();
        let provider = InMemoryStatusProvider::new(snapshot);
        let report = StatusReporter::default()
            .report(Some(&provider), "processor:PutFile:health;connection:TailToPut:health")
            .await;
        assert_eq!(
            report,
            "[Processor 'PutFile':<Health {Run Status:Stopped, Has Bulletin(s):true, \
             Validation Error(s):['Directory' is invalid with input '' because 'Directory is required']}>],\
             [Connection 'TailToPut':<Health {Queued Count:10, Queued Size:100}>]"
        );
    }

    #[test]
    fn demo_config_parses() {
        let config: ReporterConfig = serde_json::from_str(include_str!("../demos/config.json")).unwrap();
        assert_eq!(config.unknown_kinds, UnknownKindPolicy::Report);
    }
}
