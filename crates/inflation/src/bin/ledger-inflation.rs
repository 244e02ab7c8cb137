use anyhow::{Context, Result};
use clap::Parser;
use ledger_inflation::{
    apply_inflation, DistributionConfig, InflationError, LedgerSnapshot, VERSION,
};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Apply one inflation run to a ledger snapshot and print the outcome.
#[derive(Debug, Parser)]
#[command(name = "ledger-inflation", version, about)]
struct Cli {
    /// JSON snapshot with `aggregates` and `accounts`
    #[arg(long)]
    snapshot: PathBuf,

    /// Distribution config file (TOML or JSON); `INFLATION_*` env vars override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the post-run snapshot here
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the ledger close time (unix seconds)
    #[arg(long)]
    close_time: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value = "pretty", value_parser = ["pretty", "compact"])]
    log_format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);
    info!(version = VERSION, "Starting ledger-inflation");

    let config = DistributionConfig::load(cli.config.as_deref())
        .context("failed to load distribution config")?;

    let raw = fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("failed to read snapshot {}", cli.snapshot.display()))?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", cli.snapshot.display()))?;
    let (mut ledger, mut aggregates) = snapshot.into_parts();
    if let Some(close_time) = cli.close_time {
        aggregates.close_time = close_time;
    }

    info!(
        accounts = ledger.len(),
        total_coins = aggregates.total_coins,
        fee_pool = aggregates.fee_pool,
        seq = aggregates.inflation_seq,
        scheme = ?config.scheme(),
        "Loaded ledger snapshot"
    );

    let outcome = match apply_inflation(&mut ledger, &mut aggregates, &config) {
        Ok(outcome) => outcome,
        Err(err) => abort_on_fatal(err),
    };

    match outcome.report() {
        Some(report) => info!(
            seq = report.inflation_seq,
            payouts = report.payouts.len(),
            supply_delta = report.supply_delta,
            "Inflation run applied"
        ),
        None => info!(code = ?outcome.code(), "Inflation not due yet"),
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(out) = &cli.out {
        let snapshot = LedgerSnapshot::capture(&ledger, &aggregates);
        fs::write(out, serde_json::to_string_pretty(&snapshot)?)
            .with_context(|| format!("failed to write snapshot {}", out.display()))?;
        info!(path = %out.display(), "Wrote post-run snapshot");
    }

    Ok(())
}

/// A fatal inflation error means this node can no longer agree with its
/// peers; stop immediately instead of closing a divergent ledger.
fn abort_on_fatal(err: InflationError) -> ! {
    error!(error = %err, fatal = err.is_fatal(), "Inflation failed, aborting node");
    eprintln!("fatal: {err}");
    std::process::abort()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "compact" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
