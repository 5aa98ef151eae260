mod cli;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use tracing::{Instrument, info};

use adapters::dataset::CsvDataset;
use adapters::fmp::FmpClient;
use adapters::sync::{self, SyncOutcome};
use common::logger::{LogFormat, TraceId, child_span, init_logger, root_span};
use engine::AnalysisPipeline;

use crate::cli::{AnalyzeArgs, Cli, Command, SyncArgs};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("windowscan", LogFormat::from_env());

    let cli = Cli::parse();
    let cfg = AppConfig::from_env();

    let dataset = CsvDataset::new(cli.data.clone().unwrap_or_else(|| cfg.dataset_path.clone()));

    let trace_id = TraceId::new();
    let span = root_span(cli.command.name(), &trace_id);
    span.record("dataset", tracing::field::display(dataset.path().display()));

    let result = run(cli.command, &cfg, &dataset).instrument(span).await;

    if let Err(e) = &result {
        tracing::error!(error = ?e, %trace_id, "command failed");
    }

    result
}

async fn run(command: Command, cfg: &AppConfig, dataset: &CsvDataset) -> anyhow::Result<()> {
    match command {
        Command::Analyze(args) => analyze(&args, dataset),
        Command::Bootstrap(args) => bootstrap(&args, cfg, dataset).await,
        Command::Update(args) => update(&args, cfg, dataset).await,
    }
}

fn analyze(args: &AnalyzeArgs, dataset: &CsvDataset) -> anyhow::Result<()> {
    let pipeline = AnalysisPipeline::new(args.window_config(), args.radius)
        .context("invalid analysis configuration")?;

    let mut bars = child_span("load")
        .in_scope(|| dataset.load())
        .with_context(|| format!("failed to load dataset {}", dataset.path().display()))?;

    if let Some(limit) = args.limit {
        bars.truncate(limit);
    }

    info!(bars = bars.len(), radius = pipeline.radius(), "running analysis");
    let outcome = pipeline.run(&bars);

    let rendered = if args.json {
        render::json(&outcome).context("failed to encode report")?
    } else {
        render::text(&outcome).context("failed to format report")?
    };
    println!("{rendered}");

    Ok(())
}

fn client(cfg: &AppConfig) -> anyhow::Result<FmpClient> {
    let key = cfg.api_key.clone().unwrap_or_default();
    FmpClient::new(cfg.fmp_base_url.clone(), key)
        .context("cannot build FMP client (is FMP_API_KEY set?)")
}

async fn bootstrap(args: &SyncArgs, cfg: &AppConfig, dataset: &CsvDataset) -> anyhow::Result<()> {
    let client = client(cfg)?;
    let symbol = args.symbol.as_deref().unwrap_or(&cfg.symbol);
    let keep = args.keep.unwrap_or(cfg.bootstrap_rows);
    let today = chrono::Local::now().date_naive();

    let outcome = sync::bootstrap(&client, dataset, symbol, today, keep)
        .await
        .context("initial load failed")?;

    report_sync(&outcome, dataset);
    Ok(())
}

async fn update(args: &SyncArgs, cfg: &AppConfig, dataset: &CsvDataset) -> anyhow::Result<()> {
    let client = client(cfg)?;
    let symbol = args.symbol.as_deref().unwrap_or(&cfg.symbol);
    let keep = args.keep.unwrap_or(cfg.rolling_rows);

    let outcome = sync::update(&client, dataset, symbol, keep)
        .await
        .context("dataset update failed")?;

    report_sync(&outcome, dataset);
    Ok(())
}

fn report_sync(outcome: &SyncOutcome, dataset: &CsvDataset) {
    match outcome {
        SyncOutcome::NoData => println!("no new data; {} unchanged", dataset.path().display()),
        SyncOutcome::Written {
            rows,
            oldest,
            newest,
        } => {
            println!("{} rows written to {}", rows, dataset.path().display());
            if let (Some(o), Some(n)) = (oldest, newest) {
                println!("range {o} .. {n}");
            }
        }
    }
}
