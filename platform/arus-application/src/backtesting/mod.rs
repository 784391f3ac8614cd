use crate::config::Config;
use arus_domain::repositories::artifacts::ArtifactWriter;
use arus_domain::repositories::market_data::{DailyHistoryRepository, HistoryQuery};
use arus_domain::services::engine::{run_simulation, SimulationParams};
use arus_domain::services::indicators::attach_indicators;
use arus_domain::services::metrics::{compute_metrics, MetricsConfig};
use arus_domain::services::report::{assemble_report, BacktestReport};
use arus_domain::services::strategy::StrategyKind;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info_span;

const DEFAULT_RANGE: &str = "5y";

/// Runs one backtest end to end: load history, derive indicators, simulate,
/// score, assemble the report and persist the run artifacts.
pub fn run_backtest(
    config: &Config,
    config_toml: &str,
    out: Option<PathBuf>,
    market_data: &dyn DailyHistoryRepository,
    artifacts: &dyn ArtifactWriter,
) -> Result<BacktestReport, String> {
    let _span = info_span!(
        "run_backtest",
        symbol = %config.run.symbol,
        strategy = %config.run.strategy
    )
    .entered();

    // Bad strategy names fail before any data is fetched.
    let strategy = StrategyKind::from_name(&config.run.strategy)?;

    let mut params = SimulationParams::default();
    if let Some(capital) = config.run.initial_capital {
        params.initial_capital = capital;
    }
    if let Some(warmup) = config.engine.as_ref().and_then(|e| e.warmup_bars) {
        params.warmup_bars = warmup;
    }

    let mut metrics_config = MetricsConfig::default();
    if let Some(m) = &config.metrics {
        if let Some(rate) = m.risk_free_rate {
            metrics_config.risk_free_rate = rate;
        }
        if let Some(periods) = m.periods_per_year {
            metrics_config.periods_per_year = periods;
        }
    }

    let fingerprint = config_fingerprint(config_toml);
    tracing::info!(config_sha256 = %fingerprint, "starting backtest");

    let stage_start = Instant::now();
    let bars = market_data.load_history(&HistoryQuery {
        symbol: config.run.symbol.clone(),
        range: config
            .data
            .range
            .clone()
            .unwrap_or_else(|| DEFAULT_RANGE.to_string()),
    })?;
    metrics::histogram!("arus.backtest.load_history_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    if bars.is_empty() {
        return Err(format!("no data found for {}", config.run.symbol));
    }
    tracing::info!(rows = bars.len(), "history loaded");

    let stage_start = Instant::now();
    let snapshots = attach_indicators(&bars);
    metrics::histogram!("arus.backtest.indicators_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    let stage_start = Instant::now();
    let outcome = run_simulation(&bars, &snapshots, strategy, &params)?;
    let engine_ms = stage_start.elapsed().as_millis() as f64;
    metrics::histogram!("arus.backtest.engine_ms").record(engine_ms);
    metrics::gauge!("arus.backtest.bars_processed").set(bars.len() as f64);
    metrics::gauge!("arus.backtest.trades").set(outcome.trades.len() as f64);

    let perf = compute_metrics(
        &outcome.trades,
        &outcome.equity,
        params.initial_capital,
        outcome.final_value,
        bars.len(),
        &metrics_config,
    );
    let years = bars.len() as f64 / metrics_config.periods_per_year;
    let report = assemble_report(
        &config.run.symbol,
        strategy,
        params.initial_capital,
        &outcome,
        &perf,
        years,
    );

    write_outputs(config, config_toml, out, &report, &outcome, artifacts)?;
    Ok(report)
}

/// Uniform error envelope for machine consumers of the CLI output.
pub fn error_report(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn config_fingerprint(config_toml: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config_toml.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn run_label(config: &Config) -> String {
    let symbol: String = config
        .run
        .symbol
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", symbol, config.run.strategy)
}

fn write_outputs(
    config: &Config,
    config_toml: &str,
    out: Option<PathBuf>,
    report: &BacktestReport,
    outcome: &arus_domain::services::engine::SimulationOutcome,
    artifacts: &dyn ArtifactWriter,
) -> Result<(), String> {
    let base_dir = out.unwrap_or_else(|| PathBuf::from(&config.paths.out_dir));
    let run_dir = base_dir.join(run_label(config));
    artifacts.ensure_dir(&run_dir)?;

    let stage_start = Instant::now();
    artifacts.write_report_json(run_dir.join("report.json").as_path(), report)?;
    artifacts.write_trades_csv(run_dir.join("trades.csv").as_path(), &outcome.trades)?;
    artifacts.write_equity_csv(run_dir.join("equity.csv").as_path(), &outcome.equity)?;
    artifacts
        .write_config_snapshot(run_dir.join("config_snapshot.toml").as_path(), config_toml)?;
    metrics::histogram!("arus.backtest.write_outputs_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    tracing::info!(run_dir = %run_dir.display(), "artifacts written");
    Ok(())
}
