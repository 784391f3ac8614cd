use std::path::PathBuf;

pub(super) fn run_backtest(config_path: PathBuf, out: Option<PathBuf>) -> Result<(), String> {
    let (config, config_toml) = arus_application::config::load_config_with_source(&config_path)?;
    super::common::print_config_summary("backtest", &config, out.as_ref());

    let overall_start = std::time::Instant::now();

    let crate::infra::EngineDeps {
        market_data,
        artifacts,
    } = crate::infra::build_engine_deps(&config)?;

    let report = arus_application::backtesting::run_backtest(
        &config,
        &config_toml,
        out,
        market_data.as_ref(),
        artifacts.as_ref(),
    )?;

    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("failed to serialize report: {err}"))?;
    println!("{}", json);
    println!(
        "{} cli: backtest total_ms={}",
        arus_application::meta::engine_name(),
        overall_start.elapsed().as_millis()
    );
    Ok(())
}
