use arus_application::config::{Config, DataSource};
use arus_application::meta::engine_name;
use std::path::PathBuf;

pub(super) fn print_config_summary(command: &str, config: &Config, out: Option<&PathBuf>) {
    println!(
        "{} cli: {} (symbol={}, strategy={}, initial_capital={})",
        engine_name(),
        command,
        config.run.symbol,
        config.run.strategy,
        config
            .run
            .initial_capital
            .map(|c| c.to_string())
            .unwrap_or_else(|| "default".to_string())
    );
    println!(
        "data: source={}, csv_path={}, endpoint={}, range={}",
        match config.data.source {
            DataSource::Csv => "csv",
            DataSource::ChartApi => "chart-api",
        },
        config.data.csv_path.as_deref().unwrap_or("none"),
        config.data.endpoint.as_deref().unwrap_or("default"),
        config.data.range.as_deref().unwrap_or("5y")
    );
    println!("paths: out_dir={}", config.paths.out_dir);
    if let Some(out_dir) = out {
        println!("output dir: {}", out_dir.display());
    }
}
