use arus_application::config::DataSource;
use arus_domain::services::strategy::StrategyKind;
use std::path::PathBuf;

/// Checks the config without fetching any data: the strategy name must
/// resolve and a csv source must point at an existing file.
pub(super) fn run_validate(config_path: PathBuf) -> Result<(), String> {
    let config = arus_application::config::load_config(&config_path)?;
    super::common::print_config_summary("validate", &config, None);

    let strategy = StrategyKind::from_name(&config.run.strategy)?;
    println!("strategy: {} ok", strategy.name());

    if config.data.source == DataSource::Csv {
        let path = config
            .data
            .csv_path
            .as_deref()
            .ok_or_else(|| "data.source=csv requires data.csv_path".to_string())?;
        if !PathBuf::from(path).is_file() {
            return Err(format!("csv_path does not exist: {}", path));
        }
        println!("csv_path: {} ok", path);
    }

    println!("config: ok");
    Ok(())
}
