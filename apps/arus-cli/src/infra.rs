use arus_application::config::{Config, DataSource};
use arus_domain::repositories::artifacts::ArtifactWriter;
use arus_domain::repositories::market_data::DailyHistoryRepository;
use arus_infrastructure::artifacts::FilesystemArtifactWriter;
use arus_infrastructure::market_data::{ChartApiDailyHistory, CsvDailyHistory};
use std::path::PathBuf;

pub struct EngineDeps {
    pub market_data: Box<dyn DailyHistoryRepository>,
    pub artifacts: Box<dyn ArtifactWriter>,
}

pub fn build_engine_deps(config: &Config) -> Result<EngineDeps, String> {
    Ok(EngineDeps {
        market_data: build_market_data_repo(config)?,
        artifacts: Box::new(FilesystemArtifactWriter::new()),
    })
}

fn build_market_data_repo(config: &Config) -> Result<Box<dyn DailyHistoryRepository>, String> {
    match config.data.source {
        DataSource::Csv => {
            let path = config
                .data
                .csv_path
                .as_deref()
                .ok_or_else(|| "data.source=csv requires data.csv_path".to_string())?;
            Ok(Box::new(CsvDailyHistory::new(PathBuf::from(path))))
        }
        DataSource::ChartApi => Ok(Box::new(ChartApiDailyHistory::new(
            config.data.endpoint.clone(),
        )?)),
    }
}
