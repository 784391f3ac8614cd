use crate::services::report::BacktestReport;
use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::trade::Trade;
use std::path::Path;

/// Port for persisting run outputs. Persistence of results beyond the run
/// directory (history stores, databases) is the caller's concern.
pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_report_json(&self, path: &Path, report: &BacktestReport) -> Result<(), String>;
    fn write_trades_csv(&self, path: &Path, trades: &[Trade]) -> Result<(), String>;
    fn write_equity_csv(&self, path: &Path, points: &[EquityPoint]) -> Result<(), String>;
    fn write_config_snapshot(&self, path: &Path, contents: &str) -> Result<(), String>;
}
