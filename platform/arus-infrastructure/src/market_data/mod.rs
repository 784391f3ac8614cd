pub mod chart_api;
pub mod csv_source;

pub use chart_api::ChartApiDailyHistory;
pub use csv_source::CsvDailyHistory;
