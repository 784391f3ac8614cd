use arus_domain::repositories::market_data::{DailyHistoryRepository, HistoryQuery};
use arus_domain::value_objects::bar::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One row of a daily OHLCV file: `date,open,high,low,close,volume` with an
/// ISO date column.
#[derive(Debug, Deserialize)]
struct DailyRecord {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataQualityReport {
    pub rows: usize,
    pub duplicates: usize,
    pub out_of_order: usize,
    pub invalid_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Reads the file, drops rows with non-positive prices, deduplicates on
/// date keeping the last occurrence, and returns the bars date-ascending.
pub fn load_csv(path: &Path) -> Result<(Vec<Bar>, DataQualityReport), String> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|err| format!("failed to open csv {}: {}", path.display(), err))?;

    let mut report = DataQualityReport::default();
    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    let mut last_seen: Option<NaiveDate> = None;

    for record in reader.deserialize::<DailyRecord>() {
        let record = match record {
            Ok(record) => record,
            Err(_) => {
                report.invalid_rows += 1;
                continue;
            }
        };
        report.rows += 1;

        if record.open <= 0.0 || record.high <= 0.0 || record.low <= 0.0 || record.close <= 0.0 {
            report.invalid_rows += 1;
            continue;
        }
        if let Some(prev) = last_seen {
            if record.date < prev {
                report.out_of_order += 1;
            }
        }
        last_seen = Some(record.date);

        let bar = Bar {
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        };
        if by_date.insert(record.date, bar).is_some() {
            report.duplicates += 1;
        }
    }

    report.first_date = by_date.keys().next().copied();
    report.last_date = by_date.keys().next_back().copied();
    Ok((by_date.into_values().collect(), report))
}

/// File-backed history source. The query's symbol and range are informative
/// only, the file is the whole universe.
#[derive(Debug, Clone)]
pub struct CsvDailyHistory {
    path: PathBuf,
}

impl CsvDailyHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DailyHistoryRepository for CsvDailyHistory {
    fn load_history(&self, query: &HistoryQuery) -> Result<Vec<Bar>, String> {
        let (bars, report) = load_csv(&self.path)?;
        if report.duplicates > 0 || report.out_of_order > 0 || report.invalid_rows > 0 {
            tracing::warn!(
                symbol = %query.symbol,
                duplicates = report.duplicates,
                out_of_order = report.out_of_order,
                invalid_rows = report.invalid_rows,
                "csv history had quality issues"
            );
        }
        tracing::debug!(
            symbol = %query.symbol,
            rows = bars.len(),
            first = ?report.first_date,
            last = ?report.last_date,
            "loaded csv history"
        );
        Ok(bars)
    }
}
