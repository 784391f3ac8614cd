use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV observation. Bars are ordered strictly by date; rolling
/// windows operate on sequence position, not calendar distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
