use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Portfolio valuation after marking the position to one bar's close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}
