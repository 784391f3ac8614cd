use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    Buy,
    Sell,
}

/// One executed action, appended to the ledger at execution time and never
/// mutated. Sells carry the realized profit of the round-trip they close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_pct: Option<f64>,
}

impl Trade {
    pub fn buy(date: NaiveDate, price: f64) -> Self {
        Self {
            kind: TradeKind::Buy,
            date,
            price,
            profit: None,
            profit_pct: None,
        }
    }

    pub fn sell(date: NaiveDate, price: f64, profit: f64, profit_pct: f64) -> Self {
        Self {
            kind: TradeKind::Sell,
            date,
            price,
            profit: Some(profit),
            profit_pct: Some(profit_pct),
        }
    }
}
