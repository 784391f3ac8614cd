use crate::value_objects::bar::Bar;

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub symbol: String,
    /// History span understood by the provider, e.g. "5y".
    pub range: String,
}

/// Port for the market-data supplier: an ordered daily OHLCV history for
/// one symbol. The engine never fetches data itself.
pub trait DailyHistoryRepository {
    fn load_history(&self, query: &HistoryQuery) -> Result<Vec<Bar>, String>;
}
