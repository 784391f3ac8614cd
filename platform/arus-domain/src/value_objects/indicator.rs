/// Indicator values attached to a single bar. `None` while the indicator's
/// lookback window has not filled yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
}
