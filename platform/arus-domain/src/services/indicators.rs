use crate::value_objects::bar::Bar;
use crate::value_objects::indicator::IndicatorSnapshot;

pub const RSI_PERIOD: usize = 14;
pub const SMA_SHORT: usize = 50;
pub const SMA_LONG: usize = 200;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Simple moving average, `None` until the window fills.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Exponential moving average seeded with the SMA of the first window.
fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if span == 0 || values.len() < span {
        return out;
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[..span].iter().sum::<f64>() / span as f64;
    out[span - 1] = Some(prev);
    for i in span..values.len() {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = Some(prev);
    }
    out
}

/// Wilder RSI: the first average gain/loss is the simple mean of the first
/// `period` diffs, then recursively smoothed. Defined from index `period`.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in values[..=period].windows(2) {
        let diff = pair[1] - pair[0];
        if diff > 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }
    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..values.len() {
        let diff = values[i] - values[i - 1];
        let (gain, loss) = if diff > 0.0 { (diff, 0.0) } else { (0.0, -diff) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain + avg_loss == 0.0 {
        return 50.0;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// MACD line (fast EMA − slow EMA) and its signal line (EMA of the defined
/// portion of the MACD line). Both aligned to the input index.
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let mut line = vec![None; values.len()];
    for i in 0..values.len() {
        if let (Some(f), Some(s)) = (fast_ema[i], slow_ema[i]) {
            line[i] = Some(f - s);
        }
    }

    let defined: Vec<f64> = line.iter().flatten().copied().collect();
    let offset = values.len() - defined.len();
    let mut signal_line = vec![None; values.len()];
    for (i, value) in ema(&defined, signal).into_iter().enumerate() {
        signal_line[offset + i] = value;
    }

    (line, signal_line)
}

/// Builds the per-bar indicator snapshots the strategy rules consume:
/// RSI(14), SMA(50), SMA(200), MACD(12, 26, 9).
pub fn attach_indicators(bars: &[Bar]) -> Vec<IndicatorSnapshot> {
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let rsi14 = rsi(&closes, RSI_PERIOD);
    let sma50 = sma(&closes, SMA_SHORT);
    let sma200 = sma(&closes, SMA_LONG);
    let (macd_line, signal_line) = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    (0..bars.len())
        .map(|i| IndicatorSnapshot {
            rsi: rsi14[i],
            sma50: sma50[i],
            sma200: sma200[i],
            macd: macd_line[i],
            macd_signal: signal_line[i],
        })
        .collect()
}
