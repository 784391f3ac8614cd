use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::trade::{Trade, TradeKind};
use serde::{Serialize, Serializer};

/// Knobs for the risk-adjusted figures. Defaults mirror a daily-bar market
/// with a 6% annual risk-free rate and 252 trading sessions per year.
#[derive(Debug, Clone, Copy)]
pub struct MetricsConfig {
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.06,
            periods_per_year: 252.0,
        }
    }
}

/// Gross-wins over gross-losses. A run with wins but no losing trade has no
/// finite ratio, which downstream consumers expect as the string "Infinity".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Ratio(f64),
    Infinite,
}

impl Serialize for ProfitFactor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Ratio(value) => serializer.serialize_f64(*value),
            Self::Infinite => serializer.serialize_str("Infinity"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerfMetrics {
    pub win_rate: f64,
    pub profit_factor: ProfitFactor,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_value: f64,
    pub calmar_ratio: f64,
    pub annual_return_pct: f64,
}

/// Derives the performance figures from a finished run. Closed trades are
/// the sells; an open position at the end contributes to `final_value` and
/// the equity curve but not to the trade statistics.
pub fn compute_metrics(
    trades: &[Trade],
    equity: &[EquityPoint],
    initial_capital: f64,
    final_value: f64,
    bar_count: usize,
    config: &MetricsConfig,
) -> PerfMetrics {
    let closed: Vec<f64> = trades
        .iter()
        .filter(|t| t.kind == TradeKind::Sell)
        .filter_map(|t| t.profit)
        .collect();

    let wins: Vec<f64> = closed.iter().copied().filter(|p| *p > 0.0).collect();
    let losses: Vec<f64> = closed.iter().copied().filter(|p| *p <= 0.0).collect();

    let win_rate = if closed.is_empty() {
        0.0
    } else {
        wins.len() as f64 / closed.len() as f64 * 100.0
    };

    let gross_win: f64 = wins.iter().sum();
    let gross_loss: f64 = losses.iter().map(|p| p.abs()).sum();
    let profit_factor = if gross_loss > 0.0 {
        ProfitFactor::Ratio(gross_win / gross_loss)
    } else if gross_win > 0.0 {
        ProfitFactor::Infinite
    } else {
        ProfitFactor::Ratio(0.0)
    };

    let avg_win = if wins.is_empty() {
        0.0
    } else {
        gross_win / wins.len() as f64
    };
    let avg_loss = if losses.is_empty() {
        0.0
    } else {
        losses.iter().sum::<f64>() / losses.len() as f64
    };

    let sharpe_ratio = sharpe(equity, config);
    let (max_drawdown_pct, max_drawdown_value) = max_drawdown(equity);

    let years = bar_count as f64 / config.periods_per_year;
    let annual_return_pct = if years > 0.0 && initial_capital > 0.0 {
        ((final_value / initial_capital).powf(1.0 / years) - 1.0) * 100.0
    } else {
        0.0
    };

    let calmar_ratio = if max_drawdown_pct > 0.0 {
        annual_return_pct / max_drawdown_pct
    } else {
        0.0
    };

    PerfMetrics {
        win_rate,
        profit_factor,
        avg_win,
        avg_loss,
        sharpe_ratio,
        max_drawdown_pct,
        max_drawdown_value,
        calmar_ratio,
        annual_return_pct,
    }
}

/// Annualized Sharpe over per-bar equity returns, sample standard deviation.
/// Fewer than two returns, or a zero-variance curve, score 0.
fn sharpe(equity: &[EquityPoint], config: &MetricsConfig) -> f64 {
    let mut returns = Vec::with_capacity(equity.len().saturating_sub(1));
    for pair in equity.windows(2) {
        if pair[0].equity > 0.0 {
            returns.push(pair[1].equity / pair[0].equity - 1.0);
        }
    }
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }

    let rf_per_period = config.risk_free_rate / config.periods_per_year;
    (mean - rf_per_period) / std * config.periods_per_year.sqrt()
}

/// Deepest peak-to-trough decline along the curve. Returns the percentage
/// drop and the currency loss at the point of that worst percentage drop.
fn max_drawdown(equity: &[EquityPoint]) -> (f64, f64) {
    let mut peak = f64::MIN;
    let mut worst_pct = 0.0;
    let mut worst_value = 0.0;
    for point in equity {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let pct = (peak - point.equity) / peak * 100.0;
            if pct > worst_pct {
                worst_pct = pct;
                worst_value = peak - point.equity;
            }
        }
    }
    (worst_pct, worst_value)
}
