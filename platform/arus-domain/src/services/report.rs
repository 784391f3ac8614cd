use crate::services::engine::SimulationOutcome;
use crate::services::metrics::{PerfMetrics, ProfitFactor};
use crate::services::strategy::StrategyKind;
use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::trade::Trade;
use serde::Serialize;

/// Every 21st equity point is kept, roughly one per trading month.
pub const EQUITY_SAMPLE_STRIDE: usize = 21;
pub const RECENT_TRADES_LIMIT: usize = 10;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetrics {
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_value: f64,
    pub calmar_ratio: f64,
    pub profit_factor: ProfitFactor,
    pub avg_win: f64,
    pub avg_loss: f64,
}

/// Presentation form of a finished run. All rounding happens here, never in
/// the engine or metrics, so the figures are rounded exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub strategy: String,
    pub period: String,
    pub initial_capital: f64,
    pub final_value: f64,
    pub profit_loss: f64,
    pub profit_pct: f64,
    pub annual_return_pct: f64,
    pub trades_count: usize,
    pub closed_trades: usize,
    pub win_rate: f64,
    pub metrics: ReportMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub recent_trades: Vec<Trade>,
}

pub fn assemble_report(
    symbol: &str,
    strategy: StrategyKind,
    initial_capital: f64,
    outcome: &SimulationOutcome,
    metrics: &PerfMetrics,
    years: f64,
) -> BacktestReport {
    let profit_loss = outcome.final_value - initial_capital;
    let profit_pct = if initial_capital > 0.0 {
        profit_loss / initial_capital * 100.0
    } else {
        0.0
    };
    let closed_trades = outcome
        .trades
        .iter()
        .filter(|t| t.profit.is_some())
        .count();

    let recent_trades: Vec<Trade> = outcome
        .trades
        .iter()
        .rev()
        .take(RECENT_TRADES_LIMIT)
        .rev()
        .map(round_trade)
        .collect();

    BacktestReport {
        symbol: symbol.to_string(),
        strategy: strategy.name().to_string(),
        period: format!("{} bars (~{:.1} years)", outcome.equity.len(), years),
        initial_capital: round2(initial_capital),
        final_value: round2(outcome.final_value),
        profit_loss: round2(profit_loss),
        profit_pct: round2(profit_pct),
        annual_return_pct: round2(metrics.annual_return_pct),
        trades_count: outcome.trades.len(),
        closed_trades,
        win_rate: round2(metrics.win_rate),
        metrics: ReportMetrics {
            sharpe_ratio: round3(metrics.sharpe_ratio),
            max_drawdown_pct: round2(metrics.max_drawdown_pct),
            max_drawdown_value: round2(metrics.max_drawdown_value),
            calmar_ratio: round3(metrics.calmar_ratio),
            profit_factor: match metrics.profit_factor {
                ProfitFactor::Ratio(value) => ProfitFactor::Ratio(round3(value)),
                ProfitFactor::Infinite => ProfitFactor::Infinite,
            },
            avg_win: round2(metrics.avg_win),
            avg_loss: round2(metrics.avg_loss),
        },
        equity_curve: downsample_equity(&outcome.equity, EQUITY_SAMPLE_STRIDE),
        recent_trades,
    }
}

/// Keeps every `stride`-th point and always the last one, so the curve ends
/// at the final equity value.
pub fn downsample_equity(equity: &[EquityPoint], stride: usize) -> Vec<EquityPoint> {
    if equity.is_empty() || stride == 0 {
        return Vec::new();
    }
    let mut sampled: Vec<EquityPoint> = equity
        .iter()
        .step_by(stride)
        .map(|p| EquityPoint {
            date: p.date,
            equity: round2(p.equity),
        })
        .collect();
    if (equity.len() - 1) % stride != 0 {
        let last = &equity[equity.len() - 1];
        sampled.push(EquityPoint {
            date: last.date,
            equity: round2(last.equity),
        });
    }
    sampled
}

fn round_trade(trade: &Trade) -> Trade {
    Trade {
        kind: trade.kind,
        date: trade.date,
        price: round2(trade.price),
        profit: trade.profit.map(round2),
        profit_pct: trade.profit_pct.map(round2),
    }
}
