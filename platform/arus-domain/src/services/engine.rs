use crate::services::strategy::{SnapshotWindow, StrategyKind};
use crate::value_objects::bar::Bar;
use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::indicator::IndicatorSnapshot;
use crate::value_objects::signal::Signal;
use crate::value_objects::trade::Trade;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000_000.0;
/// Bars excluded from trading so the longest indicator lookback (SMA 200)
/// is defined before the first decision.
pub const DEFAULT_WARMUP_BARS: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub initial_capital: f64,
    pub warmup_bars: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            warmup_bars: DEFAULT_WARMUP_BARS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Cash if the run ended flat, otherwise the open position marked to the
    /// final close. An open position is never force-closed in the ledger.
    pub final_value: f64,
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
}

/// Replays the bar sequence exactly once. The account is always fully
/// invested or fully in cash: a buy converts all capital to position at the
/// bar's close, a sell converts all of it back. Equity is recorded for every
/// bar, warm-up included, from the state before that bar's signal acts.
pub fn run_simulation(
    bars: &[Bar],
    snapshots: &[IndicatorSnapshot],
    strategy: StrategyKind,
    params: &SimulationParams,
) -> Result<SimulationOutcome, String> {
    if bars.is_empty() {
        return Err("no data".to_string());
    }
    if snapshots.len() != bars.len() {
        return Err(format!(
            "indicator series misaligned: {} snapshots for {} bars",
            snapshots.len(),
            bars.len()
        ));
    }
    if !(params.initial_capital > 0.0) || !params.initial_capital.is_finite() {
        return Err(format!(
            "initial_capital must be a positive number, got {}",
            params.initial_capital
        ));
    }

    let mut capital = params.initial_capital;
    let mut position = 0.0f64;
    let mut entry_price = 0.0f64;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity = Vec::with_capacity(bars.len());
    let mut window = SnapshotWindow::default();

    for (i, bar) in bars.iter().enumerate() {
        let current = if position > 0.0 {
            position * bar.close
        } else {
            capital
        };
        equity.push(EquityPoint {
            date: bar.date,
            equity: current,
        });

        if i >= params.warmup_bars {
            match strategy.decide(&window, position > 0.0) {
                Signal::Buy if position == 0.0 => {
                    position = capital / bar.close;
                    entry_price = bar.close;
                    capital = 0.0;
                    trades.push(Trade::buy(bar.date, bar.close));
                }
                Signal::Sell if position > 0.0 => {
                    let profit = (bar.close - entry_price) * position;
                    let profit_pct = (bar.close - entry_price) / entry_price * 100.0;
                    capital = position * bar.close;
                    position = 0.0;
                    trades.push(Trade::sell(bar.date, bar.close, profit, profit_pct));
                }
                _ => {}
            }
        }

        window.push(snapshots[i]);
    }

    let last_close = bars[bars.len() - 1].close;
    let final_value = if position > 0.0 {
        position * last_close
    } else {
        capital
    };

    Ok(SimulationOutcome {
        final_value,
        trades,
        equity,
    })
}

#[cfg(test)]
mod tests {
    use super::{run_simulation, SimulationParams};
    use crate::services::strategy::StrategyKind;
    use crate::value_objects::bar::Bar;
    use crate::value_objects::indicator::IndicatorSnapshot;
    use crate::value_objects::trade::TradeKind;
    use chrono::NaiveDate;

    fn bar(day: u64, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date") + chrono::Days::new(day);
        Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    fn rsi_snapshot(rsi: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: Some(rsi),
            ..IndicatorSnapshot::default()
        }
    }

    #[test]
    fn empty_bar_sequence_is_an_error() {
        let err = run_simulation(
            &[],
            &[],
            StrategyKind::RsiOversold,
            &SimulationParams::default(),
        )
        .unwrap_err();
        assert!(err.contains("no data"));
    }

    #[test]
    fn misaligned_snapshots_are_an_error() {
        let bars = vec![bar(0, 100.0), bar(1, 100.0)];
        let snapshots = vec![IndicatorSnapshot::default()];
        let err = run_simulation(
            &bars,
            &snapshots,
            StrategyKind::RsiOversold,
            &SimulationParams::default(),
        )
        .unwrap_err();
        assert!(err.contains("misaligned"));
    }

    #[test]
    fn fewer_bars_than_warmup_yields_flat_zero_trade_result() {
        let bars: Vec<Bar> = (0..150).map(|i| bar(i, 100.0 + i as f64)).collect();
        let snapshots = vec![rsi_snapshot(10.0); bars.len()];
        let outcome = run_simulation(
            &bars,
            &snapshots,
            StrategyKind::RsiOversold,
            &SimulationParams::default(),
        )
        .expect("simulate");

        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.equity.len(), bars.len());
        assert!(outcome
            .equity
            .iter()
            .all(|p| (p.equity - 10_000_000.0).abs() < 1e-9));
        assert!((outcome.final_value - 10_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn buy_then_sell_uses_all_in_all_out_accounting() {
        // Warm-up shortened so the test can focus on the accounting.
        let params = SimulationParams {
            initial_capital: 1_000.0,
            warmup_bars: 2,
        };
        let bars = vec![
            bar(0, 100.0),
            bar(1, 100.0),
            bar(2, 100.0), // buys here: prev RSI oversold
            bar(3, 110.0),
            bar(4, 120.0), // sells here: prev RSI overbought
        ];
        let snapshots = vec![
            rsi_snapshot(50.0),
            rsi_snapshot(25.0),
            rsi_snapshot(50.0),
            rsi_snapshot(75.0),
            rsi_snapshot(50.0),
        ];
        let outcome =
            run_simulation(&bars, &snapshots, StrategyKind::RsiOversold, &params).expect("simulate");

        assert_eq!(outcome.trades.len(), 2);
        let buy = &outcome.trades[0];
        let sell = &outcome.trades[1];
        assert_eq!(buy.kind, TradeKind::Buy);
        assert!((buy.price - 100.0).abs() < 1e-9);
        assert_eq!(sell.kind, TradeKind::Sell);
        assert!((sell.price - 120.0).abs() < 1e-9);
        // 10 units bought at 100, sold at 120.
        assert!((sell.profit.unwrap() - 200.0).abs() < 1e-9);
        assert!((sell.profit_pct.unwrap() - 20.0).abs() < 1e-9);
        assert!((outcome.final_value - 1_200.0).abs() < 1e-9);

        // Equity marks the open position to each close, pre-action.
        assert!((outcome.equity[3].equity - 1_100.0).abs() < 1e-9);
        assert!((outcome.equity[4].equity - 1_200.0).abs() < 1e-9);
    }

    #[test]
    fn open_position_is_valued_but_not_force_closed() {
        let params = SimulationParams {
            initial_capital: 1_000.0,
            warmup_bars: 1,
        };
        let bars = vec![bar(0, 100.0), bar(1, 100.0), bar(2, 150.0)];
        let snapshots = vec![rsi_snapshot(25.0), rsi_snapshot(50.0), rsi_snapshot(50.0)];
        let outcome =
            run_simulation(&bars, &snapshots, StrategyKind::RsiOversold, &params).expect("simulate");

        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].kind, TradeKind::Buy);
        assert!((outcome.final_value - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_initial_capital_is_rejected() {
        let bars = vec![bar(0, 100.0)];
        let snapshots = vec![IndicatorSnapshot::default()];
        let params = SimulationParams {
            initial_capital: 0.0,
            warmup_bars: 200,
        };
        assert!(run_simulation(&bars, &snapshots, StrategyKind::RsiOversold, &params).is_err());
    }
}
