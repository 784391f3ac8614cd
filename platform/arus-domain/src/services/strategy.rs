use crate::value_objects::indicator::IndicatorSnapshot;
use crate::value_objects::signal::Signal;

/// Closed registry of decision rules, resolved once per run from the
/// configured name. Unknown names are a configuration error, reported
/// before any bar is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    RsiOversold,
    MaCrossover,
    MacdReversal,
}

impl StrategyKind {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "rsi_oversold" => Ok(Self::RsiOversold),
            "ma_crossover" => Ok(Self::MaCrossover),
            "macd_reversal" => Ok(Self::MacdReversal),
            other => Err(format!(
                "unknown strategy '{}' (expected rsi_oversold, ma_crossover or macd_reversal)",
                other
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RsiOversold => "rsi_oversold",
            Self::MaCrossover => "ma_crossover",
            Self::MacdReversal => "macd_reversal",
        }
    }

    /// Decides the action for the bar under evaluation. Rules read only the
    /// snapshots of completed bars held in `window` — the execution price is
    /// the current bar's close, so peeking at it would be look-ahead bias.
    /// Missing indicators or missing lookback depth always mean hold.
    pub fn decide(&self, window: &SnapshotWindow, is_long: bool) -> Signal {
        let Some(prev) = window.prev() else {
            return Signal::Hold;
        };

        match self {
            Self::RsiOversold => {
                let Some(rsi) = prev.rsi else {
                    return Signal::Hold;
                };
                if !is_long && rsi < 30.0 {
                    Signal::Buy
                } else if is_long && rsi > 70.0 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            Self::MaCrossover => {
                let (Some(short), Some(long)) = (prev.sma50, prev.sma200) else {
                    return Signal::Hold;
                };
                if is_long {
                    if short < long {
                        return Signal::Sell;
                    }
                    return Signal::Hold;
                }
                let Some(prev2) = window.prev2() else {
                    return Signal::Hold;
                };
                let (Some(short2), Some(long2)) = (prev2.sma50, prev2.sma200) else {
                    return Signal::Hold;
                };
                if short > long && short2 <= long2 {
                    Signal::Buy
                } else {
                    Signal::Hold
                }
            }
            Self::MacdReversal => {
                let (Some(line), Some(signal)) = (prev.macd, prev.macd_signal) else {
                    return Signal::Hold;
                };
                let Some(prev2) = window.prev2() else {
                    return Signal::Hold;
                };
                let (Some(line2), Some(signal2)) = (prev2.macd, prev2.macd_signal) else {
                    return Signal::Hold;
                };
                if !is_long && line > signal && line2 <= signal2 {
                    Signal::Buy
                } else if is_long && line < signal && line2 >= signal2 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        }
    }
}

/// Ring buffer of the last three completed-bar snapshots. The engine pushes
/// the current bar's snapshot after acting on it, so while bar `i` is being
/// evaluated `prev()` is bar `i-1` and `prev2()` is bar `i-2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotWindow {
    slots: [Option<IndicatorSnapshot>; 3],
}

impl SnapshotWindow {
    pub fn push(&mut self, snapshot: IndicatorSnapshot) {
        self.slots.rotate_right(1);
        self.slots[0] = Some(snapshot);
    }

    /// Snapshot of the bar immediately before the one under evaluation.
    pub fn prev(&self) -> Option<&IndicatorSnapshot> {
        self.slots[0].as_ref()
    }

    /// Snapshot two bars before the one under evaluation.
    pub fn prev2(&self) -> Option<&IndicatorSnapshot> {
        self.slots[1].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotWindow, StrategyKind};
    use crate::value_objects::indicator::IndicatorSnapshot;
    use crate::value_objects::signal::Signal;

    fn window(snapshots: &[IndicatorSnapshot]) -> SnapshotWindow {
        let mut window = SnapshotWindow::default();
        for snapshot in snapshots {
            window.push(*snapshot);
        }
        window
    }

    fn with_rsi(rsi: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: Some(rsi),
            ..IndicatorSnapshot::default()
        }
    }

    fn with_smas(sma50: f64, sma200: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            sma50: Some(sma50),
            sma200: Some(sma200),
            ..IndicatorSnapshot::default()
        }
    }

    fn with_macd(line: f64, signal: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            macd: Some(line),
            macd_signal: Some(signal),
            ..IndicatorSnapshot::default()
        }
    }

    #[test]
    fn from_name_resolves_known_strategies_and_rejects_unknown() {
        assert_eq!(
            StrategyKind::from_name("rsi_oversold").unwrap(),
            StrategyKind::RsiOversold
        );
        assert_eq!(
            StrategyKind::from_name("ma_crossover").unwrap(),
            StrategyKind::MaCrossover
        );
        assert_eq!(
            StrategyKind::from_name("macd_reversal").unwrap(),
            StrategyKind::MacdReversal
        );
        let err = StrategyKind::from_name("momentum").unwrap_err();
        assert!(err.contains("unknown strategy"));
    }

    #[test]
    fn rsi_rule_buys_oversold_when_flat_and_sells_overbought_when_long() {
        let strategy = StrategyKind::RsiOversold;
        let w = window(&[with_rsi(50.0), with_rsi(25.0)]);
        assert_eq!(strategy.decide(&w, false), Signal::Buy);
        assert_eq!(strategy.decide(&w, true), Signal::Hold);

        let w = window(&[with_rsi(50.0), with_rsi(75.0)]);
        assert_eq!(strategy.decide(&w, true), Signal::Sell);
        assert_eq!(strategy.decide(&w, false), Signal::Hold);
    }

    #[test]
    fn rsi_rule_holds_when_indicator_missing() {
        let strategy = StrategyKind::RsiOversold;
        let w = window(&[IndicatorSnapshot::default()]);
        assert_eq!(strategy.decide(&w, false), Signal::Hold);
        assert_eq!(strategy.decide(&SnapshotWindow::default(), false), Signal::Hold);
    }

    #[test]
    fn ma_rule_buys_only_on_fresh_golden_cross() {
        let strategy = StrategyKind::MaCrossover;

        // Cross just happened: prev2 short <= long, prev short > long.
        let w = window(&[with_smas(99.0, 100.0), with_smas(101.0, 100.0)]);
        assert_eq!(strategy.decide(&w, false), Signal::Buy);

        // Already above for two bars: no fresh cross, no entry.
        let w = window(&[with_smas(101.0, 100.0), with_smas(102.0, 100.0)]);
        assert_eq!(strategy.decide(&w, false), Signal::Hold);
    }

    #[test]
    fn ma_rule_exits_whenever_short_below_long() {
        let strategy = StrategyKind::MaCrossover;
        // The exit needs no lookback beyond the previous bar.
        let w = window(&[with_smas(102.0, 100.0), with_smas(99.0, 100.0)]);
        assert_eq!(strategy.decide(&w, true), Signal::Sell);
    }

    #[test]
    fn macd_rule_requires_crossover_in_both_directions() {
        let strategy = StrategyKind::MacdReversal;

        let w = window(&[with_macd(-1.0, 0.0), with_macd(1.0, 0.0)]);
        assert_eq!(strategy.decide(&w, false), Signal::Buy);

        let w = window(&[with_macd(1.0, 0.0), with_macd(-1.0, 0.0)]);
        assert_eq!(strategy.decide(&w, true), Signal::Sell);

        // Still above the signal line: no bearish cross, keep holding.
        let w = window(&[with_macd(2.0, 0.0), with_macd(1.0, 0.0)]);
        assert_eq!(strategy.decide(&w, true), Signal::Hold);
    }

    #[test]
    fn crossover_rules_hold_without_two_bars_of_history() {
        let w = window(&[with_smas(101.0, 100.0)]);
        assert_eq!(StrategyKind::MaCrossover.decide(&w, false), Signal::Hold);

        let w = window(&[with_macd(1.0, 0.0)]);
        assert_eq!(StrategyKind::MacdReversal.decide(&w, false), Signal::Hold);
    }
}
