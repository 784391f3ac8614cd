use arus_domain::services::engine::{run_simulation, SimulationParams};
use arus_domain::services::indicators::attach_indicators;
use arus_domain::services::metrics::{compute_metrics, MetricsConfig};
use arus_domain::services::strategy::StrategyKind;
use arus_domain::value_objects::bar::Bar;
use arus_domain::value_objects::trade::TradeKind;
use chrono::NaiveDate;
use proptest::prelude::*;

fn bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).expect("date");
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| Bar {
            date: start + chrono::Days::new(i as u64),
            open: *close,
            high: *close,
            low: *close,
            close: *close,
            volume: 1.0,
        })
        .collect()
}

fn strategy_kind() -> impl Strategy<Value = StrategyKind> {
    prop_oneof![
        Just(StrategyKind::RsiOversold),
        Just(StrategyKind::MaCrossover),
        Just(StrategyKind::MacdReversal),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn equity_curve_covers_every_bar_and_starts_at_initial_capital(
        prices in prop::collection::vec(1.0f64..10_000.0, 1..400),
        strategy in strategy_kind(),
    ) {
        let bars = bars(&prices);
        let snapshots = attach_indicators(&bars);
        let params = SimulationParams::default();
        let outcome = run_simulation(&bars, &snapshots, strategy, &params).unwrap();

        prop_assert_eq!(outcome.equity.len(), bars.len());
        prop_assert!((outcome.equity[0].equity - params.initial_capital).abs() < 1e-9);
        prop_assert!(outcome.equity.iter().all(|p| p.equity.is_finite()));
        prop_assert!(outcome.final_value.is_finite());
    }

    #[test]
    fn trades_alternate_buy_sell_starting_with_buy(
        prices in prop::collection::vec(1.0f64..10_000.0, 200..500),
        strategy in strategy_kind(),
    ) {
        let bars = bars(&prices);
        let snapshots = attach_indicators(&bars);
        let outcome =
            run_simulation(&bars, &snapshots, strategy, &SimulationParams::default()).unwrap();

        for (i, trade) in outcome.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { TradeKind::Buy } else { TradeKind::Sell };
            prop_assert_eq!(trade.kind, expected);
            if trade.kind == TradeKind::Sell {
                prop_assert!(trade.profit.is_some());
                prop_assert!(trade.profit_pct.is_some());
            } else {
                prop_assert!(trade.profit.is_none());
            }
        }
    }

    #[test]
    fn final_value_reconciles_with_the_trade_ledger(
        prices in prop::collection::vec(1.0f64..10_000.0, 200..500),
        strategy in strategy_kind(),
    ) {
        let bars = bars(&prices);
        let snapshots = attach_indicators(&bars);
        let params = SimulationParams::default();
        let outcome = run_simulation(&bars, &snapshots, strategy, &params).unwrap();

        // Replay the ledger against the same closes.
        let mut capital = params.initial_capital;
        let mut position = 0.0f64;
        for trade in &outcome.trades {
            match trade.kind {
                TradeKind::Buy => {
                    position = capital / trade.price;
                    capital = 0.0;
                }
                TradeKind::Sell => {
                    capital = position * trade.price;
                    position = 0.0;
                }
            }
        }
        let expected = if position > 0.0 {
            position * prices[prices.len() - 1]
        } else {
            capital
        };
        prop_assert!((outcome.final_value - expected).abs() < 1e-6 * expected.max(1.0));
    }

    #[test]
    fn win_rate_is_a_percentage(
        prices in prop::collection::vec(1.0f64..10_000.0, 200..500),
        strategy in strategy_kind(),
    ) {
        let bars = bars(&prices);
        let snapshots = attach_indicators(&bars);
        let params = SimulationParams::default();
        let outcome = run_simulation(&bars, &snapshots, strategy, &params).unwrap();
        let metrics = compute_metrics(
            &outcome.trades,
            &outcome.equity,
            params.initial_capital,
            outcome.final_value,
            bars.len(),
            &MetricsConfig::default(),
        );

        prop_assert!((0.0..=100.0).contains(&metrics.win_rate));
        prop_assert!(metrics.max_drawdown_pct >= 0.0);
        prop_assert!(metrics.max_drawdown_pct <= 100.0 + 1e-9);
        prop_assert!(metrics.sharpe_ratio.is_finite());
    }

    #[test]
    fn simulation_is_deterministic(
        prices in prop::collection::vec(1.0f64..10_000.0, 200..400),
        strategy in strategy_kind(),
    ) {
        let bars = bars(&prices);
        let snapshots = attach_indicators(&bars);
        let params = SimulationParams::default();
        let first = run_simulation(&bars, &snapshots, strategy, &params).unwrap();
        let second = run_simulation(&bars, &snapshots, strategy, &params).unwrap();

        prop_assert_eq!(first.final_value, second.final_value);
        prop_assert_eq!(first.trades, second.trades);
        prop_assert_eq!(first.equity.len(), second.equity.len());
    }
}
