//! Strategy contract integration tests

use position_strategy::config::StrategyConfig;
use position_strategy::strategy::{create_strategy, StrategyKind};
use position_strategy::{
    Calculator, CalculatorError, PositionParams, Side, Strategy, StrategyError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn all_strategies() -> Vec<Box<dyn Strategy>> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| {
            let config = StrategyConfig {
                kind,
                ..StrategyConfig::default()
            };
            create_strategy(&config, Calculator::default()).unwrap()
        })
        .collect()
}

fn valid_requests() -> Vec<PositionParams> {
    vec![
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(44500), dec!(1000), dec!(2))
            .with_max_leverage(125),
        PositionParams::new("ETH-USDT", Side::Short, dec!(3000), dec!(3100), dec!(1000), dec!(1.5))
            .with_max_leverage(100),
        PositionParams::new("SOL-USDT", Side::Long, dec!(150), dec!(149), dec!(250), dec!(5)),
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(44990), dec!(100), dec!(1))
            .with_max_leverage(20),
    ]
}

#[test]
fn test_every_plan_respects_invariants() {
    for strategy in all_strategies() {
        for params in valid_requests() {
            let plan = strategy.calculate_position(&params).unwrap();
            let max_leverage = params.max_leverage.unwrap_or(125);

            assert!(plan.size > Decimal::ZERO, "{}", strategy.name());
            assert!(plan.leverage >= 1, "{}", strategy.name());
            assert!(plan.leverage <= max_leverage, "{}", strategy.name());
            assert!(plan.risk_percent <= params.risk_percent, "{}", strategy.name());
            assert_eq!(plan.notional_value, plan.size * plan.entry_price);
            assert_eq!(plan.strategy_name, strategy.name());

            let total: Decimal = plan.take_profits.iter().map(|tp| tp.percentage).sum();
            assert_eq!(total, dec!(100), "{}", strategy.name());

            for tp in &plan.take_profits {
                match params.side {
                    Side::Long => assert!(tp.price > plan.entry_price),
                    Side::Short => assert!(tp.price < plan.entry_price),
                }
            }
        }
    }
}

#[test]
fn test_size_formula_holds_for_uncapped_strategies() {
    let strategy = create_strategy(&StrategyConfig::default(), Calculator::default()).unwrap();

    for params in valid_requests() {
        let plan = strategy.calculate_position(&params).unwrap();
        let price_risk = match params.side {
            Side::Long => params.entry_price - params.stop_loss,
            Side::Short => params.stop_loss - params.entry_price,
        };
        let expected = params.account_balance * params.risk_percent / dec!(100) / price_risk;
        assert_eq!(plan.size, expected);

        let required = (plan.size * params.entry_price / params.account_balance).ceil();
        let max_leverage = Decimal::from(params.max_leverage.unwrap_or(125));
        let expected_leverage = required.max(Decimal::ONE).min(max_leverage);
        assert_eq!(Decimal::from(plan.leverage), expected_leverage);
    }
}

#[test]
fn test_every_strategy_rejects_invariant_violations() {
    let invalid = vec![
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(46000), dec!(1000), dec!(2)),
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(45000), dec!(1000), dec!(2)),
        PositionParams::new("ETH-USDT", Side::Short, dec!(3000), dec!(2900), dec!(1000), dec!(2)),
        PositionParams::new("ETH-USDT", Side::Short, dec!(3000), dec!(3000), dec!(1000), dec!(2)),
        PositionParams::new(
            "BTC-USDT",
            Side::Long,
            dec!(45000),
            dec!(44500),
            dec!(1000),
            dec!(150),
        ),
        PositionParams::new("BTC-USDT", Side::Long, dec!(-45000), dec!(44500), dec!(1000), dec!(2)),
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(44500), dec!(0), dec!(2)),
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(44500), dec!(1000), dec!(2))
            .with_max_leverage(0),
    ];

    for strategy in all_strategies() {
        for params in &invalid {
            let result = strategy.calculate_position(params);
            assert!(
                matches!(result, Err(StrategyError::ValidationFailed(_))),
                "{} accepted {:?}",
                strategy.name(),
                params
            );
        }
    }
}

#[test]
fn test_stop_loss_error_is_typed() {
    let strategy = create_strategy(&StrategyConfig::default(), Calculator::default()).unwrap();
    let params =
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(46000), dec!(1000), dec!(2));

    match strategy.calculate_position(&params) {
        Err(StrategyError::ValidationFailed(CalculatorError::InvalidStopLoss { side, .. })) => {
            assert_eq!(side, Side::Long)
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_plans_are_idempotent_except_timestamp() {
    for strategy in all_strategies() {
        for params in valid_requests() {
            let first = strategy.calculate_position(&params).unwrap();
            let mut second = strategy.calculate_position(&params).unwrap();
            assert!(second.timestamp >= first.timestamp);
            second.timestamp = first.timestamp;
            assert_eq!(first, second, "{}", strategy.name());
        }
    }
}

#[test]
fn test_plan_serializes_to_json() {
    let strategy = create_strategy(&StrategyConfig::default(), Calculator::default()).unwrap();
    let plan = strategy.calculate_position(&valid_requests()[0]).unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["symbol"], "BTC-USDT");
    assert_eq!(json["side"], "long");
    assert_eq!(json["leverage"], 2);
    assert_eq!(json["stop_loss"]["type"], "fixed");
    assert_eq!(json["take_profits"][0]["type"], "limit");
    assert_eq!(json["strategy_name"], "risk-ratio");
}

#[test]
fn test_strategies_are_shareable_across_threads() {
    let strategy = create_strategy(&StrategyConfig::default(), Calculator::default()).unwrap();
    let strategy: std::sync::Arc<dyn Strategy> = std::sync::Arc::from(strategy);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let strategy = strategy.clone();
            std::thread::spawn(move || {
                let params = PositionParams::new(
                    "BTC-USDT",
                    Side::Long,
                    dec!(45000),
                    dec!(44500),
                    dec!(1000),
                    dec!(2),
                );
                strategy.calculate_position(&params).unwrap().size
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), dec!(0.04));
    }
}
