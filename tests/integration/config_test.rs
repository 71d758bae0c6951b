//! Configuration integration tests

use position_strategy::config::Config;
use position_strategy::strategy::{create_strategy, StrategyKind};
use rust_decimal_macros::dec;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.calculator.default_max_leverage, 125);
    assert_eq!(config.strategy.kind, StrategyKind::RiskRatio);
    assert_eq!(config.strategy.rr_ratio, dec!(2));
    assert_eq!(config.strategy.take_profits.len(), 3);
}

#[test]
fn test_every_strategy_builds_from_example_config() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();

    for kind in StrategyKind::ALL {
        let mut strategy_config = config.strategy.clone();
        strategy_config.kind = kind;
        let strategy = create_strategy(&strategy_config, config.calculator.calculator()).unwrap();
        assert_eq!(strategy.name(), kind.as_str());
        assert!(!strategy.description().is_empty());
    }
}

#[test]
fn test_calculator_ceiling_flows_into_strategy() {
    let toml = r#"
        [calculator]
        default_max_leverage = 3
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    let strategy = create_strategy(&config.strategy, config.calculator.calculator()).unwrap();

    // Requires 9x, calculator allows 3x
    let params = position_strategy::PositionParams::new(
        "BTC-USDT",
        position_strategy::Side::Long,
        dec!(45000),
        dec!(44900),
        dec!(1000),
        dec!(2),
    );
    assert_eq!(strategy.calculate_position(&params).unwrap().leverage, 3);
}
