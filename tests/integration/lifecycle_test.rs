//! Position lifecycle integration tests

use position_strategy::strategy::{RiskRatioStrategy, TrailingStopStrategy};
use position_strategy::types::{ActionType, Position, StopLossType};
use position_strategy::{PositionParams, Side, Strategy};
use rust_decimal_macros::dec;

fn open_from_plan(strategy: &dyn Strategy, params: &PositionParams) -> Position {
    let plan = strategy.calculate_position(params).unwrap();
    let position = Position::new(plan.symbol.clone(), plan.side, plan.size, plan.entry_price)
        .with_leverage(plan.leverage);
    strategy.on_position_opened(&position).unwrap();
    position
}

#[test]
fn test_risk_ratio_leaves_lifecycle_to_orders() {
    let strategy = RiskRatioStrategy::new(dec!(2));
    let params =
        PositionParams::new("BTC-USDT", Side::Long, dec!(45000), dec!(44500), dec!(1000), dec!(2));
    let position = open_from_plan(&strategy, &params);

    for price in [dec!(40000), dec!(44500), dec!(45000), dec!(46000), dec!(60000)] {
        let action = strategy.on_price_update(&position, price).unwrap();
        assert_eq!(action.kind, ActionType::None);
        assert!(action.orders.is_empty());
        assert_eq!(strategy.should_close(&position, price), (false, String::new()));
    }
}

#[test]
fn test_trailing_stop_full_lifecycle() {
    let strategy = TrailingStopStrategy::new(dec!(3), dec!(1), dec!(0.5)).unwrap();
    let params =
        PositionParams::new("ETH-USDT", Side::Short, dec!(3000), dec!(3100), dec!(1000), dec!(2));

    let plan = strategy.calculate_position(&params).unwrap();
    assert_eq!(plan.stop_loss.kind, StopLossType::Trailing);
    assert_eq!(plan.stop_loss.activation_price, Some(dec!(2970)));

    let position = open_from_plan(&strategy, &params);
    assert_eq!(strategy.tracked_count(), 1);

    // Not yet armed
    assert!(strategy.on_price_update(&position, dec!(2980)).unwrap().is_none());
    assert!(!strategy.should_close(&position, dec!(3050)).0);

    // Armed at 2960 -> stop 2974.8
    let action = strategy.on_price_update(&position, dec!(2960)).unwrap();
    assert_eq!(action.kind, ActionType::AdjustStopLoss);
    assert_eq!(action.orders[0].stop_price, Some(dec!(2974.8)));
    assert_eq!(action.orders[0].size, position.size);

    // Bounce below the stop keeps it open, above it closes
    assert!(!strategy.should_close(&position, dec!(2970)).0);
    let (close, reason) = strategy.should_close(&position, dec!(2980));
    assert!(close);
    assert!(!reason.is_empty());

    strategy.on_position_closed(&position);
    assert_eq!(strategy.tracked_count(), 0);
}
