//! Multi-level take-profit strategy
//!
//! Scales out of a position over a ladder of risk-reward targets.

use super::{check_rr_ratio, size_position, Strategy, StrategyError};
use crate::calculator::Calculator;
use crate::telemetry;
use crate::types::{PositionParams, PositionPlan, StopLossLevel, TakeProfitLevel};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One rung of a take-profit ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitTarget {
    /// Reward multiple of the stop distance
    pub rr_ratio: Decimal,
    /// Percent of the position closed at this rung
    pub percentage: Decimal,
}

impl TakeProfitTarget {
    pub fn new(rr_ratio: Decimal, percentage: Decimal) -> Self {
        Self {
            rr_ratio,
            percentage,
        }
    }
}

/// Default ladder: half at 1R, 30% at 2R, the rest at 3R
pub fn default_ladder() -> Vec<TakeProfitTarget> {
    vec![
        TakeProfitTarget::new(dec!(1), dec!(50)),
        TakeProfitTarget::new(dec!(2), dec!(30)),
        TakeProfitTarget::new(dec!(3), dec!(20)),
    ]
}

/// Multi-level take-profit strategy
#[derive(Debug, Clone)]
pub struct MultiTakeProfitStrategy {
    calculator: Calculator,
    /// Sorted nearest first
    targets: Vec<TakeProfitTarget>,
}

impl MultiTakeProfitStrategy {
    /// Create a new multi take-profit strategy with the default 125x ceiling
    pub fn new(targets: Vec<TakeProfitTarget>) -> Result<Self, StrategyError> {
        Self::with_calculator(targets, Calculator::default())
    }

    /// Create a new multi take-profit strategy with a specific calculator
    pub fn with_calculator(
        mut targets: Vec<TakeProfitTarget>,
        calculator: Calculator,
    ) -> Result<Self, StrategyError> {
        validate_ladder(&targets)?;
        targets.sort_by(|a, b| a.rr_ratio.cmp(&b.rr_ratio));
        Ok(Self {
            calculator,
            targets,
        })
    }

    /// Configured ladder, nearest first
    pub fn targets(&self) -> &[TakeProfitTarget] {
        &self.targets
    }

    fn build_plan(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        self.validate_params(params)?;

        let sizing = size_position(&self.calculator, params, params.risk_percent)?;

        let take_profits = self
            .targets
            .iter()
            .map(|target| {
                let price = self.calculator.calculate_rr_take_profit(
                    params.entry_price,
                    params.stop_loss,
                    target.rr_ratio,
                    params.side,
                )?;
                Ok(TakeProfitLevel::limit(price, target.percentage))
            })
            .collect::<Result<Vec<_>, StrategyError>>()?;

        Ok(PositionPlan {
            symbol: params.symbol.clone(),
            side: params.side,
            size: sizing.size,
            entry_price: params.entry_price,
            leverage: sizing.leverage,
            stop_loss: StopLossLevel::fixed(params.stop_loss),
            take_profits,
            risk_amount: sizing.risk_amount,
            risk_percent: params.risk_percent,
            notional_value: sizing.notional_value,
            strategy_name: self.name().to_string(),
            timestamp: Utc::now(),
        })
    }
}

/// Ladder must be non-empty, with positive ratios and percentages summing to 100
fn validate_ladder(targets: &[TakeProfitTarget]) -> Result<(), StrategyError> {
    if targets.is_empty() {
        return Err(StrategyError::InvalidParams(
            "at least one take-profit target is required".to_string(),
        ));
    }

    for target in targets {
        check_rr_ratio(target.rr_ratio)?;
        if target.percentage <= Decimal::ZERO || target.percentage > dec!(100) {
            return Err(StrategyError::InvalidParams(format!(
                "take-profit percentage must be between 0 and 100: {}",
                target.percentage
            )));
        }
    }

    let total: Decimal = targets.iter().map(|t| t.percentage).sum();
    if total != dec!(100) {
        return Err(StrategyError::InvalidParams(format!(
            "take-profit percentages must sum to 100, got {total}"
        )));
    }
    Ok(())
}

impl Strategy for MultiTakeProfitStrategy {
    fn name(&self) -> &'static str {
        "multi-tp"
    }

    fn description(&self) -> String {
        let rungs: Vec<String> = self
            .targets
            .iter()
            .map(|t| format!("{}% @ {:.1}R", t.percentage, t.rr_ratio))
            .collect();
        format!("Multi-level take-profit strategy ({})", rungs.join(", "))
    }

    fn validate_params(&self, _params: &PositionParams) -> Result<(), StrategyError> {
        validate_ladder(&self.targets)
    }

    fn calculate_position(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        let result = self.build_plan(params);
        telemetry::record_plan_outcome(self.name(), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Side, TakeProfitType};

    #[test]
    fn test_default_ladder_is_valid() {
        let strategy = MultiTakeProfitStrategy::new(default_ladder()).unwrap();
        assert_eq!(strategy.targets().len(), 3);
        assert_eq!(
            strategy.description(),
            "Multi-level take-profit strategy (50% @ 1.0R, 30% @ 2.0R, 20% @ 3.0R)"
        );
    }

    #[test]
    fn test_ladder_must_sum_to_100() {
        let result = MultiTakeProfitStrategy::new(vec![
            TakeProfitTarget::new(dec!(1), dec!(50)),
            TakeProfitTarget::new(dec!(2), dec!(40)),
        ]);
        assert!(matches!(result, Err(StrategyError::InvalidParams(_))));
    }

    #[test]
    fn test_ladder_rejects_empty_and_bad_rungs() {
        assert!(MultiTakeProfitStrategy::new(vec![]).is_err());
        assert!(MultiTakeProfitStrategy::new(vec![
            TakeProfitTarget::new(dec!(0), dec!(50)),
            TakeProfitTarget::new(dec!(2), dec!(50)),
        ])
        .is_err());
        assert!(MultiTakeProfitStrategy::new(vec![
            TakeProfitTarget::new(dec!(1), dec!(120)),
            TakeProfitTarget::new(dec!(2), dec!(-20)),
        ])
        .is_err());
    }

    #[test]
    fn test_ladder_is_sorted_nearest_first() {
        let strategy = MultiTakeProfitStrategy::new(vec![
            TakeProfitTarget::new(dec!(3), dec!(25)),
            TakeProfitTarget::new(dec!(1), dec!(75)),
        ])
        .unwrap();
        assert_eq!(strategy.targets()[0].rr_ratio, dec!(1));
        assert_eq!(strategy.targets()[1].rr_ratio, dec!(3));
    }

    #[test]
    fn test_calculate_position_long() {
        let strategy = MultiTakeProfitStrategy::new(default_ladder()).unwrap();
        let params = PositionParams::new(
            "BTC-USDT",
            Side::Long,
            dec!(45000),
            dec!(44500),
            dec!(1000),
            dec!(2),
        );

        let plan = strategy.calculate_position(&params).unwrap();
        assert_eq!(plan.size, dec!(0.04));
        assert_eq!(plan.leverage, 2);
        assert_eq!(plan.strategy_name, "multi-tp");

        let prices: Vec<Decimal> = plan.take_profits.iter().map(|tp| tp.price).collect();
        assert_eq!(prices, vec![dec!(45500), dec!(46000), dec!(46500)]);

        let total: Decimal = plan.take_profits.iter().map(|tp| tp.percentage).sum();
        assert_eq!(total, dec!(100));
        assert!(plan
            .take_profits
            .iter()
            .all(|tp| tp.kind == TakeProfitType::Limit));
    }

    #[test]
    fn test_calculate_position_short() {
        let strategy = MultiTakeProfitStrategy::new(default_ladder()).unwrap();
        let params = PositionParams::new(
            "ETH-USDT",
            Side::Short,
            dec!(3000),
            dec!(3100),
            dec!(1000),
            dec!(2),
        );

        let plan = strategy.calculate_position(&params).unwrap();
        let prices: Vec<Decimal> = plan.take_profits.iter().map(|tp| tp.price).collect();
        assert_eq!(prices, vec![dec!(2900), dec!(2800), dec!(2700)]);
    }

    #[test]
    fn test_calculate_position_rejects_invalid_input() {
        let strategy = MultiTakeProfitStrategy::new(default_ladder()).unwrap();
        let params = PositionParams::new(
            "ETH-USDT",
            Side::Short,
            dec!(3000),
            dec!(2900),
            dec!(1000),
            dec!(2),
        );
        assert!(strategy.calculate_position(&params).is_err());
    }
}
