//! Fixed risk-reward ratio strategy
//!
//! Places one fixed stop and one take-profit at `rr_ratio` times the stop
//! distance. Once those orders rest on the book there is nothing left to
//! manage, so the lifecycle hooks keep their no-op defaults.

use super::{check_rr_ratio, size_position, Strategy, StrategyError};
use crate::calculator::Calculator;
use crate::telemetry;
use crate::types::{PositionParams, PositionPlan, StopLossLevel, TakeProfitLevel};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed risk-reward ratio strategy
#[derive(Debug, Clone)]
pub struct RiskRatioStrategy {
    calculator: Calculator,
    /// Reward multiple of the stop distance (e.g., 2.0 for 2:1)
    rr_ratio: Decimal,
}

impl RiskRatioStrategy {
    /// Create a new risk-ratio strategy with the default 125x ceiling
    pub fn new(rr_ratio: Decimal) -> Self {
        Self::with_calculator(rr_ratio, Calculator::default())
    }

    /// Create a new risk-ratio strategy with a specific calculator
    pub fn with_calculator(rr_ratio: Decimal, calculator: Calculator) -> Self {
        Self {
            calculator,
            rr_ratio,
        }
    }

    /// Configured risk-reward ratio
    pub fn rr_ratio(&self) -> Decimal {
        self.rr_ratio
    }

    fn build_plan(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        self.validate_params(params)?;

        let sizing = size_position(&self.calculator, params, params.risk_percent)?;

        let tp_price = self.calculator.calculate_rr_take_profit(
            params.entry_price,
            params.stop_loss,
            self.rr_ratio,
            params.side,
        )?;

        Ok(PositionPlan {
            symbol: params.symbol.clone(),
            side: params.side,
            size: sizing.size,
            entry_price: params.entry_price,
            leverage: sizing.leverage,
            stop_loss: StopLossLevel::fixed(params.stop_loss),
            take_profits: vec![TakeProfitLevel::limit(tp_price, dec!(100))],
            risk_amount: sizing.risk_amount,
            risk_percent: params.risk_percent,
            notional_value: sizing.notional_value,
            strategy_name: self.name().to_string(),
            timestamp: Utc::now(),
        })
    }
}

impl Default for RiskRatioStrategy {
    fn default() -> Self {
        Self::new(dec!(2))
    }
}

impl Strategy for RiskRatioStrategy {
    fn name(&self) -> &'static str {
        "risk-ratio"
    }

    fn description(&self) -> String {
        format!("Fixed risk-reward ratio strategy ({:.1}:1)", self.rr_ratio)
    }

    fn validate_params(&self, _params: &PositionParams) -> Result<(), StrategyError> {
        check_rr_ratio(self.rr_ratio)
    }

    fn calculate_position(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        let result = self.build_plan(params);
        telemetry::record_plan_outcome(self.name(), &result);
        result
    }
}
