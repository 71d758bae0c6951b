//! Conservative risk-reward strategy
//!
//! Same shape as the risk-ratio plan, but the strategy enforces its own
//! risk and leverage ceilings. A request above either ceiling is clamped,
//! not rejected, and the plan reports the clamped values.

use super::{check_rr_ratio, size_position, Strategy, StrategyError};
use crate::calculator::Calculator;
use crate::telemetry;
use crate::types::{PositionParams, PositionPlan, StopLossLevel, TakeProfitLevel};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Conservative strategy with capped risk and leverage
#[derive(Debug, Clone)]
pub struct ConservativeStrategy {
    calculator: Calculator,
    rr_ratio: Decimal,
    /// Maximum percent of balance risked per trade
    max_risk_percent: Decimal,
}

impl ConservativeStrategy {
    /// Create a new conservative strategy
    pub fn new(
        rr_ratio: Decimal,
        max_risk_percent: Decimal,
        max_leverage: u32,
    ) -> Result<Self, StrategyError> {
        check_rr_ratio(rr_ratio)?;

        if max_risk_percent <= Decimal::ZERO || max_risk_percent > dec!(100) {
            return Err(StrategyError::InvalidParams(format!(
                "max risk percent must be between 0 and 100: {max_risk_percent}"
            )));
        }
        if max_leverage == 0 {
            return Err(StrategyError::InvalidParams(
                "max leverage must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            calculator: Calculator::new(max_leverage),
            rr_ratio,
            max_risk_percent,
        })
    }

    /// Leverage ceiling enforced by this strategy
    pub fn max_leverage(&self) -> u32 {
        self.calculator.max_leverage()
    }

    /// Risk ceiling enforced by this strategy
    pub fn max_risk_percent(&self) -> Decimal {
        self.max_risk_percent
    }

    fn build_plan(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        self.validate_params(params)?;

        // Reject nonsense before clamping so 150% is an error, not 1%
        self.calculator.validate_inputs(
            params.side,
            params.entry_price,
            params.stop_loss,
            params.risk_percent,
            params.account_balance,
        )?;

        let risk_percent = params.risk_percent.min(self.max_risk_percent);
        if risk_percent < params.risk_percent {
            tracing::warn!(
                strategy = self.name(),
                requested = %params.risk_percent,
                capped = %risk_percent,
                "Risk percent capped"
            );
        }

        let sizing = size_position(&self.calculator, params, risk_percent)?;

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
            risk_percent,
            notional_value: sizing.notional_value,
            strategy_name: self.name().to_string(),
            timestamp: Utc::now(),
        })
    }
}

impl Default for ConservativeStrategy {
    fn default() -> Self {
        Self {
            calculator: Calculator::new(10),
            rr_ratio: dec!(1.5),
            max_risk_percent: dec!(1),
        }
    }
}

impl Strategy for ConservativeStrategy {
    fn name(&self) -> &'static str {
        "conservative"
    }

    fn description(&self) -> String {
        format!(
            "Conservative strategy ({:.1}:1 RR, max {:.1}% risk, max {}x leverage)",
            self.rr_ratio,
            self.max_risk_percent,
            self.max_leverage()
        )
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
