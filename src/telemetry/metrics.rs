//! Strategy metrics
//!
//! Counters go through the `metrics` facade; they are no-ops until the
//! embedding application installs a recorder.

use crate::strategy::StrategyError;
use crate::types::{ActionType, PositionPlan};

const PLANS_TOTAL: &str = "position_strategy_plans_total";
const PLANS_REJECTED_TOTAL: &str = "position_strategy_plans_rejected_total";
const ACTIONS_TOTAL: &str = "position_strategy_actions_total";

/// Record the outcome of a position calculation
pub fn record_plan_outcome(strategy: &'static str, result: &Result<PositionPlan, StrategyError>) {
    match result {
        Ok(plan) => {
            ::metrics::counter!(PLANS_TOTAL, "strategy" => strategy).increment(1);
            tracing::debug!(
                strategy,
                symbol = %plan.symbol,
                side = %plan.side,
                size = %plan.size,
                leverage = plan.leverage,
                risk_amount = %plan.risk_amount,
                take_profits = plan.take_profits.len(),
                "Position plan calculated"
            );
        }
        Err(e) => {
            ::metrics::counter!(PLANS_REJECTED_TOTAL, "strategy" => strategy, "reason" => e.kind())
                .increment(1);
            tracing::debug!(strategy, error = %e, "Position plan rejected");
        }
    }
}

/// Record a non-trivial strategy action
pub fn record_action(strategy: &'static str, kind: ActionType) {
    let kind = match kind {
        ActionType::None => return,
        ActionType::AdjustStopLoss => "adjust_stop_loss",
        ActionType::AdjustTakeProfit => "adjust_take_profit",
        ActionType::Close => "close",
        ActionType::AddPosition => "add_position",
    };
    ::metrics::counter!(ACTIONS_TOTAL, "strategy" => strategy, "action" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalculatorError;

    #[test]
    fn test_record_without_recorder_is_noop() {
        let err = StrategyError::ValidationFailed(CalculatorError::InvalidInput("x".to_string()));
        record_plan_outcome("risk-ratio", &Err(err));
        record_action("trailing-stop", ActionType::AdjustStopLoss);
        record_action("trailing-stop", ActionType::None);
    }
}
