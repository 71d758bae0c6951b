//! Strategy module
//!
//! A `Strategy` turns `PositionParams` into a `PositionPlan` using the
//! calculator, and reacts to lifecycle events of the resulting position.
//! Variants are selected by name or configuration through `create_strategy`.

mod conservative;
mod multi_tp;
mod risk_ratio;
mod trailing;
mod types;

pub use conservative::ConservativeStrategy;
pub use multi_tp::{default_ladder, MultiTakeProfitStrategy, TakeProfitTarget};
pub use risk_ratio::RiskRatioStrategy;
pub use trailing::TrailingStopStrategy;
pub use types::StrategyError;

use crate::calculator::{Calculator, CalculatorError};
use crate::config::StrategyConfig;
use crate::types::{Position, PositionParams, PositionPlan, StrategyAction};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Trait for position strategies
///
/// Lifecycle hooks default to doing nothing, which suits strategies that
/// leave closing to the resting stop-loss and take-profit orders.
pub trait Strategy: Send + Sync {
    /// Stable identifier
    fn name(&self) -> &'static str;

    /// Human-readable summary
    fn description(&self) -> String;

    /// Strategy-specific checks beyond calculator validation
    fn validate_params(&self, params: &PositionParams) -> Result<(), StrategyError>;

    /// Calculate size, leverage, stop-loss and take-profits
    fn calculate_position(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError>;

    /// Called once when a plan becomes a live position
    fn on_position_opened(&self, _position: &Position) -> Result<(), StrategyError> {
        Ok(())
    }

    /// Called on every price tick
    fn on_price_update(
        &self,
        _position: &Position,
        _current_price: Decimal,
    ) -> Result<StrategyAction, StrategyError> {
        Ok(StrategyAction::none())
    }

    /// Independent close decision, returns `(close, reason)`
    fn should_close(&self, _position: &Position, _current_price: Decimal) -> (bool, String) {
        (false, String::new())
    }

    /// Called when the position is gone
    fn on_position_closed(&self, _position: &Position) {}
}

/// Available strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    RiskRatio,
    Conservative,
    #[serde(rename = "multi-tp")]
    MultiTakeProfit,
    TrailingStop,
}

impl StrategyKind {
    /// All variants, in display order
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::RiskRatio,
        StrategyKind::Conservative,
        StrategyKind::MultiTakeProfit,
        StrategyKind::TrailingStop,
    ];

    /// Registered name
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::RiskRatio => "risk-ratio",
            StrategyKind::Conservative => "conservative",
            StrategyKind::MultiTakeProfit => "multi-tp",
            StrategyKind::TrailingStop => "trailing-stop",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StrategyError::UnknownStrategy(s.to_string()))
    }
}

/// Create a strategy from configuration
///
/// `calculator` carries the default leverage ceiling; the conservative
/// strategy narrows it further with its own.
pub fn create_strategy(
    config: &StrategyConfig,
    calculator: Calculator,
) -> Result<Box<dyn Strategy>, StrategyError> {
    let strategy: Box<dyn Strategy> = match config.kind {
        StrategyKind::RiskRatio => {
            check_rr_ratio(config.rr_ratio)?;
            Box::new(RiskRatioStrategy::with_calculator(config.rr_ratio, calculator))
        }
        StrategyKind::Conservative => Box::new(ConservativeStrategy::new(
            config.rr_ratio,
            config.max_risk_percent,
            config.max_leverage.min(calculator.max_leverage()),
        )?),
        StrategyKind::MultiTakeProfit => Box::new(MultiTakeProfitStrategy::with_calculator(
            config.take_profits.clone(),
            calculator,
        )?),
        StrategyKind::TrailingStop => Box::new(TrailingStopStrategy::with_calculator(
            config.rr_ratio,
            config.activation_percent,
            config.callback_rate,
            calculator,
        )?),
    };

    tracing::debug!(
        strategy = strategy.name(),
        description = %strategy.description(),
        "Strategy created"
    );
    Ok(strategy)
}

/// Size and leverage shared by every plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sizing {
    pub size: Decimal,
    pub leverage: u32,
    pub risk_amount: Decimal,
    pub notional_value: Decimal,
}

/// Validate a request and size it at `risk_percent`
///
/// Nothing is computed unless calculator validation passes.
pub(crate) fn size_position(
    calculator: &Calculator,
    params: &PositionParams,
    risk_percent: Decimal,
) -> Result<Sizing, StrategyError> {
    calculator.validate_inputs(
        params.side,
        params.entry_price,
        params.stop_loss,
        risk_percent,
        params.account_balance,
    )?;

    let max_leverage = calculator.resolve_max_leverage(params.max_leverage)?;

    let size = calculator.calculate_size(
        params.account_balance,
        risk_percent,
        params.entry_price,
        params.stop_loss,
        params.side,
    )?;

    let leverage = calculator.calculate_leverage(
        size,
        params.entry_price,
        params.account_balance,
        max_leverage,
    );

    let notional_value = size.checked_mul(params.entry_price).ok_or_else(|| {
        CalculatorError::InvalidInput(format!(
            "notional value of {size} at {} overflows decimal range",
            params.entry_price
        ))
    })?;

    Ok(Sizing {
        size,
        leverage,
        risk_amount: Calculator::risk_amount(params.account_balance, risk_percent)?,
        notional_value,
    })
}

/// Reject non-positive risk-reward ratios
pub(crate) fn check_rr_ratio(rr_ratio: Decimal) -> Result<(), StrategyError> {
    if rr_ratio <= Decimal::ZERO {
        return Err(StrategyError::InvalidParams(format!(
            "risk-reward ratio must be positive: {rr_ratio}"
        )));
    }
    Ok(())
}
