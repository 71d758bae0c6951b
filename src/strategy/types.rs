//! Strategy error types

use crate::calculator::CalculatorError;
use thiserror::Error;

/// Strategy errors
///
/// A caller receiving any of these got no plan at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// Calculator rejected the request
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] CalculatorError),
    /// Strategy configuration or strategy-specific input is invalid
    #[error("invalid strategy params: {0}")]
    InvalidParams(String),
    /// No strategy registered under this name
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

impl StrategyError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyError::ValidationFailed(CalculatorError::InvalidInput(_)) => "invalid_input",
            StrategyError::ValidationFailed(CalculatorError::InvalidStopLoss { .. }) => {
                "invalid_stop_loss"
            }
            StrategyError::ValidationFailed(CalculatorError::InvalidOrderPlacement { .. }) => {
                "invalid_order_placement"
            }
            StrategyError::InvalidParams(_) => "invalid_params",
            StrategyError::UnknownStrategy(_) => "unknown_strategy",
        }
    }
}
