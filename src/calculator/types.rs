//! Calculator error types

use crate::types::Side;
use rust_decimal::Decimal;
use thiserror::Error;

/// Calculator validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    /// Malformed or out-of-range numeric input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Stop-loss on the wrong side of entry
    #[error("{side} stop loss ({stop_loss:.4}) must be {} entry ({entry:.4})", relation(.side))]
    InvalidStopLoss {
        side: Side,
        entry: Decimal,
        stop_loss: Decimal,
    },
    /// Resting entry order would execute immediately
    #[error("{side} limit order entry ({entry:.4}) must be {} current price ({current:.4})", relation(.side))]
    InvalidOrderPlacement {
        side: Side,
        entry: Decimal,
        current: Decimal,
    },
}

/// Where a stop or resting entry must sit relative to the reference price
fn relation(side: &Side) -> &'static str {
    match side {
        Side::Long => "below",
        Side::Short => "above",
    }
}
