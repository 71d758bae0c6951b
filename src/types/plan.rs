//! Position request and plan types

use super::{OrderRequest, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stop-loss type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopLossType {
    /// Static stop price
    Fixed,
    /// Stop that follows favorable price movement
    Trailing,
}

/// Take-profit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakeProfitType {
    /// Resting limit order
    Limit,
    /// Trailing take-profit
    Trailing,
}

/// Kind of adjustment a strategy requests on a price update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Nothing to do
    None,
    /// Move the stop-loss
    AdjustStopLoss,
    /// Move a take-profit
    AdjustTakeProfit,
    /// Close the position
    Close,
    /// Scale into the position
    AddPosition,
}

/// Input to a position calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionParams {
    /// Instrument symbol, opaque to the calculator
    pub symbol: String,
    /// Position side
    pub side: Side,
    /// Planned entry price
    pub entry_price: Decimal,
    /// Stop-loss price
    pub stop_loss: Decimal,
    /// Account balance in quote currency
    pub account_balance: Decimal,
    /// Percent of balance to risk, in (0, 100]
    pub risk_percent: Decimal,
    /// Caller's leverage ceiling; `None` uses the strategy default
    pub max_leverage: Option<u32>,
}

impl PositionParams {
    /// Create new position params without a leverage override
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        entry_price: Decimal,
        stop_loss: Decimal,
        account_balance: Decimal,
        risk_percent: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            entry_price,
            stop_loss,
            account_balance,
            risk_percent,
            max_leverage: None,
        }
    }

    /// Set the caller's leverage ceiling
    pub fn with_max_leverage(mut self, max_leverage: u32) -> Self {
        self.max_leverage = Some(max_leverage);
        self
    }
}

/// Stop-loss descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossLevel {
    /// Stop price
    pub price: Decimal,
    /// Stop type
    #[serde(rename = "type")]
    pub kind: StopLossType,
    /// Price at which a trailing stop starts following (trailing only)
    pub activation_price: Option<Decimal>,
    /// Trailing distance in percent (trailing only)
    pub callback_rate: Option<Decimal>,
}

impl StopLossLevel {
    /// A fixed stop at `price`
    pub fn fixed(price: Decimal) -> Self {
        Self {
            price,
            kind: StopLossType::Fixed,
            activation_price: None,
            callback_rate: None,
        }
    }

    /// A trailing stop with an initial stop at `price`
    pub fn trailing(price: Decimal, activation_price: Decimal, callback_rate: Decimal) -> Self {
        Self {
            price,
            kind: StopLossType::Trailing,
            activation_price: Some(activation_price),
            callback_rate: Some(callback_rate),
        }
    }
}

/// Take-profit descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitLevel {
    /// Target price
    pub price: Decimal,
    /// Percent of the position closed at this level
    pub percentage: Decimal,
    /// Take-profit type
    #[serde(rename = "type")]
    pub kind: TakeProfitType,
    /// Activation price (trailing only)
    pub activation_price: Option<Decimal>,
    /// Trailing distance in percent (trailing only)
    pub callback_rate: Option<Decimal>,
}

impl TakeProfitLevel {
    /// A limit take-profit closing `percentage` of the position
    pub fn limit(price: Decimal, percentage: Decimal) -> Self {
        Self {
            price,
            percentage,
            kind: TakeProfitType::Limit,
            activation_price: None,
            callback_rate: None,
        }
    }
}

/// Output of a position calculation
///
/// A snapshot: produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPlan {
    /// Instrument symbol
    pub symbol: String,
    /// Position side
    pub side: Side,
    /// Position size in base units
    pub size: Decimal,
    /// Entry price
    pub entry_price: Decimal,
    /// Leverage, in [1, max leverage]
    pub leverage: u32,
    /// Stop-loss
    pub stop_loss: StopLossLevel,
    /// Take-profit levels, nearest first
    pub take_profits: Vec<TakeProfitLevel>,
    /// Amount at risk in quote currency
    pub risk_amount: Decimal,
    /// Effective risk percent
    pub risk_percent: Decimal,
    /// Size times entry price
    pub notional_value: Decimal,
    /// Name of the producing strategy
    pub strategy_name: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

/// Result of a price-update callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAction {
    /// What to do
    #[serde(rename = "type")]
    pub kind: ActionType,
    /// Human-readable reason
    pub reason: Option<String>,
    /// Orders the execution layer should place
    pub orders: Vec<OrderRequest>,
}

impl StrategyAction {
    /// No action
    pub fn none() -> Self {
        Self {
            kind: ActionType::None,
            reason: None,
            orders: vec![],
        }
    }

    /// An action with a reason and no orders
    pub fn new(kind: ActionType, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: Some(reason.into()),
            orders: vec![],
        }
    }

    /// Attach a derived order
    pub fn with_order(mut self, order: OrderRequest) -> Self {
        self.orders.push(order);
        self
    }

    /// Whether this action asks for anything
    pub fn is_none(&self) -> bool {
        self.kind == ActionType::None
    }
}

impl Default for StrategyAction {
    fn default() -> Self {
        Self::none()
    }
}
