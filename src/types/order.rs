//! Order and position snapshot types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Position identifier
pub type PositionId = Uuid;

/// Directional stance of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Profits when price rises
    Long,
    /// Profits when price falls
    Short,
}

impl Side {
    /// The side that closes a position opened on this side
    pub fn opposite(self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price specified)
    Limit,
    /// Stop-market order
    Stop,
    /// Take-profit order
    TakeProfit,
}

/// An order derived from a strategy decision
///
/// The core never submits these; the execution layer does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Instrument symbol
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Order type
    pub order_type: OrderType,
    /// Order size
    pub size: Decimal,
    /// Limit price, if any
    pub price: Option<Decimal>,
    /// Trigger price for stop/take-profit orders
    pub stop_price: Option<Decimal>,
    /// Only reduce an existing position
    pub reduce_only: bool,
}

/// A live position snapshot supplied by the position-tracking layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Position identifier
    pub id: PositionId,
    /// Instrument symbol
    pub symbol: String,
    /// Position side
    pub side: Side,
    /// Position size
    pub size: Decimal,
    /// Average entry price
    pub entry_price: Decimal,
    /// Current mark price
    pub mark_price: Decimal,
    /// Applied leverage
    pub leverage: u32,
    /// Liquidation price reported by the venue
    pub liquidation_price: Option<Decimal>,
    /// Open timestamp
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Create a new position snapshot with mark price equal to entry
    pub fn new(symbol: impl Into<String>, side: Side, size: Decimal, entry_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            size,
            entry_price,
            mark_price: entry_price,
            leverage: 1,
            liquidation_price: None,
            opened_at: Utc::now(),
        }
    }

    /// Set the mark price
    pub fn with_mark_price(mut self, mark_price: Decimal) -> Self {
        self.mark_price = mark_price;
        self
    }

    /// Set the leverage
    pub fn with_leverage(mut self, leverage: u32) -> Self {
        self.leverage = leverage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Long.opposite(), Side::Short);
        assert_eq!(Side::Short.opposite(), Side::Long);
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("long".parse::<Side>().unwrap(), Side::Long);
        assert_eq!("SHORT".parse::<Side>().unwrap(), Side::Short);
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Long);
        assert!("sideways".parse::<Side>().is_err());
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Long.to_string(), "LONG");
        assert_eq!(Side::Short.to_string(), "SHORT");
    }

    #[test]
    fn test_side_serde() {
        let json = serde_json::to_string(&Side::Short).unwrap();
        assert_eq!(json, "\"short\"");
    }

    #[test]
    fn test_position_new() {
        let position = Position::new("BTC-USDT", Side::Long, dec!(0.1), dec!(45000));
        assert_eq!(position.symbol, "BTC-USDT");
        assert_eq!(position.mark_price, dec!(45000));
        assert_eq!(position.leverage, 1);
        assert!(position.liquidation_price.is_none());
    }

    #[test]
    fn test_position_builders() {
        let position = Position::new("ETH-USDT", Side::Short, dec!(2), dec!(3000))
            .with_mark_price(dec!(2950))
            .with_leverage(5);
        assert_eq!(position.mark_price, dec!(2950));
        assert_eq!(position.leverage, 5);
    }

    #[test]
    fn test_order_type_serde() {
        let json = serde_json::to_string(&OrderType::TakeProfit).unwrap();
        assert_eq!(json, "\"take_profit\"");
    }
}
