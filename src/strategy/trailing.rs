//! Trailing stop strategy
//!
//! Sizes like the risk-ratio strategy, then trails the stop behind the best
//! price seen once the position is far enough in profit. The trail never
//! sits behind entry, so a move can only shrink the capital at risk. Tracking
//! state is kept per position id; each id is expected to have a single price
//! stream.

use super::{check_rr_ratio, size_position, Strategy, StrategyError};
use crate::calculator::Calculator;
use crate::telemetry;
use crate::types::{
    ActionType, OrderRequest, OrderType, Position, PositionId, PositionParams, PositionPlan, Side,
    StopLossLevel, StrategyAction, TakeProfitLevel,
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-position tracking record
#[derive(Debug, Clone, Copy, PartialEq)]
struct TrailingState {
    side: Side,
    entry_price: Decimal,
    /// Price that arms the trailing stop
    activation_price: Decimal,
    /// Most favorable price seen (high for longs, low for shorts)
    best_price: Decimal,
    /// Current trailing stop, once armed
    stop_price: Option<Decimal>,
}

impl TrailingState {
    fn is_armed(&self) -> bool {
        match self.side {
            Side::Long => self.best_price >= self.activation_price,
            Side::Short => self.best_price <= self.activation_price,
        }
    }

    /// Whether `stop` locks in at least break-even
    fn protects_entry(&self, stop: Decimal) -> bool {
        match self.side {
            Side::Long => stop >= self.entry_price,
            Side::Short => stop <= self.entry_price,
        }
    }

    /// Record a price, returns true if it is a new best
    fn observe(&mut self, price: Decimal) -> bool {
        let improved = match self.side {
            Side::Long => price > self.best_price,
            Side::Short => price < self.best_price,
        };
        if improved {
            self.best_price = price;
        }
        improved
    }
}

/// Trailing stop strategy
#[derive(Debug)]
pub struct TrailingStopStrategy {
    calculator: Calculator,
    /// Take-profit multiple of the stop distance
    rr_ratio: Decimal,
    /// Profit percent from entry that arms the trail
    activation_percent: Decimal,
    /// Trail distance from the best price, in percent
    callback_rate: Decimal,
    positions: Mutex<HashMap<PositionId, TrailingState>>,
}

impl TrailingStopStrategy {
    /// Create a new trailing stop strategy with the default 125x ceiling
    pub fn new(
        rr_ratio: Decimal,
        activation_percent: Decimal,
        callback_rate: Decimal,
    ) -> Result<Self, StrategyError> {
        Self::with_calculator(rr_ratio, activation_percent, callback_rate, Calculator::default())
    }

    /// Create a new trailing stop strategy with a specific calculator
    pub fn with_calculator(
        rr_ratio: Decimal,
        activation_percent: Decimal,
        callback_rate: Decimal,
        calculator: Calculator,
    ) -> Result<Self, StrategyError> {
        let strategy = Self {
            calculator,
            rr_ratio,
            activation_percent,
            callback_rate,
            positions: Mutex::new(HashMap::new()),
        };
        strategy.validate_config()?;
        Ok(strategy)
    }

    /// Number of positions currently tracked
    pub fn tracked_count(&self) -> usize {
        self.positions().len()
    }

    /// Current trailing stop for a position, if armed
    pub fn trailing_stop(&self, id: PositionId) -> Option<Decimal> {
        self.positions().get(&id).and_then(|state| state.stop_price)
    }

    fn positions(&self) -> MutexGuard<'_, HashMap<PositionId, TrailingState>> {
        // Tracking records stay consistent even if a holder panicked
        self.positions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate_config(&self) -> Result<(), StrategyError> {
        check_rr_ratio(self.rr_ratio)?;

        if self.activation_percent < Decimal::ZERO {
            return Err(StrategyError::InvalidParams(format!(
                "activation percent must not be negative: {}",
                self.activation_percent
            )));
        }
        if self.callback_rate <= Decimal::ZERO || self.callback_rate >= dec!(100) {
            return Err(StrategyError::InvalidParams(format!(
                "callback rate must be between 0 and 100: {}",
                self.callback_rate
            )));
        }
        Ok(())
    }

    /// Price at which the trail arms for an entry
    fn activation_price(&self, side: Side, entry: Decimal) -> Result<Decimal, StrategyError> {
        offset_price(side, entry, self.activation_percent)
            .ok_or_else(|| out_of_range("activation price", entry))
    }

    /// Stop trailing `callback_rate` percent behind `best_price`
    fn trail_from(&self, side: Side, best_price: Decimal) -> Result<Decimal, StrategyError> {
        offset_price(side.opposite(), best_price, self.callback_rate)
            .ok_or_else(|| out_of_range("trailing stop", best_price))
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
        let activation = self.activation_price(params.side, params.entry_price)?;

        Ok(PositionPlan {
            symbol: params.symbol.clone(),
            side: params.side,
            size: sizing.size,
            entry_price: params.entry_price,
            leverage: sizing.leverage,
            stop_loss: StopLossLevel::trailing(params.stop_loss, activation, self.callback_rate),
            take_profits: vec![TakeProfitLevel::limit(tp_price, dec!(100))],
            risk_amount: sizing.risk_amount,
            risk_percent: params.risk_percent,
            notional_value: sizing.notional_value,
            strategy_name: self.name().to_string(),
            timestamp: Utc::now(),
        })
    }
}

/// Move `price` by `percent` in the favorable direction for `side`
fn offset_price(side: Side, price: Decimal, percent: Decimal) -> Option<Decimal> {
    let offset = price.checked_mul(percent)?.checked_div(dec!(100))?;
    match side {
        Side::Long => price.checked_add(offset),
        Side::Short => price.checked_sub(offset),
    }
}

fn out_of_range(what: &str, price: Decimal) -> StrategyError {
    StrategyError::InvalidParams(format!("{what} from {price} overflows decimal range"))
}

impl Strategy for TrailingStopStrategy {
    fn name(&self) -> &'static str {
        "trailing-stop"
    }

    fn description(&self) -> String {
        format!(
            "Trailing stop strategy ({:.1}:1 RR, arms at +{:.1}%, trails {:.1}%)",
            self.rr_ratio, self.activation_percent, self.callback_rate
        )
    }

    fn validate_params(&self, _params: &PositionParams) -> Result<(), StrategyError> {
        self.validate_config()
    }

    fn calculate_position(&self, params: &PositionParams) -> Result<PositionPlan, StrategyError> {
        let result = self.build_plan(params);
        telemetry::record_plan_outcome(self.name(), &result);
        result
    }

    fn on_position_opened(&self, position: &Position) -> Result<(), StrategyError> {
        if position.entry_price <= Decimal::ZERO {
            return Err(StrategyError::InvalidParams(format!(
                "position entry price must be positive: {}",
                position.entry_price
            )));
        }

        let state = TrailingState {
            side: position.side,
            entry_price: position.entry_price,
            activation_price: self.activation_price(position.side, position.entry_price)?,
            best_price: position.entry_price,
            stop_price: None,
        };

        tracing::debug!(
            position_id = %position.id,
            symbol = %position.symbol,
            activation_price = %state.activation_price,
            "Tracking trailing stop"
        );
        self.positions().insert(position.id, state);
        Ok(())
    }

    fn on_price_update(
        &self,
        position: &Position,
        current_price: Decimal,
    ) -> Result<StrategyAction, StrategyError> {
        if current_price <= Decimal::ZERO {
            return Err(StrategyError::InvalidParams(format!(
                "price must be positive: {current_price}"
            )));
        }

        let mut positions = self.positions();
        let Some(state) = positions.get_mut(&position.id) else {
            return Ok(StrategyAction::none());
        };

        state.observe(current_price);
        if !state.is_armed() {
            return Ok(StrategyAction::none());
        }

        let candidate = self.trail_from(state.side, state.best_price)?;
        if !state.protects_entry(candidate) {
            return Ok(StrategyAction::none());
        }

        let improves = match (state.side, state.stop_price) {
            (_, None) => true,
            (Side::Long, Some(stop)) => candidate > stop,
            (Side::Short, Some(stop)) => candidate < stop,
        };
        if !improves {
            return Ok(StrategyAction::none());
        }
        state.stop_price = Some(candidate);
        drop(positions);

        tracing::info!(
            position_id = %position.id,
            symbol = %position.symbol,
            stop_price = %candidate,
            "Trailing stop moved"
        );

        let action = StrategyAction::new(
            ActionType::AdjustStopLoss,
            format!("trailing stop moved to {candidate}"),
        )
        .with_order(OrderRequest {
            symbol: position.symbol.clone(),
            side: position.side.opposite(),
            order_type: OrderType::Stop,
            size: position.size,
            price: None,
            stop_price: Some(candidate),
            reduce_only: true,
        });
        telemetry::record_action(self.name(), action.kind);
        Ok(action)
    }

    fn should_close(&self, position: &Position, current_price: Decimal) -> (bool, String) {
        let stop = self
            .positions()
            .get(&position.id)
            .and_then(|state| state.stop_price);

        let hit = match (position.side, stop) {
            (_, None) => false,
            (Side::Long, Some(stop)) => current_price <= stop,
            (Side::Short, Some(stop)) => current_price >= stop,
        };

        match stop {
            Some(stop) if hit => (true, format!("trailing stop hit at {stop}")),
            _ => (false, String::new()),
        }
    }

    fn on_position_closed(&self, position: &Position) {
        self.positions().remove(&position.id);
    }
}
