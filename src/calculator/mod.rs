//! Position sizing and risk calculations
//!
//! Pure arithmetic over explicit arguments. The only state is the default
//! leverage ceiling, so a `Calculator` can be shared freely across threads.
//!
//! Sign conventions follow the position side: for a long, profit is a price
//! increase and the stop sits below entry; for a short, the reverse.
//!
//! Arithmetic is checked. Operations that feed a plan report overflow as
//! `InvalidInput`; the percentage and PnL helpers saturate at the `Decimal`
//! bounds instead.

mod types;

pub use types::CalculatorError;

use crate::types::Side;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default leverage ceiling
pub const DEFAULT_MAX_LEVERAGE: u32 = 125;

/// Position sizing and risk calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculator {
    max_leverage: u32,
}

impl Calculator {
    /// Create a calculator with the given default leverage ceiling
    pub fn new(max_leverage: u32) -> Self {
        Self {
            max_leverage: max_leverage.max(1),
        }
    }

    /// Configured leverage ceiling
    pub fn max_leverage(&self) -> u32 {
        self.max_leverage
    }

    /// Resolve the leverage ceiling for a request
    ///
    /// `None` falls back to the configured ceiling. A requested ceiling can
    /// only narrow the configured one.
    pub fn resolve_max_leverage(&self, requested: Option<u32>) -> Result<u32, CalculatorError> {
        match requested {
            None => Ok(self.max_leverage),
            Some(0) => Err(CalculatorError::InvalidInput(
                "max leverage must be at least 1".to_string(),
            )),
            Some(requested) => Ok(requested.min(self.max_leverage)),
        }
    }

    /// Calculate position size from risk
    ///
    /// `size = (balance * risk% / 100) / price_risk`, where `price_risk` is
    /// `entry - stop_loss` for longs and `stop_loss - entry` for shorts.
    /// A zero or negative price risk is rejected rather than divided by.
    pub fn calculate_size(
        &self,
        balance: Decimal,
        risk_percent: Decimal,
        entry: Decimal,
        stop_loss: Decimal,
        side: Side,
    ) -> Result<Decimal, CalculatorError> {
        let price_risk = match side {
            Side::Long => entry.checked_sub(stop_loss),
            Side::Short => stop_loss.checked_sub(entry),
        }
        .ok_or_else(|| overflow("price risk"))?;

        if price_risk <= Decimal::ZERO {
            return Err(CalculatorError::InvalidStopLoss {
                side,
                entry,
                stop_loss,
            });
        }

        Self::risk_amount(balance, risk_percent)?
            .checked_div(price_risk)
            .ok_or_else(|| overflow("position size"))
    }

    /// Amount of balance put at risk
    pub fn risk_amount(
        balance: Decimal,
        risk_percent: Decimal,
    ) -> Result<Decimal, CalculatorError> {
        balance
            .checked_mul(risk_percent)
            .and_then(|scaled| scaled.checked_div(dec!(100)))
            .ok_or_else(|| overflow("risk amount"))
    }

    /// Calculate required leverage
    ///
    /// `ceil(size * price / balance)`, clamped to `[1, max_leverage]`.
    pub fn calculate_leverage(
        &self,
        size: Decimal,
        price: Decimal,
        balance: Decimal,
        max_leverage: u32,
    ) -> u32 {
        let ceiling = max_leverage.max(1);

        if balance <= Decimal::ZERO {
            return ceiling;
        }

        let required = size
            .checked_mul(price)
            .and_then(|notional| notional.checked_div(balance))
            .map(|ratio| ratio.ceil());

        match required {
            Some(required) if required < Decimal::ONE => 1,
            Some(required) => required.to_u32().unwrap_or(ceiling).clamp(1, ceiling),
            None => ceiling,
        }
    }

    /// Calculate take-profit price from a risk-reward ratio
    ///
    /// The stop distance is reflected through entry and scaled by `rr_ratio`.
    pub fn calculate_rr_take_profit(
        &self,
        entry: Decimal,
        stop_loss: Decimal,
        rr_ratio: Decimal,
        side: Side,
    ) -> Result<Decimal, CalculatorError> {
        let reward = entry
            .checked_sub(stop_loss)
            .and_then(|distance| distance.abs().checked_mul(rr_ratio))
            .ok_or_else(|| overflow("take-profit distance"))?;

        match side {
            Side::Long => entry.checked_add(reward),
            Side::Short => entry.checked_sub(reward),
        }
        .ok_or_else(|| overflow("take-profit price"))
    }

    /// Validate that a resting entry order would not fill immediately
    pub fn validate_price_logic(
        &self,
        side: Side,
        entry: Decimal,
        current: Decimal,
    ) -> Result<(), CalculatorError> {
        let would_cross = match side {
            Side::Long => entry >= current,
            Side::Short => entry <= current,
        };

        if would_cross {
            return Err(CalculatorError::InvalidOrderPlacement {
                side,
                entry,
                current,
            });
        }
        Ok(())
    }

    /// Validate stop-loss placement relative to entry
    pub fn validate_stop_loss(
        &self,
        side: Side,
        entry: Decimal,
        stop_loss: Decimal,
    ) -> Result<(), CalculatorError> {
        let misplaced = match side {
            Side::Long => stop_loss >= entry,
            Side::Short => stop_loss <= entry,
        };

        if misplaced {
            return Err(CalculatorError::InvalidStopLoss {
                side,
                entry,
                stop_loss,
            });
        }
        Ok(())
    }

    /// PnL percentage relative to entry
    ///
    /// Returns zero when `entry_price` is not positive.
    pub fn calculate_pnl_percent(
        &self,
        side: Side,
        entry_price: Decimal,
        mark_price: Decimal,
    ) -> Decimal {
        if entry_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let delta = match side {
            Side::Long => mark_price.saturating_sub(entry_price),
            Side::Short => entry_price.saturating_sub(mark_price),
        };
        saturating_percent(delta, entry_price)
    }

    /// Percentage distance from current price to a target, signed by side
    ///
    /// Returns zero when `current_price` is not positive.
    pub fn calculate_distance_to_price(
        &self,
        side: Side,
        current_price: Decimal,
        target_price: Decimal,
    ) -> Decimal {
        if current_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let delta = match side {
            Side::Long => target_price.saturating_sub(current_price),
            Side::Short => current_price.saturating_sub(target_price),
        };
        saturating_percent(delta, current_price)
    }

    /// Expected PnL for closing at `exit_price`, as `(nominal, percent)`
    pub fn calculate_expected_pnl(
        &self,
        side: Side,
        entry_price: Decimal,
        exit_price: Decimal,
        size: Decimal,
    ) -> (Decimal, Decimal) {
        let move_per_unit = match side {
            Side::Long => exit_price.saturating_sub(entry_price),
            Side::Short => entry_price.saturating_sub(exit_price),
        };
        let nominal = move_per_unit.saturating_mul(size);
        let percent = self.calculate_pnl_percent(side, entry_price, exit_price);
        (nominal, percent)
    }

    /// Validate all inputs of a position calculation
    ///
    /// Every strategy must pass this gate before sizing.
    pub fn validate_inputs(
        &self,
        side: Side,
        entry_price: Decimal,
        stop_loss: Decimal,
        risk_percent: Decimal,
        account_balance: Decimal,
    ) -> Result<(), CalculatorError> {
        if entry_price <= Decimal::ZERO {
            return Err(CalculatorError::InvalidInput(format!(
                "entry price must be positive: {entry_price}"
            )));
        }

        if stop_loss <= Decimal::ZERO {
            return Err(CalculatorError::InvalidInput(format!(
                "stop loss must be positive: {stop_loss}"
            )));
        }

        if risk_percent <= Decimal::ZERO || risk_percent > dec!(100) {
            return Err(CalculatorError::InvalidInput(format!(
                "risk percent must be between 0 and 100: {risk_percent}"
            )));
        }

        if account_balance <= Decimal::ZERO {
            return Err(CalculatorError::InvalidInput(format!(
                "account balance must be positive: {account_balance}"
            )));
        }

        self.validate_stop_loss(side, entry_price, stop_loss)
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEVERAGE)
    }
}

fn overflow(what: &str) -> CalculatorError {
    CalculatorError::InvalidInput(format!("{what} overflows decimal range"))
}

/// `delta / base * 100` for a positive `base`, pinned to the bounds on overflow
fn saturating_percent(delta: Decimal, base: Decimal) -> Decimal {
    match delta.checked_div(base) {
        Some(ratio) => ratio.saturating_mul(dec!(100)),
        None if delta.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}
