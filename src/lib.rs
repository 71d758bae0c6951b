//! position-strategy: risk-based position sizing with pluggable strategies
//!
//! This library provides:
//! - A pure calculator for size, leverage, take-profit, PnL and validation
//! - A `Strategy` trait with fixed risk-reward, conservative, multi-level
//!   take-profit and trailing-stop variants
//! - Position request, plan and action types
//! - TOML configuration, structured logging and metrics

pub mod calculator;
pub mod cli;
pub mod config;
pub mod strategy;
pub mod telemetry;
pub mod types;

pub use calculator::{Calculator, CalculatorError};
pub use strategy::{create_strategy, Strategy, StrategyError, StrategyKind};
pub use types::{
    Position, PositionParams, PositionPlan, Side, StopLossLevel, StrategyAction, TakeProfitLevel,
};
