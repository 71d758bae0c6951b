//! Shared data types
//!
//! Position requests, plans, live position snapshots and strategy actions

mod order;
mod plan;

pub use order::{OrderRequest, OrderType, Position, PositionId, Side};
pub use plan::{
    ActionType, PositionParams, PositionPlan, StopLossLevel, StopLossType, StrategyAction,
    TakeProfitLevel, TakeProfitType,
};
