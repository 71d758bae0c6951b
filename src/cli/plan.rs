//! Plan command implementation

use crate::config::{Config, StrategyConfig};
use crate::strategy::{create_strategy, StrategyKind};
use crate::types::{PositionParams, PositionPlan, Side};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Instrument symbol
    #[arg(long)]
    pub symbol: String,

    /// Position side: long or short
    #[arg(long)]
    pub side: Side,

    /// Entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Stop-loss price
    #[arg(long)]
    pub stop_loss: Decimal,

    /// Account balance
    #[arg(long)]
    pub balance: Decimal,

    /// Percent of balance to risk
    #[arg(long)]
    pub risk: Decimal,

    /// Leverage ceiling (defaults to the configured one)
    #[arg(long)]
    pub max_leverage: Option<u32>,

    /// Strategy name (overrides the configured one)
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let strategy_config = StrategyConfig {
            kind: self.strategy.unwrap_or(config.strategy.kind),
            ..config.strategy.clone()
        };
        let strategy = create_strategy(&strategy_config, config.calculator.calculator())?;

        let plan = strategy.calculate_position(&self.params())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&plan);
        }
        Ok(())
    }

    fn params(&self) -> PositionParams {
        let params = PositionParams::new(
            self.symbol.clone(),
            self.side,
            self.entry,
            self.stop_loss,
            self.balance,
            self.risk,
        );
        match self.max_leverage {
            Some(max_leverage) => params.with_max_leverage(max_leverage),
            None => params,
        }
    }
}

fn print_plan(plan: &PositionPlan) {
    println!("Position plan ({})", plan.strategy_name);
    println!("  Symbol:     {} {}", plan.symbol, plan.side);
    println!("  Entry:      {}", plan.entry_price);
    println!("  Size:       {:.6}", plan.size);
    println!("  Notional:   {:.2}", plan.notional_value);
    println!("  Leverage:   {}x", plan.leverage);
    println!(
        "  Risk:       {:.2} ({}%)",
        plan.risk_amount, plan.risk_percent
    );
    println!("  Stop loss:  {} ({:?})", plan.stop_loss.price, plan.stop_loss.kind);
    for (i, tp) in plan.take_profits.iter().enumerate() {
        println!(
            "  TP{}:        {:.4} ({}% {:?})",
            i + 1,
            tp.price,
            tp.percentage,
            tp.kind
        );
    }
}
