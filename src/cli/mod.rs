//! CLI interface for position-strategy
//!
//! Provides subcommands for:
//! - `plan`: Calculate a position plan
//! - `pnl`: Expected PnL for an exit price
//! - `check-entry`: Validate a resting entry price
//! - `strategies`: List available strategies
//! - `config`: Show configuration

mod check;
mod plan;
mod pnl;

pub use check::CheckEntryArgs;
pub use plan::PlanArgs;
pub use pnl::PnlArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "position-strategy")]
#[command(about = "Risk-based position sizing with pluggable strategies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate a position plan
    Plan(PlanArgs),
    /// Expected PnL for closing at a price
    Pnl(PnlArgs),
    /// Check that a limit entry would not fill immediately
    CheckEntry(CheckEntryArgs),
    /// List available strategies
    Strategies,
    /// Show configuration
    Config,
}
