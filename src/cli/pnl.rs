//! PnL command implementation

use crate::config::Config;
use crate::types::Side;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct PnlArgs {
    /// Position side: long or short
    #[arg(long)]
    pub side: Side,

    /// Entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Exit price
    #[arg(long)]
    pub exit: Decimal,

    /// Position size
    #[arg(long)]
    pub size: Decimal,
}

impl PnlArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let calculator = config.calculator.calculator();
        let (nominal, percent) =
            calculator.calculate_expected_pnl(self.side, self.entry, self.exit, self.size);

        println!("Expected PnL: {:.2} ({:.2}%)", nominal, percent);
        Ok(())
    }
}
