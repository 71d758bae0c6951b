//! Entry price check command implementation

use crate::config::Config;
use crate::types::Side;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct CheckEntryArgs {
    /// Position side: long or short
    #[arg(long)]
    pub side: Side,

    /// Limit entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Current market price
    #[arg(long)]
    pub current: Decimal,
}

impl CheckEntryArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let calculator = config.calculator.calculator();
        calculator.validate_price_logic(self.side, self.entry, self.current)?;

        let distance = calculator.calculate_distance_to_price(self.side, self.current, self.entry);
        println!(
            "OK: {} limit at {} rests {:.2}% from {}",
            self.side, self.entry, distance.abs(), self.current
        );
        Ok(())
    }
}
