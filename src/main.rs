use clap::Parser;
use position_strategy::calculator::Calculator;
use position_strategy::cli::{Cli, Commands};
use position_strategy::config::{Config, StrategyConfig};
use position_strategy::strategy::{create_strategy, StrategyKind};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using bundled config.toml.example");
            Config::example()?
        }
    };

    position_strategy::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Plan(args) => args.execute(&config)?,
        Commands::Pnl(args) => args.execute(&config)?,
        Commands::CheckEntry(args) => args.execute(&config)?,
        Commands::Strategies => {
            let calculator = config.calculator.calculator();
            for kind in StrategyKind::ALL {
                print_strategy(kind, &config.strategy, calculator);
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Calculator: default max leverage {}x",
                config.calculator.default_max_leverage
            );
            println!("  Strategy: {}", config.strategy.kind);
            println!("    RR ratio: {}", config.strategy.rr_ratio);
            println!(
                "    Conservative caps: {}% risk, {}x leverage",
                config.strategy.max_risk_percent, config.strategy.max_leverage
            );
            println!(
                "    Trailing: arms at +{}%, trails {}%",
                config.strategy.activation_percent, config.strategy.callback_rate
            );
            println!(
                "  Logging: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}

fn print_strategy(kind: StrategyKind, base: &StrategyConfig, calculator: Calculator) {
    let config = StrategyConfig {
        kind,
        ..base.clone()
    };
    match create_strategy(&config, calculator) {
        Ok(strategy) => println!("{:<14} {}", strategy.name(), strategy.description()),
        Err(e) => println!("{:<14} unavailable: {}", kind, e),
    }
}
