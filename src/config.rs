//! Configuration types for position-strategy

use crate::calculator::{Calculator, DEFAULT_MAX_LEVERAGE};
use crate::strategy::{default_ladder, StrategyKind, TakeProfitTarget};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Calculator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    /// Leverage ceiling used when a request does not set one
    #[serde(default = "default_max_leverage")]
    pub default_max_leverage: u32,
}

fn default_max_leverage() -> u32 {
    DEFAULT_MAX_LEVERAGE
}

impl CalculatorConfig {
    /// Build the calculator described by this config
    pub fn calculator(&self) -> Calculator {
        Calculator::new(self.default_max_leverage)
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_max_leverage: DEFAULT_MAX_LEVERAGE,
        }
    }
}

/// Strategy selection and parameters
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Strategy variant: "risk-ratio", "conservative", "multi-tp" or "trailing-stop"
    #[serde(default)]
    pub kind: StrategyKind,

    /// Risk-reward ratio for the take-profit
    #[serde(default = "default_rr_ratio")]
    pub rr_ratio: Decimal,

    /// Risk ceiling for the conservative strategy (percent)
    #[serde(default = "default_max_risk_percent")]
    pub max_risk_percent: Decimal,

    /// Leverage ceiling for the conservative strategy
    #[serde(default = "default_conservative_leverage")]
    pub max_leverage: u32,

    /// Take-profit ladder for the multi-tp strategy
    #[serde(default = "default_ladder")]
    pub take_profits: Vec<TakeProfitTarget>,

    /// Profit percent that arms the trailing stop
    #[serde(default = "default_activation_percent")]
    pub activation_percent: Decimal,

    /// Trailing distance in percent
    #[serde(default = "default_callback_rate")]
    pub callback_rate: Decimal,
}

fn default_rr_ratio() -> Decimal {
    Decimal::new(2, 0) // 2:1
}
fn default_max_risk_percent() -> Decimal {
    Decimal::new(1, 0) // 1%
}
fn default_conservative_leverage() -> u32 {
    10
}
fn default_activation_percent() -> Decimal {
    Decimal::new(1, 0) // 1%
}
fn default_callback_rate() -> Decimal {
    Decimal::new(1, 0) // 1%
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::RiskRatio,
            rr_ratio: Decimal::new(2, 0),
            max_risk_percent: Decimal::new(1, 0),
            max_leverage: 10,
            take_profits: default_ladder(),
            activation_percent: Decimal::new(1, 0),
            callback_rate: Decimal::new(1, 0),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Example configuration bundled into the binary
const EXAMPLE_CONFIG: &str = include_str!("../config.toml.example");

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Configuration from the bundled `config.toml.example`
    pub fn example() -> anyhow::Result<Self> {
        let config: Config = toml::from_str(EXAMPLE_CONFIG)?;
        Ok(config)
    }
}
