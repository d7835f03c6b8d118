pub mod backtest_config;
pub mod strategy_config;

pub use backtest_config::{check_initial_cash, BacktestConfiguration};
pub use strategy_config::{AdaptationConfig, ConfigError, StrategyConfig, StrategyKind};
