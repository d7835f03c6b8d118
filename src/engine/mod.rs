pub mod backtest;

pub use backtest::{BacktestConfig, BacktestEngine, BacktestResult, ReplayMode};
