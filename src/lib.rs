//indicator-driven signal generation and long-only backtesting for daily price series

pub mod config;
pub mod data;
pub mod engine;
pub mod ensemble;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod report;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        AdaptationConfig, BacktestConfiguration, ConfigError, StrategyConfig, StrategyKind,
    };
    pub use crate::data::{load_csv, PriceBar, PriceSeries};
    pub use crate::engine::{BacktestConfig, BacktestEngine, BacktestResult, ReplayMode};
    pub use crate::ensemble::{EnsembleAggregator, EnsembleDecision, SignalSource};
    pub use crate::indicators::IndicatorFrame;
    pub use crate::metrics::{
        EquityPoint, PerformanceSummary, PerformanceTracker, SummaryMetrics, TradeOutcome,
    };
    pub use crate::portfolio::{Account, Trade};
    pub use crate::report::{
        write_equity_csv, write_signals_csv, write_summary_json, write_trades_csv,
    };
    pub use crate::strategy::{
        build_strategy, Signal, SignalFrame, SignalSnapshot, Strategy, StrategyEngine,
        StrategyError,
    };
}
