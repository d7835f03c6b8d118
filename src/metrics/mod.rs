pub mod summary;
pub mod timeseries;
pub mod tracker;

pub use summary::SummaryMetrics;
pub use timeseries::{
    calculate_returns, drawdowns, max_drawdown, sharpe_ratio, EquityPoint, TRADING_DAYS,
};
pub use tracker::{PerformanceSummary, PerformanceTracker, TradeOutcome, TradeRecord};
