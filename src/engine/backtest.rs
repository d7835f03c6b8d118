use crate::data::PriceSeries;
use crate::metrics::{EquityPoint, PerformanceSummary, PerformanceTracker, SummaryMetrics};
use crate::portfolio::{Account, Trade};
use crate::strategy::{SignalFrame, Signal, StrategyEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

//how the runner obtains the signal for each bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayMode {
    //one causal pass over the whole series, then replay its signals
    #[default]
    Precomputed,
    //re-run the engine on bars [0..=i] for every bar i and take the last signal
    //every prefix pass feeds the engine's tracker and may trip its breaker
    Rolling,
}

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub summary: SummaryMetrics,
    //built from this run's round trips only
    pub performance: PerformanceSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub signals: SignalFrame,
    pub trades: Vec<Trade>,
}

//configuration for a backtest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    pub mode: ReplayMode,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: 10_000.0,
            mode: ReplayMode::Precomputed,
        }
    }
}

//main backtest engine
//replays signals against an all-in long-only ledger, valued at every close
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        BacktestEngine { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    //runs the backtest with the given strategy engine
    pub fn run(&self, series: &PriceSeries, engine: &mut StrategyEngine) -> BacktestResult {
        let signals = match self.config.mode {
            ReplayMode::Precomputed => engine.generate_signals(series),
            ReplayMode::Rolling => rolling_signals(series, engine),
        };

        let mut account = Account::new(self.config.initial_balance);
        let mut equity_curve = Vec::with_capacity(series.len());
        let mut last_value = self.config.initial_balance;

        //main backtest loop
        for (bar, record) in series.bars().iter().zip(&signals.records) {
            match record.signal {
                Signal::Buy => {
                    if account.buy_all(bar.date, bar.close) {
                        debug!(date = %bar.date, price = bar.close, units = account.holdings(), "bought");
                    }
                }
                exit if exit.is_exit() => {
                    if let Some(trade) = account.sell_all(bar.date, bar.close, exit) {
                        debug!(
                            date = %bar.date,
                            price = bar.close,
                            return_pct = trade.return_pct,
                            signal = %exit,
                            "sold"
                        );
                    }
                }
                _ => {}
            }

            //unpriceable bars carry the previous value forward
            if bar.close.is_finite() {
                last_value = account.value(bar.close);
            }
            equity_curve.push(EquityPoint::new(bar.date, last_value));
        }

        let trades = account.trade_log;
        let performance = summarize_trades(signals.strategy.as_str(), &trades);
        let summary = SummaryMetrics::from_backtest(
            series.symbol(),
            &equity_curve,
            &performance,
            self.config.initial_balance,
        );

        info!(
            strategy = %summary.strategy,
            symbol = %summary.symbol,
            trades = summary.num_trades,
            final_balance = summary.final_balance,
            "backtest finished"
        );

        BacktestResult {
            summary,
            performance,
            equity_curve,
            signals,
            trades,
        }
    }
}

//signal for bar i taken from a pass over the prefix ending at i
fn rolling_signals(series: &PriceSeries, engine: &mut StrategyEngine) -> SignalFrame {
    let mut records = Vec::with_capacity(series.len());
    let mut last_pass = None;

    for end in 1..=series.len() {
        let pass = engine.generate_signals(&series.prefix(end));
        if let Some(record) = pass.last() {
            records.push(record.clone());
        }
        last_pass = Some(pass);
    }

    match last_pass {
        Some(mut frame) => {
            frame.records = records;
            frame
        }
        None => SignalFrame::hold_only(engine.strategy_name(), series),
    }
}

//win/loss counts of a trade list, same rules as the strategy's own tracker
pub fn summarize_trades(strategy: &str, trades: &[Trade]) -> PerformanceSummary {
    let mut tracker = PerformanceTracker::new(strategy);
    for trade in trades {
        tracker.record_trade(trade.outcome(), trade.return_pct);
    }
    tracker.get_performance_summary()
}
