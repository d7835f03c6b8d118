use crate::config::{AdaptationConfig, ConfigError, StrategyConfig, StrategyKind};
use crate::data::PriceSeries;
use crate::metrics::{PerformanceSummary, PerformanceTracker, TradeOutcome};
use crate::strategy::factory::build_strategy;
use crate::strategy::frame::{SignalFrame, SignalRecord};
use crate::strategy::{BarContext, Condition, PositionState, Signal, Strategy};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Empty price series for {0}")]
    EmptySeries(String),
    #[error("{strategy} failed: {reason}")]
    Failed { strategy: String, reason: String },
}

//latest-bar view for scanners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSnapshot {
    pub strategy: String,
    pub symbol: String,
    pub date: Option<NaiveDate>,
    pub signal: Signal,
    pub confidence: usize,
    pub conditions: Vec<Condition>,
}

//drives one strategy over price series and owns its tracker
//stateful across passes: trades accumulate, the breaker may trip and
//thresholds may loosen, so repeated calls on the same data are not idempotent
pub struct StrategyEngine {
    strategy: Box<dyn Strategy>,
    tracker: PerformanceTracker,
    adaptation: AdaptationConfig,
    enabled: bool,
}

impl StrategyEngine {
    pub fn new(strategy: Box<dyn Strategy>, adaptation: AdaptationConfig) -> Self {
        let tracker = PerformanceTracker::new(strategy.name());
        StrategyEngine {
            strategy,
            tracker,
            adaptation,
            enabled: true,
        }
    }

    //builds the configured strategy, invalid parameters fail here
    pub fn from_config(kind: StrategyKind, config: &StrategyConfig) -> Result<Self, ConfigError> {
        let strategy = build_strategy(kind, config)?;
        Ok(StrategyEngine::new(strategy, config.adaptation))
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn lookback(&self) -> usize {
        self.strategy.lookback()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.tracker.get_performance_summary()
    }

    //clears the trade history and re-enables the strategy
    //loosened thresholds are kept
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.enabled = true;
    }

    //one causal forward pass over the series, one record per bar
    pub fn generate_signals(&mut self, series: &PriceSeries) -> SignalFrame {
        let name = self.strategy.name().to_string();

        if series.is_empty() {
            warn!(strategy = %name, "empty data passed to strategy");
            return SignalFrame::hold_only(&name, series);
        }

        if !self.enabled {
            info!(strategy = %name, "strategy is paused, holding on every bar");
            return SignalFrame::hold_only(&name, series);
        }

        let lookback = self.strategy.lookback();
        if series.len() < lookback {
            warn!(
                strategy = %name,
                symbol = series.symbol(),
                bars = series.len(),
                lookback,
                "not enough data for indicators, holding on every bar"
            );
            return SignalFrame::hold_only(&name, series);
        }

        let closes = series.closes();
        let indicators = self.strategy.indicators(&closes);
        let mut frame = SignalFrame::new(&name, series.symbol(), indicators);
        let mut position = PositionState::flat();

        for (index, bar) in series.bars().iter().enumerate() {
            let evaluation = {
                let ctx = BarContext::new(index, bar.close, &position, &frame.indicators);
                self.strategy.evaluate(&ctx)
            };
            let confidence = evaluation.confidence();

            //anomalous bars never trade
            let wanted = if bar.close.is_finite() && bar.close > 0.0 {
                evaluation.signal
            } else {
                Signal::Hold
            };

            let signal = match wanted {
                Signal::Buy if position.is_flat() => {
                    position.open_long(bar.close);
                    debug!(strategy = %name, date = %bar.date, price = bar.close, "BUY");
                    Signal::Buy
                }
                exit if exit.is_exit() && position.is_long() => {
                    let entry = position.close().unwrap_or(bar.close);
                    self.close_trade(exit, entry, bar.close, bar.date);
                    exit
                }
                _ => Signal::Hold,
            };

            frame.push(SignalRecord {
                date: bar.date,
                close: bar.close,
                signal,
                confidence,
                reasons: evaluation.conditions,
                position_after: position.status,
            });
        }

        self.adapt_parameters();
        frame
    }

    //signal on the last bar of a fresh pass
    pub fn generate_signal(&mut self, series: &PriceSeries) -> Signal {
        self.generate_signals(series).last_signal()
    }

    //latest signal plus the conditions behind it
    pub fn generate(&mut self, series: &PriceSeries) -> SignalSnapshot {
        let frame = self.generate_signals(series);
        let (date, signal, confidence, conditions) = match frame.last() {
            Some(r) => (Some(r.date), r.signal, r.confidence, r.reasons.clone()),
            None => (None, Signal::Hold, 0, Vec::new()),
        };

        SignalSnapshot {
            strategy: frame.strategy,
            symbol: frame.symbol,
            date,
            signal,
            confidence,
            conditions,
        }
    }

    //fallible variant for callers that treat an empty series as a failure
    pub fn try_generate_signal(&mut self, series: &PriceSeries) -> Result<Signal, StrategyError> {
        if series.is_empty() {
            return Err(StrategyError::EmptySeries(series.symbol().to_string()));
        }
        Ok(self.generate_signal(series))
    }

    //circuit breaker and loosening, driven only by the recorded trade history
    pub fn adapt_parameters(&mut self) {
        let summary = self.tracker.get_performance_summary();
        //no decided trades means no sample to judge
        if summary.total_trades == 0 || summary.total_trades < self.adaptation.min_trades {
            return;
        }

        if summary.win_rate < self.adaptation.min_win_rate {
            if self.enabled {
                warn!(
                    strategy = %summary.strategy_name,
                    win_rate = summary.win_rate,
                    trades = summary.total_trades,
                    "pausing strategy due to low win rate"
                );
            }
            self.enabled = false;
        } else if summary.win_rate > self.adaptation.loosen_above && self.strategy.loosen(&summary) {
            info!(
                strategy = %summary.strategy_name,
                win_rate = summary.win_rate,
                "strategy improving, loosened entry thresholds"
            );
        }
    }

    fn close_trade(&mut self, exit: Signal, entry: f64, price: f64, date: NaiveDate) {
        let outcome = match exit {
            Signal::StopLoss => TradeOutcome::Loss,
            Signal::TakeProfit => TradeOutcome::Win,
            _ => TradeOutcome::from_prices(entry, price),
        };
        let pnl_pct = (price - entry) / entry * 100.0;

        debug!(
            strategy = %self.strategy.name(),
            %date,
            entry,
            price,
            pnl_pct,
            signal = %exit,
            "position closed"
        );
        self.tracker.record_trade(outcome, pnl_pct);
    }
}

impl std::fmt::Debug for StrategyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyEngine")
            .field("strategy", &self.strategy.name())
            .field("enabled", &self.enabled)
            .field("adaptation", &self.adaptation)
            .field("tracker", &self.tracker)
            .finish()
    }
}
