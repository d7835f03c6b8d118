pub mod bollinger_reversion;
pub mod combo;
pub mod ema_crossover;
pub mod ema_trend;
pub mod engine;
pub mod factory;
pub mod frame;
pub mod ma_crossover;
pub mod macd_crossover;
pub mod rsi_reversion;
pub mod sma_crossover;

use crate::config::StrategyKind;
use crate::indicators::IndicatorFrame;
use crate::metrics::PerformanceSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use engine::{SignalSnapshot, StrategyEngine, StrategyError};
pub use factory::build_strategy;
pub use frame::{SignalFrame, SignalRecord};

//discrete per-bar trading instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Hold,
    Buy,
    Sell,
    StopLoss,
    TakeProfit,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Hold => "HOLD",
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::StopLoss => "STOP_LOSS",
            Signal::TakeProfit => "TAKE_PROFIT",
        }
    }

    //true for every signal that closes a long position
    pub fn is_exit(&self) -> bool {
        matches!(self, Signal::Sell | Signal::StopLoss | Signal::TakeProfit)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Flat,
    Long,
}

//strategy-local position, reset at the start of every pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub status: PositionStatus,
    pub entry_price: Option<f64>,
}

impl PositionState {
    pub fn flat() -> Self {
        PositionState {
            status: PositionStatus::Flat,
            entry_price: None,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.status == PositionStatus::Flat
    }

    pub fn is_long(&self) -> bool {
        self.status == PositionStatus::Long
    }

    pub fn open_long(&mut self, price: f64) {
        self.status = PositionStatus::Long;
        self.entry_price = Some(price);
    }

    //returns the entry price of the closed position
    pub fn close(&mut self) -> Option<f64> {
        self.status = PositionStatus::Flat;
        self.entry_price.take()
    }
}

impl Default for PositionState {
    fn default() -> Self {
        PositionState::flat()
    }
}

//one named rule and whether it held on a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub name: &'static str,
    pub satisfied: bool,
    //bullish conditions count towards confidence
    pub bullish: bool,
}

impl Condition {
    pub fn bullish(name: &'static str, satisfied: bool) -> Self {
        Condition {
            name,
            satisfied,
            bullish: true,
        }
    }

    pub fn bearish(name: &'static str, satisfied: bool) -> Self {
        Condition {
            name,
            satisfied,
            bullish: false,
        }
    }
}

//what a strategy wants to do on one bar
//the engine only honours entries when flat and exits when long
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub conditions: Vec<Condition>,
    pub signal: Signal,
}

impl Evaluation {
    pub fn new(conditions: Vec<Condition>, signal: Signal) -> Self {
        Evaluation { conditions, signal }
    }

    //count of satisfied bullish conditions
    pub fn confidence(&self) -> usize {
        self.conditions
            .iter()
            .filter(|c| c.bullish && c.satisfied)
            .count()
    }
}

//read-only view of one bar handed to a strategy
//only bars <= index are reachable through it
pub struct BarContext<'a> {
    pub index: usize,
    pub close: f64,
    pub position: &'a PositionState,
    frame: &'a IndicatorFrame,
}

impl<'a> BarContext<'a> {
    pub fn new(
        index: usize,
        close: f64,
        position: &'a PositionState,
        frame: &'a IndicatorFrame,
    ) -> Self {
        BarContext {
            index,
            close,
            position,
            frame,
        }
    }

    //indicator value on the current bar
    pub fn value(&self, name: &str) -> f64 {
        self.frame.value(name, self.index)
    }

    //indicator value on the previous bar, nan on the first bar
    pub fn previous(&self, name: &str) -> f64 {
        match self.index.checked_sub(1) {
            Some(prev) => self.frame.value(name, prev),
            None => f64::NAN,
        }
    }

    //a crosses above b on this bar
    //`inclusive` accepts a previous touch (a == b) as the starting point
    pub fn crossed_above(&self, a: &str, b: &str, inclusive: bool) -> bool {
        let (pa, pb) = (self.previous(a), self.previous(b));
        let was_below = if inclusive { pa <= pb } else { pa < pb };
        was_below && self.value(a) > self.value(b)
    }

    //a crosses below b on this bar
    pub fn crossed_below(&self, a: &str, b: &str) -> bool {
        self.previous(a) > self.previous(b) && self.value(a) < self.value(b)
    }
}

//fixed percentage exits around the entry price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLimits {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl RiskLimits {
    pub fn new(stop_loss_pct: f64, take_profit_pct: f64) -> Self {
        RiskLimits {
            stop_loss_pct,
            take_profit_pct,
        }
    }

    pub fn stop_loss(&self, entry: f64) -> f64 {
        entry * (1.0 - self.stop_loss_pct)
    }

    pub fn take_profit(&self, entry: f64) -> f64 {
        entry * (1.0 + self.take_profit_pct)
    }

    //stop-loss wins over take-profit when both would trigger
    pub fn check(&self, entry: f64, close: f64) -> Option<Signal> {
        if close <= self.stop_loss(entry) {
            Some(Signal::StopLoss)
        } else if close >= self.take_profit(entry) {
            Some(Signal::TakeProfit)
        } else {
            None
        }
    }

    //exit check for the current position, hold when flat
    pub fn exit_for(&self, ctx: &BarContext<'_>) -> Signal {
        match ctx.position.entry_price {
            Some(entry) if ctx.position.is_long() => {
                self.check(entry, ctx.close).unwrap_or(Signal::Hold)
            }
            _ => Signal::Hold,
        }
    }
}

//interface that all strategies must implement
//evaluate is a function of indicator values at bars <= index and the position
pub trait Strategy: Send {
    //returns the strategy name
    fn name(&self) -> &str;

    fn kind(&self) -> StrategyKind;

    //bars required before the first meaningful signal
    fn lookback(&self) -> usize;

    //computes every indicator the strategy reads, aligned with `closes`
    fn indicators(&self, closes: &[f64]) -> IndicatorFrame;

    //decides the signal for one bar
    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation;

    //relaxes entry thresholds after a strong record, returns true if anything changed
    fn loosen(&mut self, _summary: &PerformanceSummary) -> bool {
        false
    }
}
