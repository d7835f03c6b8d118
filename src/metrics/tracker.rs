use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//result of a closed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeOutcome {
    Win,
    Loss,
    //closed exactly at the entry price
    Even,
}

impl TradeOutcome {
    //outcome of a long round trip
    pub fn from_prices(entry: f64, exit: f64) -> Self {
        if exit > entry {
            TradeOutcome::Win
        } else if exit < entry {
            TradeOutcome::Loss
        } else {
            TradeOutcome::Even
        }
    }
}

impl FromStr for TradeOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WIN" => Ok(TradeOutcome::Win),
            "LOSS" => Ok(TradeOutcome::Loss),
            "EVEN" => Ok(TradeOutcome::Even),
            other => Err(format!("unknown trade outcome: {}", other)),
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeOutcome::Win => "WIN",
            TradeOutcome::Loss => "LOSS",
            TradeOutcome::Even => "EVEN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub outcome: TradeOutcome,
    pub pnl_pct: f64,
}

//snapshot of a tracker's counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub strategy_name: String,
    //wins + losses, even trades are not part of the denominator
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub evens: usize,
    pub win_rate: f64,
    pub cumulative_return_pct: f64,
}

impl PerformanceSummary {
    pub fn empty(strategy_name: &str) -> Self {
        PerformanceSummary {
            strategy_name: strategy_name.to_string(),
            total_trades: 0,
            wins: 0,
            losses: 0,
            evens: 0,
            win_rate: 0.0,
            cumulative_return_pct: 0.0,
        }
    }
}

//append-only log of closed trades for one strategy instance
#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    strategy_name: String,
    wins: usize,
    losses: usize,
    evens: usize,
    cumulative_return_pct: f64,
    history: Vec<TradeRecord>,
}

impl PerformanceTracker {
    pub fn new(strategy_name: impl Into<String>) -> Self {
        PerformanceTracker {
            strategy_name: strategy_name.into(),
            ..PerformanceTracker::default()
        }
    }

    //records a closed trade, pnl_pct is not range checked
    pub fn record_trade(&mut self, outcome: TradeOutcome, pnl_pct: f64) {
        match outcome {
            TradeOutcome::Win => self.wins += 1,
            TradeOutcome::Loss => self.losses += 1,
            TradeOutcome::Even => self.evens += 1,
        }
        self.cumulative_return_pct += pnl_pct;
        self.history.push(TradeRecord { outcome, pnl_pct });
    }

    //pure read of the counters
    pub fn get_performance_summary(&self) -> PerformanceSummary {
        let total_trades = self.wins + self.losses;
        let win_rate = if total_trades > 0 {
            self.wins as f64 / total_trades as f64
        } else {
            0.0
        };

        PerformanceSummary {
            strategy_name: self.strategy_name.clone(),
            total_trades,
            wins: self.wins,
            losses: self.losses,
            evens: self.evens,
            win_rate,
            cumulative_return_pct: self.cumulative_return_pct,
        }
    }

    pub fn history(&self) -> &[TradeRecord] {
        &self.history
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    //clears every counter and the history
    pub fn reset(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.evens = 0;
        self.cumulative_return_pct = 0.0;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_reports_zeroes() {
        let tracker = PerformanceTracker::new("combo");
        assert_eq!(
            tracker.get_performance_summary(),
            PerformanceSummary::empty("combo")
        );
    }

    #[test]
    fn counts_wins_and_losses() {
        let mut tracker = PerformanceTracker::new("combo");
        tracker.record_trade(TradeOutcome::Win, 4.0);
        tracker.record_trade(TradeOutcome::Win, 4.2);
        tracker.record_trade(TradeOutcome::Loss, -2.0);

        let summary = tracker.get_performance_summary();
        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert!((summary.win_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((summary.cumulative_return_pct - 6.2).abs() < 1e-12);
    }

    #[test]
    fn even_trades_stay_out_of_the_denominator() {
        let mut tracker = PerformanceTracker::new("rsi");
        tracker.record_trade(TradeOutcome::Win, 1.0);
        tracker.record_trade(TradeOutcome::Even, 0.0);

        let summary = tracker.get_performance_summary();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.evens, 1);
        assert_eq!(summary.win_rate, 1.0);
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn summary_is_idempotent() {
        let mut tracker = PerformanceTracker::new("macd");
        tracker.record_trade(TradeOutcome::Loss, -1.5);
        assert_eq!(
            tracker.get_performance_summary(),
            tracker.get_performance_summary()
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = PerformanceTracker::new("macd");
        tracker.record_trade(TradeOutcome::Win, 3.0);
        tracker.reset();
        assert_eq!(
            tracker.get_performance_summary(),
            PerformanceSummary::empty("macd")
        );
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn outcome_from_prices_and_strings() {
        assert_eq!(TradeOutcome::from_prices(10.0, 11.0), TradeOutcome::Win);
        assert_eq!(TradeOutcome::from_prices(10.0, 9.0), TradeOutcome::Loss);
        assert_eq!(TradeOutcome::from_prices(10.0, 10.0), TradeOutcome::Even);
        assert_eq!("win".parse::<TradeOutcome>(), Ok(TradeOutcome::Win));
        assert!("draw".parse::<TradeOutcome>().is_err());
    }
}
