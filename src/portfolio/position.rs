use crate::metrics::TradeOutcome;
use crate::strategy::Signal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a long holding opened by converting all cash at one close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    //fractional units, 100% of cash at entry
    pub units: f64,
}

impl OpenPosition {
    pub fn new(entry_date: NaiveDate, entry_price: f64, units: f64) -> Self {
        OpenPosition {
            entry_date,
            entry_price,
            units,
        }
    }

    //market value at a given price
    pub fn market_value(&self, price: f64) -> f64 {
        self.units * price
    }

    //calculates unrealized pnl at a given price
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.units
    }

    //closes the position into a round trip
    pub fn close(self, exit_date: NaiveDate, exit_price: f64, exit_signal: Signal) -> Trade {
        Trade {
            entry_date: self.entry_date,
            entry_price: self.entry_price,
            exit_date,
            exit_price,
            exit_signal,
            units: self.units,
            pnl: self.unrealized_pnl(exit_price),
            return_pct: (exit_price - self.entry_price) / self.entry_price * 100.0,
        }
    }
}

//one closed round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub exit_signal: Signal,
    pub units: f64,
    pub pnl: f64,
    //percent, 2.5 == 2.5%
    pub return_pct: f64,
}

impl Trade {
    //stop-loss and take-profit exits count by their label, sells by price
    pub fn outcome(&self) -> TradeOutcome {
        match self.exit_signal {
            Signal::StopLoss => TradeOutcome::Loss,
            Signal::TakeProfit => TradeOutcome::Win,
            _ => TradeOutcome::from_prices(self.entry_price, self.exit_price),
        }
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
