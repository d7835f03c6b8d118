use crate::portfolio::position::{OpenPosition, Trade};
use crate::strategy::Signal;
use chrono::NaiveDate;

//single-asset cash/holdings ledger with all-in sizing and no costs
#[derive(Debug, Clone)]
pub struct Account {
    //initial account balance
    pub initial_balance: f64,

    //cash not invested, zero while a position is open
    pub cash: f64,

    //open long position, none when flat
    pub position: Option<OpenPosition>,

    //closed round trips in exit order
    pub trade_log: Vec<Trade>,
}

impl Account {
    //creates a new account with initial balance
    pub fn new(initial_balance: f64) -> Self {
        Account {
            initial_balance,
            cash: initial_balance,
            position: None,
            trade_log: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    //converts all cash into units at `price`, returns false if nothing was bought
    pub fn buy_all(&mut self, date: NaiveDate, price: f64) -> bool {
        if self.position.is_some() || !(price.is_finite() && price > 0.0) || self.cash <= 0.0 {
            return false;
        }
        let units = self.cash / price;
        self.position = Some(OpenPosition::new(date, price, units));
        self.cash = 0.0;
        true
    }

    //converts all holdings back into cash at `price`
    pub fn sell_all(&mut self, date: NaiveDate, price: f64, signal: Signal) -> Option<&Trade> {
        if !(price.is_finite() && price > 0.0) {
            return None;
        }
        let position = self.position.take()?;
        self.cash += position.market_value(price);
        self.trade_log.push(position.close(date, price, signal));
        self.trade_log.last()
    }

    //cash + holdings at `price`
    pub fn value(&self, price: f64) -> f64 {
        match &self.position {
            Some(position) => self.cash + position.market_value(price),
            None => self.cash,
        }
    }

    //units currently held
    pub fn holdings(&self) -> f64 {
        self.position.map(|p| p.units).unwrap_or(0.0)
    }

    //returns the total return as a fraction at `price`
    pub fn total_return(&self, price: f64) -> f64 {
        (self.value(price) - self.initial_balance) / self.initial_balance
    }
}
