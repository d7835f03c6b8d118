use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BarError {
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Invalid OHLC values: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose { close: f64, high: f64, low: f64 },
    #[error("Invalid OHLC values: open ({open}) outside high-low range [{low}, {high}]")]
    InvalidOpen { open: f64, high: f64, low: f64 },
    #[error("Non-positive close: {0}")]
    NonPositiveClose(f64),
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
}

//a single daily ohlcv observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    //creates a new bar with ohlc validation
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        if high < low {
            return Err(BarError::InvalidHighLow { high, low });
        }

        if close < low || close > high {
            return Err(BarError::InvalidClose { close, high, low });
        }

        if open < low || open > high {
            return Err(BarError::InvalidOpen { open, high, low });
        }

        if close <= 0.0 {
            return Err(BarError::NonPositiveClose(close));
        }

        if volume < 0.0 {
            return Err(BarError::NegativeVolume(volume));
        }

        Ok(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    //creates a bar without ohlc validation
    pub fn new_unchecked(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //close-only bar, open/high/low collapse onto the close
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        PriceBar::new_unchecked(date, close, close, close, close, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}
