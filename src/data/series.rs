use crate::data::bar::PriceBar;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SeriesError {
    #[error("Non-finite value in bar {index} ({date})")]
    NonFinite { index: usize, date: NaiveDate },
    #[error("Non-positive close {close} in bar {index} ({date})")]
    NonPositiveClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },
    #[error("Dates not strictly increasing at bar {index}: {previous} then {date}")]
    NotIncreasing {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

//ordered, immutable sequence of bars
//strategies derive parallel output from it and never write back
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    //validates finiteness, close > 0 and strictly increasing dates
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    date: bar.date,
                });
            }

            if bar.close <= 0.0 {
                return Err(SeriesError::NonPositiveClose {
                    index,
                    date: bar.date,
                    close: bar.close,
                });
            }

            if index > 0 && bars[index - 1].date >= bar.date {
                return Err(SeriesError::NotIncreasing {
                    index,
                    previous: bars[index - 1].date,
                    date: bar.date,
                });
            }
        }

        Ok(PriceSeries {
            symbol: symbol.into(),
            bars,
        })
    }

    //skips validation, strategies still treat anomalies as undefined values
    pub fn new_unchecked(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        PriceSeries {
            symbol: symbol.into(),
            bars,
        }
    }

    //builds a daily close-only series starting at `start`
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar::from_close(start + chrono::Duration::days(i as i64), close))
            .collect();
        PriceSeries::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    //close prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    //the first `len` bars, used to replay history without future data
    pub fn prefix(&self, len: usize) -> PriceSeries {
        let end = len.min(self.bars.len());
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..end].to_vec(),
        }
    }
}
