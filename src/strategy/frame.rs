use crate::data::PriceSeries;
use crate::indicators::IndicatorFrame;
use crate::strategy::{Condition, PositionStatus, Signal};
use chrono::NaiveDate;
use serde::Serialize;

//output of one generation pass for one bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub confidence: usize,
    //conditions in evaluation order
    pub reasons: Vec<Condition>,
    pub position_after: PositionStatus,
}

impl SignalRecord {
    pub fn hold(date: NaiveDate, close: f64) -> Self {
        SignalRecord {
            date,
            close,
            signal: Signal::Hold,
            confidence: 0,
            reasons: Vec::new(),
            position_after: PositionStatus::Flat,
        }
    }

    //"trend_up=true; rsi_signal=false; ..."
    pub fn reason_text(&self) -> String {
        self.reasons
            .iter()
            .map(|c| format!("{}={}", c.name, c.satisfied))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

//annotated series, one record per input bar, built append-only in bar order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalFrame {
    pub strategy: String,
    pub symbol: String,
    pub records: Vec<SignalRecord>,
    pub indicators: IndicatorFrame,
}

impl SignalFrame {
    pub fn new(strategy: &str, symbol: &str, indicators: IndicatorFrame) -> Self {
        SignalFrame {
            strategy: strategy.to_string(),
            symbol: symbol.to_string(),
            records: Vec::with_capacity(indicators.len()),
            indicators,
        }
    }

    //hold on every bar with no indicator columns
    pub fn hold_only(strategy: &str, series: &PriceSeries) -> Self {
        let mut frame = SignalFrame::new(strategy, series.symbol(), IndicatorFrame::new(series.len()));
        frame.records = series
            .bars()
            .iter()
            .map(|bar| SignalRecord::hold(bar.date, bar.close))
            .collect();
        frame
    }

    pub fn push(&mut self, record: SignalRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.records.iter().map(|r| r.signal).collect()
    }

    //signal on the latest bar, hold for an empty frame
    pub fn last_signal(&self) -> Signal {
        self.records.last().map(|r| r.signal).unwrap_or(Signal::Hold)
    }

    pub fn last(&self) -> Option<&SignalRecord> {
        self.records.last()
    }

    //number of closed round trips in the frame
    pub fn trade_count(&self) -> usize {
        self.records.iter().filter(|r| r.signal.is_exit()).count()
    }

    pub fn entry_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.signal == Signal::Buy)
            .count()
    }
}
