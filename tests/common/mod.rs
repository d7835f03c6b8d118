#![allow(dead_code)]

use chrono::NaiveDate;
use signalbench::data::PriceSeries;

pub fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes("TEST", start(), closes).unwrap()
}

//compounds per-bar returns from 100
pub fn random_walk(returns: &[f64]) -> Vec<f64> {
    let mut price = 100.0;
    returns
        .iter()
        .map(|r| {
            price *= 1.0 + r;
            price
        })
        .collect()
}

//deterministic oscillating series with drift, long enough for every strategy
pub fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 8.0 * (t / 6.0).sin() + 3.0 * (t / 2.3).cos()
        })
        .collect()
}
