use crate::data::bar::PriceBar;
use crate::data::series::PriceSeries;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

//only date and close are required, yahoo-style capitalised headers are accepted
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(default, alias = "Open")]
    open: Option<f64>,
    #[serde(default, alias = "High")]
    high: Option<f64>,
    #[serde(default, alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

//loads a price series from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P, symbol: &str) -> Result<PriceSeries> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let headers = reader
        .headers()
        .context(format!("Failed to read CSV header: {:?}", path))?;
    if !headers.iter().any(|h| h.trim().eq_ignore_ascii_case("close")) {
        bail!("CSV file {:?} has no close column", path);
    }

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = parse_date(&record.date).context(format!(
            "Failed to parse date '{}' at line {}",
            record.date,
            index + 2
        ))?;

        let close = record.close;
        bars.push(PriceBar::new_unchecked(
            date,
            record.open.unwrap_or(close),
            record.high.unwrap_or(close),
            record.low.unwrap_or(close),
            close,
            record.volume.unwrap_or(0.0),
        ));
    }

    //chronological order, later rows win on duplicate dates
    bars.sort_by(|a, b| a.date.cmp(&b.date));
    let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }

    PriceSeries::new(symbol, deduped).context(format!("Invalid price data in {:?}", path))
}

//accepts plain dates, naive datetimes and rfc3339 timestamps
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts.date());
    }
    let ts = DateTime::parse_from_rfc3339(raw)?;
    Ok(ts.date_naive())
}
