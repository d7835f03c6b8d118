use crate::engine::BacktestResult;
use crate::metrics::{calculate_returns, drawdowns, EquityPoint, PerformanceSummary, SummaryMetrics};
use crate::portfolio::Trade;
use crate::strategy::SignalFrame;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

//one row per bar: fixed columns first, then every indicator column in frame order
pub fn write_signals_csv(frame: &SignalFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    let names: Vec<&str> = frame.indicators.names().collect();
    let mut header = vec!["date", "close", "signal", "confidence", "position", "reasons"];
    header.extend(names.iter().copied());
    writer.write_record(&header)?;

    for (index, record) in frame.records.iter().enumerate() {
        let mut row = vec![
            record.date.to_string(),
            record.close.to_string(),
            record.signal.to_string(),
            record.confidence.to_string(),
            format!("{:?}", record.position_after).to_uppercase(),
            record.reason_text(),
        ];
        for name in &names {
            row.push(format_value(frame.indicators.value(name, index)));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

//date, equity, drawdown from peak and return on the previous bar
pub fn write_equity_csv(equity_curve: &[EquityPoint], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(["date", "equity", "drawdown", "returns"])?;

    let values: Vec<f64> = equity_curve.iter().map(|p| p.value).collect();
    let dd = drawdowns(&values);
    let returns = calculate_returns(&values);

    for (i, point) in equity_curve.iter().enumerate() {
        let period_return = if i == 0 { 0.0 } else { returns[i - 1] };
        writer.write_record([
            point.date.to_string(),
            point.value.to_string(),
            dd[i].to_string(),
            period_return.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_trades_csv(trades: &[Trade], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    for trade in trades {
        writer.serialize(trade)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    summary: &'a SummaryMetrics,
    performance: &'a PerformanceSummary,
}

//pretty json with the backtest metrics and the win/loss record
pub fn write_summary_json(result: &BacktestResult, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let report = SummaryReport {
        summary: &result.summary,
        performance: &result.performance,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &report)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

//undefined indicator values are written as empty cells
fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use crate::data::PriceSeries;
    use crate::engine::{BacktestConfig, BacktestEngine};
    use crate::strategy::{Signal, StrategyEngine};
    use crate::config::StrategyKind;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn result() -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = PriceSeries::from_closes("TEST", start, &closes).unwrap();
        let mut engine =
            StrategyEngine::from_config(StrategyKind::Bollinger, &StrategyConfig::default()).unwrap();
        BacktestEngine::new(BacktestConfig::default()).run(&series, &mut engine)
    }

    #[test]
    fn signals_csv_has_indicator_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signals.csv");
        let result = result();
        write_signals_csv(&result.signals, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[2], "signal");
        assert!(headers.iter().any(|h| h == "bb_lower"));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 30);
        //warm-up bars leave the band cells empty
        let lower = headers.iter().position(|h| h == "bb_lower").unwrap();
        assert_eq!(&rows[0][lower], "");
        assert!(!rows[29][lower].is_empty());
    }

    #[test]
    fn equity_csv_round_trips_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        let result = result();
        write_equity_csv(&result.equity_curve, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), result.equity_curve.len());
        assert_eq!(&rows[0][0], "2024-01-01");
        let first: f64 = rows[0][1].parse().unwrap();
        assert_eq!(first, 10_000.0);
    }

    #[test]
    fn trades_csv_has_one_row_per_trade() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let entry = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let trades = vec![Trade {
            entry_date: entry,
            entry_price: 10.0,
            exit_date: entry.succ_opt().unwrap(),
            exit_price: 11.0,
            exit_signal: Signal::TakeProfit,
            units: 3.0,
            pnl: 3.0,
            return_pct: 10.0,
        }];
        write_trades_csv(&trades, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<Trade> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, trades);
    }

    #[test]
    fn summary_json_contains_both_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let result = result();
        write_summary_json(&result, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["symbol"], "TEST");
        assert_eq!(value["performance"]["strategy_name"], "BollingerStrategy");
    }

    #[test]
    fn signals_csv_exports_macd_histogram() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("macd.csv");
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let series = PriceSeries::from_closes("TEST", start, &closes).unwrap();
        let mut engine =
            StrategyEngine::from_config(StrategyKind::Macd, &StrategyConfig::default()).unwrap();
        let frame = engine.generate_signals(&series);
        write_signals_csv(&frame, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        let (macd, signal, hist) = (column("macd"), column("macd_signal"), column("macd_hist"));

        for row in reader.records().map(|r| r.unwrap()) {
            let line: f64 = row[macd].parse().unwrap();
            let trigger: f64 = row[signal].parse().unwrap();
            let histogram: f64 = row[hist].parse().unwrap();
            assert!((histogram - (line - trigger)).abs() < 1e-9);
        }
    }
}
