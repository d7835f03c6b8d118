use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//trading days per year used to annualise the sharpe ratio
pub const TRADING_DAYS: f64 = 252.0;

//a point in the equity curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl EquityPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        EquityPoint { date, value }
    }
}

//calculates simple period returns from equity values
pub fn calculate_returns(equity_values: &[f64]) -> Vec<f64> {
    if equity_values.len() < 2 {
        return vec![];
    }

    equity_values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

//mean / population stdev of returns, annualised by sqrt(252)
//zero for fewer than two returns, zero variance, or an undefined result
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.population_std_dev();

    //constant returns can leave rounding noise in the deviation
    if !std_dev.is_finite() || std_dev < 1e-12 {
        return 0.0;
    }

    let sharpe = (mean / std_dev) * TRADING_DAYS.sqrt();
    if sharpe.is_finite() {
        sharpe
    } else {
        0.0
    }
}

//drawdown of each value from its running peak, always <= 0
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&value| {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                (value - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

//most negative drawdown, zero for a non-decreasing curve
pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdowns(values).into_iter().fold(0.0, f64::min)
}
