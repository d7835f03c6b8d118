use crate::metrics::timeseries::{calculate_returns, max_drawdown, sharpe_ratio, EquityPoint};
use crate::metrics::PerformanceSummary;
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//summary metrics for a backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub strategy: String,
    pub symbol: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_return: f64,
    //fraction, 0.05 == 5%
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    //fraction, always <= 0
    pub max_drawdown: f64,
    pub num_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub evens: usize,
    pub win_rate: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from the equity curve and the strategy's trade record
    pub fn from_backtest(
        symbol: &str,
        equity_curve: &[EquityPoint],
        performance: &PerformanceSummary,
        initial_balance: f64,
    ) -> Self {
        let final_balance = equity_curve
            .last()
            .map(|p| p.value)
            .unwrap_or(initial_balance);

        let total_return = final_balance - initial_balance;
        let total_return_pct = if initial_balance > 0.0 {
            total_return / initial_balance
        } else {
            0.0
        };

        let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.value).collect();
        let returns = calculate_returns(&equity_values);

        SummaryMetrics {
            strategy: performance.strategy_name.clone(),
            symbol: symbol.to_string(),
            start: equity_curve.first().map(|p| p.date),
            end: equity_curve.last().map(|p| p.date),
            initial_balance,
            final_balance,
            total_return,
            total_return_pct,
            sharpe_ratio: sharpe_ratio(&returns),
            max_drawdown: max_drawdown(&equity_values),
            num_trades: performance.total_trades,
            wins: performance.wins,
            losses: performance.losses,
            evens: performance.evens,
            win_rate: performance.win_rate,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Strategy"),
            Cell::new(&self.strategy),
        ]));

        table.add_row(Row::new(vec![Cell::new("Symbol"), Cell::new(&self.symbol)]));

        let period = match (self.start, self.end) {
            (Some(start), Some(end)) => format!("{} .. {}", start, end),
            _ => "-".to_string(),
        };
        table.add_row(Row::new(vec![Cell::new("Period"), Cell::new(&period)]));

        table.add_row(Row::new(vec![
            Cell::new("Initial Balance"),
            Cell::new(&format!("${:.2}", self.initial_balance)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Balance"),
            Cell::new(&format!("${:.2}", self.final_balance)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!(
                "${:.2} ({:.2}%)",
                self.total_return,
                self.total_return_pct * 100.0
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format!("{:.2}%", self.max_drawdown * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Trades"),
            Cell::new(&format!(
                "{} ({}W / {}L / {}E)",
                self.num_trades, self.wins, self.losses, self.evens
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.2}%", self.win_rate * 100.0)),
        ]));

        table
    }
}
