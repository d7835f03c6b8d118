use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use rayon::prelude::*;
use signalbench::config::check_initial_cash;
use signalbench::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "signalbench")]
#[command(about = "Indicator signal generation and long-only backtesting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //json backtest configuration, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv data file
        #[arg(long)]
        data: Option<PathBuf>,

        //symbol label for the data
        #[arg(long)]
        symbol: Option<String>,

        //strategy name (combo, rsi, sma_crossover, macd, bollinger, ema200, ma_crossover, ema_crossover)
        #[arg(long)]
        strategy: Option<String>,

        //json file with strategy parameters
        #[arg(long)]
        params: Option<PathBuf>,

        //starting cash
        #[arg(long)]
        initial_cash: Option<f64>,

        //re-slice the series at every bar instead of replaying one pass
        #[arg(long)]
        rolling: bool,

        //output options
        #[arg(long)]
        output_signals_csv: Option<PathBuf>,

        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        #[arg(long)]
        output_summary_json: Option<PathBuf>,
    },

    //backtest several strategies on the same data
    Compare {
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        symbol: Option<String>,

        //comma separated strategy names, all strategies when omitted
        #[arg(long, value_delimiter = ',')]
        strategies: Vec<String>,

        #[arg(long)]
        params: Option<PathBuf>,

        #[arg(long, default_value = "10000")]
        initial_cash: f64,
    },

    //latest signal of one strategy for every csv file given, symbol = file stem
    Scan {
        #[arg(long, required = true, num_args = 1..)]
        data: Vec<PathBuf>,

        #[arg(long, default_value = "combo")]
        strategy: String,

        #[arg(long)]
        params: Option<PathBuf>,
    },

    //majority vote of the default strategies on the latest bar
    Ensemble {
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        params: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            symbol,
            strategy,
            params,
            initial_cash,
            rolling,
            output_signals_csv,
            output_equity_csv,
            output_trades_csv,
            output_summary_json,
        } => {
            let mut configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?,
                None => BacktestConfiguration::default(),
            };

            if let Some(data) = data {
                configuration.data_path = data;
            }
            if let Some(symbol) = symbol {
                configuration.symbol = symbol;
            }
            if let Some(strategy) = strategy {
                configuration.strategy = StrategyKind::parse(&strategy)?;
            }
            if let Some(params) = params {
                configuration.strategy_params = StrategyConfig::from_json_file(&params)?;
            }
            if let Some(cash) = initial_cash {
                configuration.initial_cash = cash;
            }
            if rolling {
                configuration.replay_mode = ReplayMode::Rolling;
            }
            configuration.output_signals_csv = output_signals_csv.or(configuration.output_signals_csv);
            configuration.output_equity_csv = output_equity_csv.or(configuration.output_equity_csv);
            configuration.output_trades_csv = output_trades_csv.or(configuration.output_trades_csv);
            configuration.output_summary_json =
                output_summary_json.or(configuration.output_summary_json);

            configuration.validate()?;
            run_backtest(&configuration)?;
        }
        Commands::Compare {
            data,
            symbol,
            strategies,
            params,
            initial_cash,
        } => {
            let symbol = symbol.unwrap_or_else(|| symbol_from_path(&data));
            let kinds = if strategies.is_empty() {
                StrategyKind::ALL.to_vec()
            } else {
                strategies
                    .iter()
                    .map(|name| StrategyKind::parse(name))
                    .collect::<Result<Vec<_>, _>>()?
            };
            compare(&data, &symbol, &kinds, &load_params(params.as_deref())?, initial_cash)?;
        }
        Commands::Scan {
            data,
            strategy,
            params,
        } => {
            let kind = StrategyKind::parse(&strategy)?;
            scan(&data, kind, &load_params(params.as_deref())?)?;
        }
        Commands::Ensemble {
            data,
            symbol,
            params,
        } => {
            let symbol = symbol.unwrap_or_else(|| symbol_from_path(&data));
            ensemble(&data, &symbol, &load_params(params.as_deref())?)?;
        }
    }

    Ok(())
}

fn load_params(path: Option<&Path>) -> Result<StrategyConfig> {
    match path {
        Some(path) => StrategyConfig::from_json_file(path),
        None => Ok(StrategyConfig::default()),
    }
}

fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn run_backtest(configuration: &BacktestConfiguration) -> Result<()> {
    let series = load_csv(&configuration.data_path, &configuration.symbol)
        .with_context(|| format!("Failed to load data from {:?}", configuration.data_path))?;

    info!(
        symbol = %configuration.symbol,
        bars = series.len(),
        strategy = %configuration.strategy,
        mode = ?configuration.replay_mode,
        "running backtest"
    );

    let mut engine =
        StrategyEngine::from_config(configuration.strategy, &configuration.strategy_params)?;
    let backtester = BacktestEngine::new(BacktestConfig {
        initial_balance: configuration.initial_cash,
        mode: configuration.replay_mode,
    });
    let result = backtester.run(&series, &mut engine);

    result.summary.pretty_print_table();
    if !engine.is_enabled() {
        println!("{} paused itself after a weak trade record", engine.strategy_name());
    }

    //save outputs if requested
    if let Some(path) = &configuration.output_signals_csv {
        write_signals_csv(&result.signals, path)?;
        println!("Signals saved to {:?}", path);
    }
    if let Some(path) = &configuration.output_equity_csv {
        write_equity_csv(&result.equity_curve, path)?;
        println!("Equity curve saved to {:?}", path);
    }
    if let Some(path) = &configuration.output_trades_csv {
        write_trades_csv(&result.trades, path)?;
        println!("Trades saved to {:?}", path);
    }
    if let Some(path) = &configuration.output_summary_json {
        write_summary_json(&result, path)?;
        println!("Summary saved to {:?}", path);
    }

    Ok(())
}

fn compare(
    data: &Path,
    symbol: &str,
    kinds: &[StrategyKind],
    params: &StrategyConfig,
    initial_cash: f64,
) -> Result<()> {
    check_initial_cash(initial_cash)?;
    let series = load_csv(data, symbol)?;
    let backtester = BacktestEngine::new(BacktestConfig {
        initial_balance: initial_cash,
        mode: ReplayMode::Precomputed,
    });

    //one engine per worker
    let summaries = kinds
        .par_iter()
        .map(|kind| -> Result<SummaryMetrics, ConfigError> {
            let mut engine = StrategyEngine::from_config(*kind, params)?;
            Ok(backtester.run(&series, &mut engine).summary)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Strategy"),
        Cell::new("Return"),
        Cell::new("Sharpe"),
        Cell::new("Max DD"),
        Cell::new("Trades"),
        Cell::new("Win Rate"),
    ]));
    for summary in &summaries {
        table.add_row(Row::new(vec![
            Cell::new(&summary.strategy),
            Cell::new(&format!("{:.2}%", summary.total_return_pct * 100.0)),
            Cell::new(&format!("{:.3}", summary.sharpe_ratio)),
            Cell::new(&format!("{:.2}%", summary.max_drawdown * 100.0)),
            Cell::new(&summary.num_trades.to_string()),
            Cell::new(&format!("{:.2}%", summary.win_rate * 100.0)),
        ]));
    }
    table.printstd();
    Ok(())
}

fn scan(paths: &[PathBuf], kind: StrategyKind, params: &StrategyConfig) -> Result<()> {
    params.validate()?;

    let snapshots = paths
        .par_iter()
        .map(|path| -> Result<SignalSnapshot> {
            let series = load_csv(path, &symbol_from_path(path))?;
            let mut engine = StrategyEngine::from_config(kind, params)?;
            Ok(engine.generate(&series))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Symbol"),
        Cell::new("Date"),
        Cell::new("Signal"),
        Cell::new("Confidence"),
        Cell::new("Conditions"),
    ]));
    for snapshot in &snapshots {
        let date = snapshot
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let conditions = snapshot
            .conditions
            .iter()
            .filter(|c| c.satisfied)
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::new(vec![
            Cell::new(&snapshot.symbol),
            Cell::new(&date),
            Cell::new(snapshot.signal.as_str()),
            Cell::new(&snapshot.confidence.to_string()),
            Cell::new(&conditions),
        ]));
    }
    table.printstd();
    Ok(())
}

fn ensemble(data: &Path, symbol: &str, params: &StrategyConfig) -> Result<()> {
    let series = load_csv(data, symbol)?;
    let mut aggregator = EnsembleAggregator::default_voters(params)?;
    let decision = aggregator.vote(&series);

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Voter"),
        Cell::new("Signal"),
        Cell::new("Counted"),
    ]));
    for vote in &decision.votes {
        let raw = match (&vote.raw, &vote.error) {
            (Some(signal), _) => signal.to_string(),
            (None, Some(error)) => format!("error: {}", error),
            (None, None) => "-".to_string(),
        };
        table.add_row(Row::new(vec![
            Cell::new(&vote.voter),
            Cell::new(&raw),
            Cell::new(vote.counted.as_str()),
        ]));
    }
    table.printstd();

    let tally = decision
        .tally
        .iter()
        .map(|(signal, count)| format!("{}={}", signal, count))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{} ensemble: {} ({})", symbol, decision.signal, tally);
    Ok(())
}
