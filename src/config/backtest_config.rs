use crate::config::strategy_config::{StrategyConfig, StrategyKind};
use crate::engine::ReplayMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,
    pub symbol: String,

    //strategy
    pub strategy: StrategyKind,
    pub strategy_params: StrategyConfig,

    //account settings
    pub initial_cash: f64,
    pub replay_mode: ReplayMode,

    //optional output paths
    pub output_signals_csv: Option<PathBuf>,
    pub output_equity_csv: Option<PathBuf>,
    pub output_trades_csv: Option<PathBuf>,
    pub output_summary_json: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            symbol: "SPY".to_string(),
            strategy: StrategyKind::Combo,
            strategy_params: StrategyConfig::default(),
            initial_cash: 10_000.0,
            replay_mode: ReplayMode::Precomputed,
            output_signals_csv: None,
            output_equity_csv: None,
            output_trades_csv: None,
            output_summary_json: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a json file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    //checks strategy parameters and the starting cash
    pub fn validate(&self) -> anyhow::Result<()> {
        self.strategy_params.validate()?;
        check_initial_cash(self.initial_cash)
    }

    //save configuration to a json file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

//starting cash must be a positive finite amount
pub fn check_initial_cash(cash: f64) -> anyhow::Result<()> {
    if !cash.is_finite() || cash <= 0.0 {
        anyhow::bail!("initial_cash must be positive, got {}", cash);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backtest.json");

        let config = BacktestConfiguration {
            symbol: "AAPL".to_string(),
            strategy: StrategyKind::Rsi,
            replay_mode: ReplayMode::Rolling,
            ..BacktestConfiguration::default()
        };
        config.to_json_file(&path).unwrap();

        let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn unknown_strategy_name_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"strategy": "martingale"}"#).unwrap();
        assert!(BacktestConfiguration::from_json_file(&path).is_err());
    }

    #[test]
    fn invalid_params_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"strategy_params": {"sma_fast": 0}}"#).unwrap();
        assert!(BacktestConfiguration::from_json_file(&path).is_err());
    }

    #[test]
    fn overridden_cash_must_stay_positive() {
        let mut config = BacktestConfiguration::default();
        assert!(config.validate().is_ok());

        for cash in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            config.initial_cash = cash;
            assert!(config.validate().is_err());
        }
    }
}
