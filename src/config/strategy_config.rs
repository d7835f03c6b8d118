use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

//closed set of strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Combo,
    Rsi,
    SmaCrossover,
    Macd,
    Bollinger,
    #[serde(rename = "ema200")]
    Ema200Trend,
    MaCrossover,
    EmaCrossover,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::Combo,
        StrategyKind::Rsi,
        StrategyKind::SmaCrossover,
        StrategyKind::Macd,
        StrategyKind::Bollinger,
        StrategyKind::Ema200Trend,
        StrategyKind::MaCrossover,
        StrategyKind::EmaCrossover,
    ];

    //parse strategy kind from its cli/config name
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "combo" => Ok(StrategyKind::Combo),
            "rsi" => Ok(StrategyKind::Rsi),
            "sma" | "sma_crossover" => Ok(StrategyKind::SmaCrossover),
            "macd" => Ok(StrategyKind::Macd),
            "bollinger" => Ok(StrategyKind::Bollinger),
            "ema200" | "ema200_trend" => Ok(StrategyKind::Ema200Trend),
            "ma_crossover" => Ok(StrategyKind::MaCrossover),
            "ema_crossover" => Ok(StrategyKind::EmaCrossover),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Combo => "combo",
            StrategyKind::Rsi => "rsi",
            StrategyKind::SmaCrossover => "sma_crossover",
            StrategyKind::Macd => "macd",
            StrategyKind::Bollinger => "bollinger",
            StrategyKind::Ema200Trend => "ema200",
            StrategyKind::MaCrossover => "ma_crossover",
            StrategyKind::EmaCrossover => "ema_crossover",
        }
    }

    //display name used in summaries and logs
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::Combo => "ComboStrategy",
            StrategyKind::Rsi => "RSIStrategy",
            StrategyKind::SmaCrossover => "SMACrossoverStrategy",
            StrategyKind::Macd => "MACDStrategy",
            StrategyKind::Bollinger => "BollingerStrategy",
            StrategyKind::Ema200Trend => "EMA200TrendStrategy",
            StrategyKind::MaCrossover => "MACrossoverStrategy",
            StrategyKind::EmaCrossover => "EMACrossoverStrategy",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::parse(s)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//self-tuning thresholds applied after every generation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationConfig {
    //no adaptation before this many decided trades
    pub min_trades: usize,
    //win rate below this disables the strategy
    pub min_win_rate: f64,
    //win rate above this loosens entry thresholds
    pub loosen_above: f64,
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        AdaptationConfig {
            min_trades: 10,
            min_win_rate: 0.3,
            loosen_above: 0.6,
        }
    }
}

//named numeric parameters shared by every strategy constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
    pub ema_period: usize,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub adaptation: AdaptationConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            sma_fast: 20,
            sma_slow: 50,
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_std: 2.0,
            ema_period: 200,
            stop_loss_pct: 0.02,
            take_profit_pct: 0.04,
            adaptation: AdaptationConfig::default(),
        }
    }
}

impl StrategyConfig {
    //checks every parameter, strategies are only built from a validated config
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("sma_fast", self.sma_fast)?;
        positive_window("sma_slow", self.sma_slow)?;
        positive_window("ema_fast", self.ema_fast)?;
        positive_window("ema_slow", self.ema_slow)?;
        positive_window("rsi_period", self.rsi_period)?;
        positive_window("macd_fast", self.macd_fast)?;
        positive_window("macd_slow", self.macd_slow)?;
        positive_window("macd_signal", self.macd_signal)?;
        positive_window("bollinger_window", self.bollinger_window)?;
        positive_window("ema_period", self.ema_period)?;
        positive_window("adaptation.min_trades", self.adaptation.min_trades)?;

        ordered_windows("sma_fast", self.sma_fast, self.sma_slow)?;
        ordered_windows("ema_fast", self.ema_fast, self.ema_slow)?;
        ordered_windows("macd_fast", self.macd_fast, self.macd_slow)?;

        in_range("rsi_oversold", self.rsi_oversold, 0.0, 100.0)?;
        in_range("rsi_overbought", self.rsi_overbought, 0.0, 100.0)?;
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ConfigError::InvalidParameter {
                name: "rsi_oversold",
                reason: format!(
                    "must be below rsi_overbought ({} >= {})",
                    self.rsi_oversold, self.rsi_overbought
                ),
            });
        }

        if !self.bollinger_std.is_finite() || self.bollinger_std < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "bollinger_std",
                reason: format!("must be a non-negative number, got {}", self.bollinger_std),
            });
        }

        in_range("stop_loss_pct", self.stop_loss_pct, 0.0, 1.0)?;
        in_range("take_profit_pct", self.take_profit_pct, 0.0, f64::MAX)?;
        in_range("adaptation.min_win_rate", self.adaptation.min_win_rate, 0.0, 1.0)?;
        in_range("adaptation.loosen_above", self.adaptation.loosen_above, 0.0, 1.0)?;

        Ok(())
    }

    //load parameters from a json file, missing keys fall back to defaults
    pub fn from_json_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StrategyConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

fn positive_window(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn ordered_windows(name: &'static str, fast: usize, slow: usize) -> Result<(), ConfigError> {
    if fast >= slow {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("fast window {} must be shorter than slow window {}", fast, slow),
        });
    }
    Ok(())
}

fn in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} outside [{}, {}]", value, min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(StrategyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn parses_known_names() {
        assert_eq!(StrategyKind::parse("COMBO"), Ok(StrategyKind::Combo));
        assert_eq!(StrategyKind::parse("sma"), Ok(StrategyKind::SmaCrossover));
        assert_eq!("ema200".parse::<StrategyKind>(), Ok(StrategyKind::Ema200Trend));
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            StrategyKind::parse("martingale"),
            Err(ConfigError::UnknownStrategy("martingale".to_string()))
        );
    }

    #[test]
    fn rejects_zero_window() {
        let config = StrategyConfig {
            rsi_period: 0,
            ..StrategyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "rsi_period", .. })
        ));
    }

    #[test]
    fn rejects_adaptation_without_sample() {
        let config = StrategyConfig {
            adaptation: AdaptationConfig {
                min_trades: 0,
                ..AdaptationConfig::default()
            },
            ..StrategyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "adaptation.min_trades", .. })
        ));
    }

    #[test]
    fn rejects_inverted_crossover_windows() {
        let config = StrategyConfig {
            sma_fast: 50,
            sma_slow: 20,
            ..StrategyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_percentages() {
        let config = StrategyConfig {
            stop_loss_pct: f64::NAN,
            ..StrategyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: StrategyConfig =
            serde_json::from_str(r#"{"rsi_oversold": 25.0, "adaptation": {"min_trades": 4}}"#)
                .unwrap();
        assert_eq!(config.rsi_oversold, 25.0);
        assert_eq!(config.sma_slow, 50);
        assert_eq!(config.adaptation.min_trades, 4);
        assert_eq!(config.adaptation.min_win_rate, 0.3);
    }

    #[test]
    fn kind_serializes_to_cli_name() {
        assert_eq!(
            serde_json::to_string(&StrategyKind::Ema200Trend).unwrap(),
            "\"ema200\""
        );
        assert_eq!(
            serde_json::to_string(&StrategyKind::SmaCrossover).unwrap(),
            "\"sma_crossover\""
        );
    }
}
