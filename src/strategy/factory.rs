use crate::config::{ConfigError, StrategyConfig, StrategyKind};
use crate::strategy::bollinger_reversion::BollingerReversionStrategy;
use crate::strategy::combo::ComboStrategy;
use crate::strategy::ema_crossover::EmaCrossoverStrategy;
use crate::strategy::ema_trend::EmaTrendStrategy;
use crate::strategy::ma_crossover::MaCrossoverStrategy;
use crate::strategy::macd_crossover::MacdCrossoverStrategy;
use crate::strategy::rsi_reversion::RsiReversionStrategy;
use crate::strategy::sma_crossover::SmaCrossoverStrategy;
use crate::strategy::Strategy;

//builds a boxed strategy of the requested kind from validated parameters
pub fn build_strategy(
    kind: StrategyKind,
    config: &StrategyConfig,
) -> Result<Box<dyn Strategy>, ConfigError> {
    config.validate()?;

    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::Combo => Box::new(ComboStrategy::new(config)),
        StrategyKind::Rsi => Box::new(RsiReversionStrategy::from_config(config)),
        StrategyKind::SmaCrossover => Box::new(SmaCrossoverStrategy::from_config(config)),
        StrategyKind::Macd => Box::new(MacdCrossoverStrategy::from_config(config)),
        StrategyKind::Bollinger => Box::new(BollingerReversionStrategy::from_config(config)),
        StrategyKind::Ema200Trend => Box::new(EmaTrendStrategy::new(config)),
        StrategyKind::MaCrossover => Box::new(MaCrossoverStrategy::new(config)),
        StrategyKind::EmaCrossover => Box::new(EmaCrossoverStrategy::new(config)),
    };
    Ok(strategy)
}
