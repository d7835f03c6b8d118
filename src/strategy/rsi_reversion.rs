use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{gt, lt, rsi, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, Signal, Strategy};

const RSI: &str = "rsi";

//rsi mean reversion strategy
//buys when rsi drops below oversold threshold
//sells when rsi rises above overbought threshold
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    lookback: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversionStrategy {
    pub fn new(lookback: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversionStrategy {
            lookback,
            oversold,
            overbought,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.rsi_period, config.rsi_oversold, config.rsi_overbought)
    }
}

impl Default for RsiReversionStrategy {
    //default rsi strategy with standard parameters
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl Strategy for RsiReversionStrategy {
    fn name(&self) -> &str {
        "RSIStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Rsi
    }

    //need at least lookback + 1 bars for the first rsi value
    fn lookback(&self) -> usize {
        self.lookback + 1
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(RSI, rsi(closes, self.lookback));
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let rsi_value = ctx.value(RSI);
        let oversold = lt(rsi_value, self.oversold);
        let overbought = gt(rsi_value, self.overbought);

        let signal = if ctx.position.is_flat() && oversold {
            Signal::Buy
        } else if ctx.position.is_long() && overbought {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Evaluation::new(
            vec![
                Condition::bullish("rsi_oversold", oversold),
                Condition::bearish("rsi_overbought", overbought),
            ],
            signal,
        )
    }
}
