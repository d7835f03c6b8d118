use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{macd, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, Signal, Strategy};

const MACD: &str = "macd";
const MACD_SIGNAL: &str = "macd_signal";
const MACD_HIST: &str = "macd_hist";

//buys when the macd line crosses above its signal line, sells on the reverse cross
#[derive(Debug, Clone)]
pub struct MacdCrossoverStrategy {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdCrossoverStrategy {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        MacdCrossoverStrategy { fast, slow, signal }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.macd_fast, config.macd_slow, config.macd_signal)
    }
}

impl Default for MacdCrossoverStrategy {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Strategy for MacdCrossoverStrategy {
    fn name(&self) -> &str {
        "MACDStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Macd
    }

    //both lines are defined from the first bar, a cross needs two
    fn lookback(&self) -> usize {
        2
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let m = macd(closes, self.fast, self.slow, self.signal);
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(MACD, m.macd);
        frame.insert(MACD_SIGNAL, m.signal);
        frame.insert(MACD_HIST, m.histogram);
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let cross_up = ctx.crossed_above(MACD, MACD_SIGNAL, false);
        let cross_down = ctx.crossed_below(MACD, MACD_SIGNAL);

        let signal = if ctx.position.is_flat() && cross_up {
            Signal::Buy
        } else if ctx.position.is_long() && cross_down {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Evaluation::new(
            vec![
                Condition::bullish("macd_cross_up", cross_up),
                Condition::bearish("macd_cross_down", cross_down),
            ],
            signal,
        )
    }
}
