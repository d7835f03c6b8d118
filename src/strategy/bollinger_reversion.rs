use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{bollinger, gt, lt, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, Signal, Strategy};

const BB_MIDDLE: &str = "bb_middle";
const BB_UPPER: &str = "bb_upper";
const BB_LOWER: &str = "bb_lower";

//buys a close below the lower band, sells once price is back above the middle band
#[derive(Debug, Clone)]
pub struct BollingerReversionStrategy {
    window: usize,
    num_std: f64,
}

impl BollingerReversionStrategy {
    pub fn new(window: usize, num_std: f64) -> Self {
        BollingerReversionStrategy { window, num_std }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.bollinger_window, config.bollinger_std)
    }
}

impl Default for BollingerReversionStrategy {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl Strategy for BollingerReversionStrategy {
    fn name(&self) -> &str {
        "BollingerStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Bollinger
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let bands = bollinger(closes, self.window, self.num_std);
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(BB_MIDDLE, bands.middle);
        frame.insert(BB_UPPER, bands.upper);
        frame.insert(BB_LOWER, bands.lower);
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let below_lower = lt(ctx.close, ctx.value(BB_LOWER));
        let above_middle = gt(ctx.close, ctx.value(BB_MIDDLE));

        let signal = if ctx.position.is_flat() && below_lower {
            Signal::Buy
        } else if ctx.position.is_long() && above_middle {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Evaluation::new(
            vec![
                Condition::bullish("bollinger_touch", below_lower),
                Condition::bearish("above_middle", above_middle),
            ],
            signal,
        )
    }
}
