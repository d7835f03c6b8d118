use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{sma, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, Signal, Strategy};

const SMA_FAST: &str = "sma_fast";
const SMA_SLOW: &str = "sma_slow";

//sma crossover strategy
//goes long when fast sma crosses above slow sma
//goes flat when fast sma crosses below slow sma
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    fast_window: usize,
    slow_window: usize,
}

impl SmaCrossoverStrategy {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        SmaCrossoverStrategy {
            fast_window,
            slow_window,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.sma_fast, config.sma_slow)
    }
}

impl Default for SmaCrossoverStrategy {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        "SMACrossoverStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::SmaCrossover
    }

    //a crossover needs two bars with a defined slow sma
    fn lookback(&self) -> usize {
        self.slow_window + 1
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(SMA_FAST, sma(closes, self.fast_window));
        frame.insert(SMA_SLOW, sma(closes, self.slow_window));
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        //bullish crossover fast crosses above slow
        let cross_up = ctx.crossed_above(SMA_FAST, SMA_SLOW, false);
        //bearish crossover fast crosses below slow
        let cross_down = ctx.crossed_below(SMA_FAST, SMA_SLOW);

        let signal = if ctx.position.is_flat() && cross_up {
            Signal::Buy
        } else if ctx.position.is_long() && cross_down {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Evaluation::new(
            vec![
                Condition::bullish("sma_cross_up", cross_up),
                Condition::bearish("sma_cross_down", cross_down),
            ],
            signal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PositionState;

    #[test]
    fn detects_both_crossings() {
        let strategy = SmaCrossoverStrategy::new(1, 2);
        //fast = close, slow = mean of last two closes
        let closes = [10.0, 9.0, 12.0, 8.0];
        let frame = strategy.indicators(&closes);
        let flat = PositionState::flat();
        let mut long = PositionState::flat();
        long.open_long(12.0);

        //bar 2: fast 12 > slow 10.5 after 9 < 9.5
        let up = strategy.evaluate(&BarContext::new(2, 12.0, &flat, &frame));
        assert_eq!(up.signal, Signal::Buy);

        //bar 3: fast 8 < slow 10 after 12 > 10.5
        let down = strategy.evaluate(&BarContext::new(3, 8.0, &long, &frame));
        assert_eq!(down.signal, Signal::Sell);
    }

    #[test]
    fn no_signal_during_warm_up() {
        let strategy = SmaCrossoverStrategy::default();
        let frame = strategy.indicators(&[10.0; 10]);
        let flat = PositionState::flat();
        let eval = strategy.evaluate(&BarContext::new(9, 10.0, &flat, &frame));
        assert_eq!(eval.signal, Signal::Hold);
    }
}
