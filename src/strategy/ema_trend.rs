use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{ema, gt, lt, rsi, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, Signal, Strategy};

const EMA_TREND: &str = "ema_trend";
const RSI: &str = "rsi";

//buys oversold dips while price holds above the long ema
//sells once the trend breaks or rsi is overbought
#[derive(Debug, Clone)]
pub struct EmaTrendStrategy {
    ema_period: usize,
    rsi_period: usize,
    oversold: f64,
    overbought: f64,
}

impl EmaTrendStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        EmaTrendStrategy {
            ema_period: config.ema_period,
            rsi_period: config.rsi_period,
            oversold: config.rsi_oversold,
            overbought: config.rsi_overbought,
        }
    }
}

impl Default for EmaTrendStrategy {
    fn default() -> Self {
        EmaTrendStrategy::new(&StrategyConfig::default())
    }
}

impl Strategy for EmaTrendStrategy {
    fn name(&self) -> &str {
        "EMA200TrendStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Ema200Trend
    }

    fn lookback(&self) -> usize {
        self.rsi_period + 1
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(EMA_TREND, ema(closes, self.ema_period));
        frame.insert(RSI, rsi(closes, self.rsi_period));
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let trend = ctx.value(EMA_TREND);
        let rsi_value = ctx.value(RSI);

        let above_trend = gt(ctx.close, trend);
        let oversold = lt(rsi_value, self.oversold);
        let below_trend = lt(ctx.close, trend);
        let overbought = gt(rsi_value, self.overbought);

        let signal = if ctx.position.is_flat() && above_trend && oversold {
            Signal::Buy
        } else if ctx.position.is_long() && (below_trend || overbought) {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Evaluation::new(
            vec![
                Condition::bullish("trend_up", above_trend),
                Condition::bullish("rsi_oversold", oversold),
                Condition::bearish("trend_down", below_trend),
                Condition::bearish("rsi_overbought", overbought),
            ],
            signal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PositionState;

    fn frame(trend: f64, rsi_value: f64) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(1);
        frame.insert(EMA_TREND, vec![trend]);
        frame.insert(RSI, vec![rsi_value]);
        frame
    }

    #[test]
    fn needs_trend_and_oversold_to_enter() {
        let strategy = EmaTrendStrategy::default();
        let flat = PositionState::flat();

        let eval = strategy.evaluate(&BarContext::new(0, 100.0, &flat, &frame(90.0, 25.0)));
        assert_eq!(eval.signal, Signal::Buy);
        assert_eq!(eval.confidence(), 2);

        let eval = strategy.evaluate(&BarContext::new(0, 100.0, &flat, &frame(110.0, 25.0)));
        assert_eq!(eval.signal, Signal::Hold);

        let eval = strategy.evaluate(&BarContext::new(0, 100.0, &flat, &frame(90.0, 45.0)));
        assert_eq!(eval.signal, Signal::Hold);
    }

    #[test]
    fn exits_on_either_bearish_condition() {
        let strategy = EmaTrendStrategy::default();
        let mut long = PositionState::flat();
        long.open_long(100.0);

        let broken = strategy.evaluate(&BarContext::new(0, 100.0, &long, &frame(110.0, 50.0)));
        assert_eq!(broken.signal, Signal::Sell);

        let hot = strategy.evaluate(&BarContext::new(0, 100.0, &long, &frame(90.0, 80.0)));
        assert_eq!(hot.signal, Signal::Sell);

        let calm = strategy.evaluate(&BarContext::new(0, 100.0, &long, &frame(90.0, 50.0)));
        assert_eq!(calm.signal, Signal::Hold);
    }
}
