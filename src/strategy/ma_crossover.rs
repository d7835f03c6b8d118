use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{sma, IndicatorFrame};
use crate::strategy::{BarContext, Condition, Evaluation, RiskLimits, Signal, Strategy};

const SMA_FAST: &str = "sma_fast";
const SMA_SLOW: &str = "sma_slow";

//enters on a fast/slow sma cross up, a previous touch counts as below
//exits only through the stop-loss and take-profit limits
#[derive(Debug, Clone)]
pub struct MaCrossoverStrategy {
    fast_window: usize,
    slow_window: usize,
    limits: RiskLimits,
}

impl MaCrossoverStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        MaCrossoverStrategy {
            fast_window: config.sma_fast,
            slow_window: config.sma_slow,
            limits: RiskLimits::new(config.stop_loss_pct, config.take_profit_pct),
        }
    }
}

impl Default for MaCrossoverStrategy {
    fn default() -> Self {
        MaCrossoverStrategy::new(&StrategyConfig::default())
    }
}

impl Strategy for MaCrossoverStrategy {
    fn name(&self) -> &str {
        "MACrossoverStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::MaCrossover
    }

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
        let cross_up = ctx.crossed_above(SMA_FAST, SMA_SLOW, true);

        let signal = if ctx.position.is_flat() {
            if cross_up {
                Signal::Buy
            } else {
                Signal::Hold
            }
        } else {
            self.limits.exit_for(ctx)
        };

        Evaluation::new(vec![Condition::bullish("sma_cross_up", cross_up)], signal)
    }
}
