use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{ema, gt, IndicatorFrame};
use crate::metrics::PerformanceSummary;
use crate::strategy::{BarContext, Condition, Evaluation, RiskLimits, Signal, Strategy};

const EMA_FAST: &str = "ema_fast";
const EMA_SLOW: &str = "ema_slow";

//loosening needs this many closed trades and never goes below the minimum spans
const LOOSEN_MIN_TRADES: usize = 20;
const MIN_FAST_SPAN: usize = 5;
const MIN_SLOW_SPAN: usize = 10;

//long while the fast ema sits above the slow ema, exits through the risk limits
#[derive(Debug, Clone)]
pub struct EmaCrossoverStrategy {
    fast_span: usize,
    slow_span: usize,
    limits: RiskLimits,
}

impl EmaCrossoverStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        EmaCrossoverStrategy {
            fast_span: config.ema_fast,
            slow_span: config.ema_slow,
            limits: RiskLimits::new(config.stop_loss_pct, config.take_profit_pct),
        }
    }

    pub fn spans(&self) -> (usize, usize) {
        (self.fast_span, self.slow_span)
    }
}

impl Default for EmaCrossoverStrategy {
    fn default() -> Self {
        EmaCrossoverStrategy::new(&StrategyConfig::default())
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn name(&self) -> &str {
        "EMACrossoverStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::EmaCrossover
    }

    //the slow ema is only trusted after a full span of bars
    fn lookback(&self) -> usize {
        self.slow_span + 1
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(EMA_FAST, ema(closes, self.fast_span));
        frame.insert(EMA_SLOW, ema(closes, self.slow_span));
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let warmed_up = ctx.index >= self.slow_span;
        let fast_above = warmed_up && gt(ctx.value(EMA_FAST), ctx.value(EMA_SLOW));

        let signal = if ctx.position.is_flat() {
            if fast_above {
                Signal::Buy
            } else {
                Signal::Hold
            }
        } else {
            self.limits.exit_for(ctx)
        };

        Evaluation::new(vec![Condition::bullish("ema_fast_above", fast_above)], signal)
    }

    fn loosen(&mut self, summary: &PerformanceSummary) -> bool {
        if summary.total_trades < LOOSEN_MIN_TRADES {
            return false;
        }
        let fast = shorten(self.fast_span, 2, MIN_FAST_SPAN);
        let slow = shorten(self.slow_span, 5, MIN_SLOW_SPAN);
        //keep fast strictly below slow
        if fast >= slow {
            return false;
        }
        let changed = fast != self.fast_span || slow != self.slow_span;
        self.fast_span = fast;
        self.slow_span = slow;
        changed
    }
}

//shortens a span towards its minimum, spans already at or below it stay put
fn shorten(span: usize, step: usize, min: usize) -> usize {
    if span <= min {
        span
    } else {
        span.saturating_sub(step).max(min)
    }
}
