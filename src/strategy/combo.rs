use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::{bollinger, ema, gt, lt, macd, rsi, sma, IndicatorFrame};
use crate::metrics::PerformanceSummary;
use crate::strategy::{BarContext, Condition, Evaluation, RiskLimits, Signal, Strategy};

const SMA_FAST: &str = "sma_fast";
const SMA_SLOW: &str = "sma_slow";
const RSI: &str = "rsi";
const EMA_TREND: &str = "ema_trend";
const MACD: &str = "macd";
const MACD_SIGNAL: &str = "macd_signal";
const MACD_HIST: &str = "macd_hist";
const BB_MIDDLE: &str = "bb_middle";
const BB_UPPER: &str = "bb_upper";
const BB_LOWER: &str = "bb_lower";

//loosening never goes below these
const MIN_RSI_OVERSOLD: f64 = 10.0;
const MIN_BOLLINGER_STD: f64 = 1.5;

//five-way confluence strategy
//buys only when every sub-signal agrees, exits on stop-loss or take-profit
#[derive(Debug, Clone)]
pub struct ComboStrategy {
    sma_fast: usize,
    sma_slow: usize,
    rsi_period: usize,
    rsi_oversold: f64,
    macd_fast: usize,
    macd_slow: usize,
    macd_signal: usize,
    bollinger_window: usize,
    bollinger_std: f64,
    ema_period: usize,
    limits: RiskLimits,
}

impl ComboStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        ComboStrategy {
            sma_fast: config.sma_fast,
            sma_slow: config.sma_slow,
            rsi_period: config.rsi_period,
            rsi_oversold: config.rsi_oversold,
            macd_fast: config.macd_fast,
            macd_slow: config.macd_slow,
            macd_signal: config.macd_signal,
            bollinger_window: config.bollinger_window,
            bollinger_std: config.bollinger_std,
            ema_period: config.ema_period,
            limits: RiskLimits::new(config.stop_loss_pct, config.take_profit_pct),
        }
    }

    pub fn rsi_oversold(&self) -> f64 {
        self.rsi_oversold
    }

    pub fn bollinger_std(&self) -> f64 {
        self.bollinger_std
    }

    //the five sub-signals, in reporting order
    fn conditions(&self, ctx: &BarContext<'_>) -> Vec<Condition> {
        let close = ctx.close;
        vec![
            Condition::bullish("trend_up", gt(close, ctx.value(EMA_TREND))),
            Condition::bullish("rsi_signal", lt(ctx.value(RSI), self.rsi_oversold)),
            Condition::bullish("macd_cross", gt(ctx.value(MACD), ctx.value(MACD_SIGNAL))),
            Condition::bullish("bollinger_touch", lt(close, ctx.value(BB_LOWER))),
            Condition::bullish("sma_crossover", gt(ctx.value(SMA_FAST), ctx.value(SMA_SLOW))),
        ]
    }
}

impl Default for ComboStrategy {
    fn default() -> Self {
        ComboStrategy::new(&StrategyConfig::default())
    }
}

impl Strategy for ComboStrategy {
    fn name(&self) -> &str {
        "ComboStrategy"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Combo
    }

    //emas are seeded on the first bar and add no warm-up
    fn lookback(&self) -> usize {
        self.sma_slow
            .max(self.sma_fast)
            .max(self.bollinger_window)
            .max(self.rsi_period + 1)
    }

    fn indicators(&self, closes: &[f64]) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new(closes.len());
        frame.insert(SMA_FAST, sma(closes, self.sma_fast));
        frame.insert(SMA_SLOW, sma(closes, self.sma_slow));
        frame.insert(RSI, rsi(closes, self.rsi_period));
        frame.insert(EMA_TREND, ema(closes, self.ema_period));

        let m = macd(closes, self.macd_fast, self.macd_slow, self.macd_signal);
        frame.insert(MACD, m.macd);
        frame.insert(MACD_SIGNAL, m.signal);
        frame.insert(MACD_HIST, m.histogram);

        let bands = bollinger(closes, self.bollinger_window, self.bollinger_std);
        frame.insert(BB_MIDDLE, bands.middle);
        frame.insert(BB_UPPER, bands.upper);
        frame.insert(BB_LOWER, bands.lower);
        frame
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Evaluation {
        let conditions = self.conditions(ctx);
        let unanimous = conditions.iter().all(|c| c.satisfied);

        let signal = if ctx.position.is_flat() {
            if unanimous {
                Signal::Buy
            } else {
                Signal::Hold
            }
        } else {
            self.limits.exit_for(ctx)
        };

        Evaluation::new(conditions, signal)
    }

    fn loosen(&mut self, _summary: &PerformanceSummary) -> bool {
        let rsi_oversold = step_down(self.rsi_oversold, 2.0, MIN_RSI_OVERSOLD);
        let bollinger_std = step_down(self.bollinger_std, 0.1, MIN_BOLLINGER_STD);
        let changed = rsi_oversold != self.rsi_oversold || bollinger_std != self.bollinger_std;
        self.rsi_oversold = rsi_oversold;
        self.bollinger_std = bollinger_std;
        changed
    }
}

//lowers a threshold towards its floor, values already at or below it stay put
fn step_down(value: f64, step: f64, floor: f64) -> f64 {
    if value <= floor {
        value
    } else {
        (value - step).max(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PositionState;

    #[test]
    fn lookback_ignores_ema_spans() {
        assert_eq!(ComboStrategy::default().lookback(), 50);
    }

    #[test]
    fn undefined_indicators_make_conditions_false() {
        let combo = ComboStrategy::default();
        let frame = combo.indicators(&[100.0; 5]);
        let position = PositionState::flat();
        let ctx = BarContext::new(4, 100.0, &position, &frame);
        let eval = combo.evaluate(&ctx);
        assert_eq!(eval.conditions.len(), 5);
        assert!(!eval.conditions[1].satisfied);
        assert!(!eval.conditions[3].satisfied);
        assert!(!eval.conditions[4].satisfied);
        assert_eq!(eval.signal, Signal::Hold);
    }

    #[test]
    fn unanimous_frame_buys_when_flat() {
        let combo = ComboStrategy::default();
        let mut frame = IndicatorFrame::new(1);
        frame.insert(EMA_TREND, vec![90.0]);
        frame.insert(RSI, vec![20.0]);
        frame.insert(MACD, vec![1.0]);
        frame.insert(MACD_SIGNAL, vec![0.5]);
        frame.insert(BB_LOWER, vec![101.0]);
        frame.insert(SMA_FAST, vec![99.0]);
        frame.insert(SMA_SLOW, vec![98.0]);

        let flat = PositionState::flat();
        let eval = combo.evaluate(&BarContext::new(0, 100.0, &flat, &frame));
        assert_eq!(eval.confidence(), 5);
        assert_eq!(eval.signal, Signal::Buy);

        //already long: risk limits decide, no pyramiding
        let mut long = PositionState::flat();
        long.open_long(100.0);
        let eval = combo.evaluate(&BarContext::new(0, 100.0, &long, &frame));
        assert_eq!(eval.signal, Signal::Hold);
    }

    #[test]
    fn long_position_exits_on_limits() {
        let combo = ComboStrategy::default();
        let frame = IndicatorFrame::new(1);
        let mut long = PositionState::flat();
        long.open_long(100.0);

        let down = combo.evaluate(&BarContext::new(0, 97.5, &long, &frame));
        assert_eq!(down.signal, Signal::StopLoss);

        let up = combo.evaluate(&BarContext::new(0, 104.5, &long, &frame));
        assert_eq!(up.signal, Signal::TakeProfit);
    }

    #[test]
    fn loosening_is_floored() {
        let mut combo = ComboStrategy::default();
        let summary = PerformanceSummary::empty("ComboStrategy");
        assert!(combo.loosen(&summary));
        assert_eq!(combo.rsi_oversold(), 28.0);
        assert!((combo.bollinger_std() - 1.9).abs() < 1e-12);

        for _ in 0..50 {
            combo.loosen(&summary);
        }
        assert_eq!(combo.rsi_oversold(), MIN_RSI_OVERSOLD);
        assert_eq!(combo.bollinger_std(), MIN_BOLLINGER_STD);
        assert!(!combo.loosen(&summary));
    }

    #[test]
    fn thresholds_below_floor_are_left_alone() {
        let config = StrategyConfig {
            rsi_oversold: 8.0,
            bollinger_std: 1.0,
            ..StrategyConfig::default()
        };
        let mut combo = ComboStrategy::new(&config);
        let summary = PerformanceSummary::empty("ComboStrategy");
        assert!(!combo.loosen(&summary));
        assert_eq!(combo.rsi_oversold(), 8.0);
        assert_eq!(combo.bollinger_std(), 1.0);
    }
}
