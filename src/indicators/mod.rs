//pure, causal transforms over a close series
//every output has the input's length, warm-up slots hold f64::NAN so
//comparisons against them evaluate to false

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, BollingerBands};
pub use ema::{ema, macd, Macd};
pub use frame::IndicatorFrame;
pub use rsi::rsi;
pub use sma::sma;

//true when both operands are defined and a > b
pub fn gt(a: f64, b: f64) -> bool {
    a > b
}

//true when both operands are defined and a < b
pub fn lt(a: f64, b: f64) -> bool {
    a < b
}

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}
