//exponential moving average, smoothing factor 2 / (span + 1)
//seeded with the first defined value, so it is defined from that bar onwards
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if span == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            //undefined input leaves the recursion where it was
            continue;
        }
        let next = match prev {
            Some(p) => alpha * value + (1.0 - alpha) * p,
            None => value,
        };
        out[i] = next;
        prev = Some(next);
    }

    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

//macd line = ema(fast) - ema(slow), signal line = ema(signal) of the macd line
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&line, signal);
    let histogram = line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    Macd {
        macd: line,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn seeded_with_first_value() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        //alpha = 0.5
        assert_approx(out[0], 10.0, 1e-12);
        assert_approx(out[1], 15.0, 1e-12);
        assert_approx(out[2], 22.5, 1e-12);
    }

    #[test]
    fn constant_input_is_constant() {
        let out = ema(&[5.0; 50], 200);
        assert!(out.iter().all(|v| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn leading_nan_delays_seed() {
        let out = ema(&[f64::NAN, 4.0, 8.0], 1);
        assert!(out[0].is_nan());
        assert_approx(out[1], 4.0, 1e-12);
        assert_approx(out[2], 8.0, 1e-12);
    }

    #[test]
    fn macd_of_flat_series_is_zero() {
        let m = macd(&[100.0; 40], 12, 26, 9);
        assert!(m.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(m.signal.iter().all(|v| v.abs() < 1e-12));
        assert!(m.histogram.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn macd_positive_on_rising_series() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let m = macd(&closes, 12, 26, 9);
        assert!(m.macd[59] > 0.0);
        //the signal line lags the macd line on a steady trend
        assert!(m.macd[59] > m.signal[59]);
    }
}
