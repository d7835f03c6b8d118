//relative strength index with simple (non-exponential) rolling means
//rsi = 100 - 100 / (1 + avg_gain / avg_loss)
//defined from bar `period` onwards since bar 0 has no delta
//a zero average loss gives rsi = 100, including the no-movement case
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = (0..n)
        .map(|i| if i == 0 { f64::NAN } else { values[i] - values[i - 1] })
        .collect();

    for i in period..n {
        let window = &deltas[i + 1 - period..=i];
        if window.iter().any(|d| !d.is_finite()) {
            continue;
        }

        let gain: f64 = window.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
        let loss: f64 = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;

        out[i] = if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        };
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn all_gains_is_100() {
        let out = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0], 3);
        assert!(out[2].is_nan());
        assert_approx(out[3], 100.0, 1e-12);
        assert_approx(out[4], 100.0, 1e-12);
    }

    #[test]
    fn all_losses_is_0() {
        let out = rsi(&[104.0, 103.0, 102.0, 101.0], 3);
        assert_approx(out[3], 0.0, 1e-12);
    }

    #[test]
    fn flat_series_is_100() {
        let out = rsi(&[50.0; 20], 14);
        assert!(out[13].is_nan());
        assert_approx(out[14], 100.0, 1e-12);
    }

    #[test]
    fn mixed_moves() {
        //deltas +0.34, -0.25, -0.48 -> gain 0.34/3, loss 0.73/3
        let out = rsi(&[44.0, 44.34, 44.09, 43.61], 3);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(out[3], expected, 1e-9);
    }

    #[test]
    fn stays_in_bounds() {
        let out = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for v in out.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v));
        }
    }
}
