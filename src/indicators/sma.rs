//simple moving average over a trailing window
//undefined for the first window - 1 values and wherever the window holds a nan
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }

    out
}
