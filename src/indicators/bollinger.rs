use statrs::statistics::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

//rolling mean +/- num_std * rolling population standard deviation
pub fn bollinger(values: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let n = values.len();
    let mut bands = BollingerBands {
        middle: vec![f64::NAN; n],
        upper: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
    };
    if window == 0 || n < window {
        return bands;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }

        let mean = slice.mean();
        let std = slice.population_std_dev();

        bands.middle[i] = mean;
        bands.upper[i] = mean + num_std * std;
        bands.lower[i] = mean - num_std * std;
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn flat_series_collapses_to_mean() {
        let bands = bollinger(&[100.0; 30], 20, 2.0);
        assert!(bands.middle[18].is_nan());
        for i in 19..30 {
            assert_eq!(bands.middle[i], 100.0);
            assert_eq!(bands.upper[i], 100.0);
            assert_eq!(bands.lower[i], 100.0);
        }
    }

    #[test]
    fn uses_population_deviation() {
        //mean 2, population variance 2/3
        let bands = bollinger(&[1.0, 2.0, 3.0], 3, 1.0);
        let std = (2.0f64 / 3.0).sqrt();
        assert_approx(bands.middle[2], 2.0, 1e-12);
        assert_approx(bands.upper[2], 2.0 + std, 1e-12);
        assert_approx(bands.lower[2], 2.0 - std, 1e-12);
    }

    #[test]
    fn lower_band_below_upper() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = bollinger(&values, 20, 2.0);
        for i in 19..40 {
            assert!(bands.lower[i] <= bands.middle[i]);
            assert!(bands.middle[i] <= bands.upper[i]);
        }
    }
}
