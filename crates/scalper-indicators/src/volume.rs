//! Volume-weighted indicators.

/// Cumulative Volume-Weighted Average Price from the start of the series.
#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }

    /// `sum(volume * close) / sum(volume)` over all bars so far.
    /// NaN while no volume has traded.
    pub fn calculate_cv(&self, close: &[f64], volume: &[f64]) -> Vec<f64> {
        let mut pv_sum = 0.0;
        let mut volume_sum = 0.0;

        close
            .iter()
            .zip(volume)
            .map(|(&c, &v)| {
                pv_sum += v * c;
                volume_sum += v;
                if volume_sum == 0.0 {
                    f64::NAN
                } else {
                    pv_sum / volume_sum
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vwap_cumulative() {
        let result = Vwap::new().calculate_cv(&[10.0, 20.0, 30.0], &[1.0, 1.0, 2.0]);
        assert!((result[0] - 10.0).abs() < 1e-10);
        assert!((result[1] - 15.0).abs() < 1e-10);
        assert!((result[2] - 22.5).abs() < 1e-10); // (10 + 20 + 60) / 4
    }

    #[test]
    fn test_vwap_undefined_without_volume() {
        let result = Vwap::new().calculate_cv(&[10.0, 20.0], &[0.0, 5.0]);
        assert!(result[0].is_nan());
        assert!((result[1] - 20.0).abs() < 1e-10);
    }
}
