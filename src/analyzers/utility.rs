/// Arithmetic mean. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator) given a pre-computed mean.
/// Returns `None` for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Percent change from `previous` to `current`, with a zero base reported as 0.
pub fn pct_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Percent change of each value against the one before it; the first entry
/// has no predecessor and is 0.
pub fn pct_changes(series: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let mut previous: Option<f64> = None;
    for &value in series {
        out.push(previous.map_or(0.0, |p| pct_change(p, value)));
        previous = Some(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_sample_stddev() {
        assert_eq!(sample_stddev(&[5.0], 5.0), None);
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = sample_stddev(&values, 5.0).unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_pct_change_zero_base() {
        assert_eq!(pct_change(0.0, 10.0), 0.0);
        assert_eq!(pct_change(0.0, 0.0), 0.0);
        assert_eq!(pct_change(10.0, 20.0), 100.0);
    }

    #[test]
    fn test_pct_changes_series() {
        assert_eq!(pct_changes(&[10.0, 20.0, 15.0]), vec![0.0, 100.0, -25.0]);
        assert!(pct_changes(&[]).is_empty());
    }
}
