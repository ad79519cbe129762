//! Inequality measures over a distribution

use ordered_float::OrderedFloat;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Gini coefficient: 0 for perfect equality, approaching 1 when one member
/// holds everything
///
/// Defined as 0 for fewer than two values, for equal values and for a zero
/// total. Negative values (firm debt) are shifted so the minimum is 0.
pub fn gini(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort();

    let min = sorted[0].0;
    let max = sorted[sorted.len() - 1].0;
    if min == max {
        return 0.0;
    }
    let shift = if min < 0.0 { -min } else { 0.0 };

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().map(|v| v.0 + shift).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i as f64 + 1.0) - n - 1.0) * (v.0 + shift))
        .sum();

    (weighted / (n * total)).clamp(0.0, 1.0)
}

/// Hoover index: share of the total that would have to move to reach
/// equality
pub fn hoover(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.len() < 2 || total <= 0.0 {
        return 0.0;
    }
    let avg = total / values.len() as f64;
    let deviation: f64 = values.iter().map(|v| (v - avg).abs()).sum();
    0.5 * deviation / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gini_degenerate_inputs() {
        assert_eq!(gini(&[]), 0.0);
        assert_eq!(gini(&[42.0]), 0.0);
        assert_eq!(gini(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_gini_one_holder() {
        // One of four holds everything: (n - 1) / n
        assert!((gini(&[0.0, 0.0, 0.0, 10.0]) - 0.75).abs() < 1e-12);
        assert!((gini(&[10.0, 0.0, 0.0, 0.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_gini_known_value() {
        // Mean absolute difference 4/3 over twice the mean 4
        assert!((gini(&[1.0, 2.0, 3.0]) - 2.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_gini_shifts_negative_values() {
        assert!((gini(&[-5.0, -5.0, -5.0, 5.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_hoover() {
        assert_eq!(hoover(&[3.0, 3.0]), 0.0);
        assert!((hoover(&[0.0, 0.0, 0.0, 10.0]) - 0.75).abs() < 1e-12);
        assert_eq!(hoover(&[]), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    proptest! {
        #[test]
        fn prop_gini_in_unit_interval(values in prop::collection::vec(0.0f64..1e6, 0..100)) {
            let g = gini(&values);
            prop_assert!((0.0..=1.0).contains(&g));
        }

        #[test]
        fn prop_gini_scale_invariant(
            values in prop::collection::vec(0.0f64..1e4, 2..60),
            scale in 0.01f64..100.0,
        ) {
            let scaled: Vec<f64> = values.iter().map(|v| v * scale).collect();
            prop_assert!((gini(&values) - gini(&scaled)).abs() < 1e-9);
        }
    }
}
