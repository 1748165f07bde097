//! Small descriptive-statistics helpers shared by imputation and analysis

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;

/// Non-null values of a numeric column as `f64`, in row order.
pub fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Sort a slice of floats ascending (NaN-free input assumed).
pub fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted_values` must be sorted ascending. Returns `None` when empty.
pub fn quantile(sorted_values: &[f64], q: f64) -> Option<f64> {
    if sorted_values.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted_values = sorted(values.to_vec());
    quantile(&sorted_values, 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Most frequent value; ties resolve to the smallest value.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for &v in values {
        // Fold -0.0 into 0.0 so both count as one value
        let key = if v == 0.0 { 0.0f64 } else { v };
        counts.entry(key.to_bits()).or_insert((key, 0)).1 += 1;
    }
    counts
        .into_values()
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
        })
        .map(|(value, _)| value)
}

/// Most frequent string; ties resolve to the lexicographically smallest.
pub fn text_mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_median_unsorted_input() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_numeric_mode_prefers_smallest_on_tie() {
        assert_eq!(numeric_mode(&[3.0, 3.0, 5.0]), Some(3.0));
        assert_eq!(numeric_mode(&[5.0, 2.0, 5.0, 2.0, 9.0]), Some(2.0));
        assert_eq!(numeric_mode(&[]), None);
    }

    #[test]
    fn test_text_mode_prefers_smallest_on_tie() {
        assert_eq!(
            text_mode(["Family", "Unaccompanied", "Family", "Unaccompanied"]),
            Some("Family".to_string())
        );
        assert_eq!(
            text_mode(["Spouse", "Unaccompanied", "Unaccompanied"]),
            Some("Unaccompanied".to_string())
        );
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138).abs() < 1e-3);
        assert_eq!(sample_std(&[1.0]), None);
    }
}
