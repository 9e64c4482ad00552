//! SIMD window kernels.
//!
//! These use the `wide` crate for portable SIMD operations. Rolling
//! indicators reduce every window from scratch through these kernels.

use wide::f64x4;

/// SIMD sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        simd_sum += values;
    }

    let mut result = simd_sum.reduce_add();

    // Handle remaining elements
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Arithmetic mean of a non-empty slice.
#[inline]
pub fn mean_simd(data: &[f64]) -> f64 {
    sum_simd(data) / data.len() as f64
}

/// Population variance of a slice around a precomputed mean.
pub fn variance_simd(data: &[f64], mean: f64) -> f64 {
    let chunks = data.len() / 4;
    let mean_vec = f64x4::splat(mean);
    let mut sum_sq = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        let diff = values - mean_vec;
        sum_sq += diff * diff;
    }

    let mut result = sum_sq.reduce_add();

    for &value in &data[(chunks * 4)..] {
        let diff = value - mean;
        result += diff * diff;
    }

    result / data.len() as f64
}

/// SIMD min/max finder.
pub fn minmax_simd(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }

    let chunks = data.len() / 4;
    let mut min_vec = f64x4::splat(f64::INFINITY);
    let mut max_vec = f64x4::splat(f64::NEG_INFINITY);

    for i in 0..chunks {
        let idx = i * 4;
        let values = f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]);
        min_vec = min_vec.min(values);
        max_vec = max_vec.max(values);
    }

    let min_arr = min_vec.to_array();
    let max_arr = max_vec.to_array();

    let mut min = min_arr[0].min(min_arr[1]).min(min_arr[2]).min(min_arr[3]);
    let mut max = max_arr[0].max(max_arr[1]).max(max_arr[2]).max(max_arr[3]);

    for &value in &data[(chunks * 4)..] {
        min = min.min(value);
        max = max.max(value);
    }

    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_simd() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert!((sum_simd(&data) - 5050.0).abs() < 1e-10);

        // Shorter than one lane
        assert!((sum_simd(&[1.5, 2.5]) - 4.0).abs() < 1e-10);
        assert_eq!(sum_simd(&[]), 0.0);
    }

    #[test]
    fn test_mean_simd() {
        assert!((mean_simd(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_variance_simd() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mean = mean_simd(&data);

        // Population variance of [2,4,4,4,5,5,7,9] is 4
        assert!((variance_simd(&data, mean) - 4.0).abs() < 1e-10);

        let data = vec![2.0, 4.0, 6.0];
        assert!((variance_simd(&data, 4.0) - 8.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_minmax_simd() {
        let data = vec![5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 0.5];
        let (min, max) = minmax_simd(&data).unwrap();

        assert!((min - 0.5).abs() < 1e-10);
        assert!((max - 9.0).abs() < 1e-10);
        assert!(minmax_simd(&[]).is_none());
    }
}
