//! Windowed price reductions
//!
//! Pure functions over dense price slices. The min/max scan processes four
//! f64 lanes per iteration on AVX2 targets with a scalar tail; other targets
//! take the scalar path. Both paths produce identical results.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Minimum and maximum over a price slice
///
/// Returns `(0.0, 0.0)` for an empty slice; callers filter before reducing.
#[inline]
pub fn min_max(prices: &[f64]) -> (f64, f64) {
    if prices.is_empty() {
        return (0.0, 0.0);
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            // Safety: AVX2 support confirmed at runtime
            return unsafe { min_max_avx2(prices) };
        }
    }

    min_max_scalar(prices)
}

/// Percentage change of `current` against a window minimum
///
/// Defined only for `min > 0`; otherwise `0.0`.
#[inline]
pub fn change_percent(current: f64, min: f64) -> f64 {
    if min > 0.0 {
        (current - min) / min * 100.0
    } else {
        0.0
    }
}

/// Element-wise percentage changes: `(current[i] - base[i]) / base[i] * 100`
///
/// Lanes where `base[i] <= 0` yield `0.0`. Slices of unequal length are
/// truncated to the shorter one.
pub fn batch_change_percent(current: &[f64], base: &[f64]) -> Vec<f64> {
    let n = current.len().min(base.len());

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            // Safety: AVX2 support confirmed at runtime
            return unsafe { batch_change_percent_avx2(&current[..n], &base[..n]) };
        }
    }

    batch_change_percent_scalar(&current[..n], &base[..n])
}

fn min_max_scalar(prices: &[f64]) -> (f64, f64) {
    let mut min = prices[0];
    let mut max = prices[0];
    for &p in &prices[1..] {
        if p < min {
            min = p;
        }
        if p > max {
            max = p;
        }
    }
    (min, max)
}

fn batch_change_percent_scalar(current: &[f64], base: &[f64]) -> Vec<f64> {
    current
        .iter()
        .zip(base)
        .map(|(&c, &b)| if b > 0.0 { (c - b) / b * 100.0 } else { 0.0 })
        .collect()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn min_max_avx2(prices: &[f64]) -> (f64, f64) {
    let mut min_vec = _mm256_set1_pd(prices[0]);
    let mut max_vec = _mm256_set1_pd(prices[0]);

    let mut i = 0;
    while i + 4 <= prices.len() {
        let chunk = _mm256_loadu_pd(prices.as_ptr().add(i));
        min_vec = _mm256_min_pd(min_vec, chunk);
        max_vec = _mm256_max_pd(max_vec, chunk);
        i += 4;
    }

    let mut min_lanes = [0.0f64; 4];
    let mut max_lanes = [0.0f64; 4];
    _mm256_storeu_pd(min_lanes.as_mut_ptr(), min_vec);
    _mm256_storeu_pd(max_lanes.as_mut_ptr(), max_vec);

    let mut min = min_lanes[0];
    let mut max = max_lanes[0];
    for lane in 1..4 {
        if min_lanes[lane] < min {
            min = min_lanes[lane];
        }
        if max_lanes[lane] > max {
            max = max_lanes[lane];
        }
    }

    // Scalar tail
    for &p in &prices[i..] {
        if p < min {
            min = p;
        }
        if p > max {
            max = p;
        }
    }

    (min, max)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn batch_change_percent_avx2(current: &[f64], base: &[f64]) -> Vec<f64> {
    let n = current.len();
    let mut out = vec![0.0f64; n];

    let hundred = _mm256_set1_pd(100.0);
    let zero = _mm256_setzero_pd();

    let mut i = 0;
    while i + 4 <= n {
        let cur = _mm256_loadu_pd(current.as_ptr().add(i));
        let bas = _mm256_loadu_pd(base.as_ptr().add(i));

        let diff = _mm256_sub_pd(cur, bas);
        let ratio = _mm256_div_pd(diff, bas);
        let pct = _mm256_mul_pd(ratio, hundred);

        // Lanes with base <= 0 are forced to zero
        let valid = _mm256_cmp_pd::<_CMP_GT_OQ>(bas, zero);
        let masked = _mm256_blendv_pd(zero, pct, valid);

        _mm256_storeu_pd(out.as_mut_ptr().add(i), masked);
        i += 4;
    }

    for j in i..n {
        if base[j] > 0.0 {
            out[j] = (current[j] - base[j]) / base[j] * 100.0;
        }
    }

    out
}
