//! Numerical helpers shared by the ambient metric and the matchers

use ndarray::ArrayView2;

/// Small epsilon for numerical comparisons
pub const EPS: f64 = 1e-10;

/// Squared Euclidean distance between two flat vectors
///
/// 4-way unrolled accumulator so the compiler can auto-vectorize the loop.
#[inline]
pub fn squared_euclidean(x: &[f64], y: &[f64]) -> f64 {
    let len = x.len().min(y.len());
    let chunks = len / 4;
    let remainder = len % 4;

    let mut sum0 = 0.0f64;
    let mut sum1 = 0.0f64;
    let mut sum2 = 0.0f64;
    let mut sum3 = 0.0f64;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = x[base] - y[base];
        let d1 = x[base + 1] - y[base + 1];
        let d2 = x[base + 2] - y[base + 2];
        let d3 = x[base + 3] - y[base + 3];
        sum0 += d0 * d0;
        sum1 += d1 * d1;
        sum2 += d2 * d2;
        sum3 += d3 * d3;
    }

    let base = chunks * 4;
    for i in 0..remainder {
        let d = x[base + i] - y[base + i];
        sum0 += d * d;
    }

    sum0 + sum1 + sum2 + sum3
}

/// Frobenius inner product ⟨X, Y⟩ = Σᵢⱼ Xᵢⱼ Yᵢⱼ = tr(Xᵀ Y)
#[inline]
pub fn frobenius_inner(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
    x.iter().zip(y.iter()).map(|(&a, &b)| a * b).sum()
}

/// True when every entry is finite
#[inline]
pub fn all_finite<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    values.into_iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_squared_euclidean_remainder() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![0.0, 0.0, 0.0, 0.0, 0.0];
        assert!((squared_euclidean(&x, &y) - 55.0).abs() < 1e-12);
    }

    #[test]
    fn test_frobenius_inner() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[1.0, 0.0], [0.0, 1.0]];
        assert!((frobenius_inner(a.view(), b.view()) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[1.0, -2.0]));
        assert!(!all_finite(&[1.0, f64::NAN]));
    }
}
