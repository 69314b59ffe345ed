//! Gauss–Legendre quadrature nodes and weights.
//!
//! The `nlat` Gaussian latitudes are the roots μⱼ = sin φⱼ of the Legendre
//! polynomial P_nlat(μ), with weights
//!
//! ```text
//! wⱼ = 2 / ((1 - μⱼ²) [P'_nlat(μⱼ)]²)
//! ```
//!
//! Gaussian quadrature with these nodes integrates polynomials up to degree
//! 2·nlat − 1 exactly, which is what makes the spectral transform's
//! Legendre integrals exact for triangular truncations with
//! nlat ≥ (3L+1)/2.

/// Evaluate the Legendre polynomial Pₙ(x) and its derivative P'ₙ(x).
///
/// The value comes from walking the three-term recurrence
///
/// ```text
/// (k+1) P_{k+1}(x) = (2k+1) x P_k(x) − k P_{k−1}(x)
/// ```
///
/// up from P₀ = 1, P₁ = x; the derivative then follows from
/// P'ₙ(x) = n (x Pₙ − P_{n−1}) / (x² − 1), which is well-defined here
/// because all Gaussian nodes are interior to [-1, 1].
pub fn legendre_and_derivative(degree: usize, x: f64) -> (f64, f64) {
    if degree == 0 {
        return (1.0, 0.0);
    }

    // (P_{k−1}, P_k), walked up to k = degree
    let mut pair = (1.0, x);
    for k in 1..degree {
        let up = ((2 * k + 1) as f64 * x * pair.1 - k as f64 * pair.0) / (k + 1) as f64;
        pair = (pair.1, up);
    }

    let (below, value) = pair;
    let slope = degree as f64 * (x * value - below) / (x * x - 1.0);
    (value, slope)
}

/// Compute the `nlat` Gauss–Legendre nodes and weights on [-1, 1].
///
/// Nodes are returned in descending order (north pole first), matching the
/// north-to-south ring ordering of the grid. Newton iteration from the
/// Chebyshev initial guess converges in a handful of steps to machine
/// precision.
pub fn gauss_legendre(nlat: usize) -> (Vec<f64>, Vec<f64>) {
    assert!(nlat > 0, "need at least one Gaussian latitude");

    use std::f64::consts::PI;

    let n = nlat;
    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);

    for i in 0..n {
        // Chebyshev guess for the i-th root, largest root first
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();

        let mut dp = 0.0;
        for _ in 0..100 {
            let (p, dpdx) = legendre_and_derivative(n, x);
            dp = dpdx;
            let update = p / dpdx;
            x -= update;
            if update.abs() < 1e-15 {
                break;
            }
        }
        // one polishing step so the weight uses the converged derivative
        let (p, dpdx) = legendre_and_derivative(n, x);
        x -= p / dpdx;
        dp = dpdx;

        nodes.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }

    (nodes, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legendre_values_and_slopes() {
        let x = 0.5;
        let low_degrees = [
            (0, 1.0, 0.0),
            (1, x, 1.0),
            (2, (3.0 * x * x - 1.0) / 2.0, 3.0 * x),
            (3, (5.0 * x * x * x - 3.0 * x) / 2.0, (15.0 * x * x - 3.0) / 2.0),
        ];
        for (degree, p, dp) in low_degrees {
            let (value, slope) = legendre_and_derivative(degree, x);
            assert!((value - p).abs() < 1e-14, "P_{}({})", degree, x);
            assert!((slope - dp).abs() < 1e-14, "P'_{}({})", degree, x);
        }
    }

    #[test]
    fn test_two_point_rule() {
        let (nodes, weights) = gauss_legendre(2);
        let r = 1.0 / 3.0_f64.sqrt();
        assert!((nodes[0] - r).abs() < 1e-14);
        assert!((nodes[1] + r).abs() < 1e-14);
        assert!((weights[0] - 1.0).abs() < 1e-14);
        assert!((weights[1] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_four_point_rule() {
        // Abramowitz & Stegun 25.4.30
        let (nodes, weights) = gauss_legendre(4);
        assert!((nodes[0] - 0.861136311594053).abs() < 1e-12);
        assert!((nodes[1] - 0.339981043584856).abs() < 1e-12);
        assert!((weights[0] - 0.347854845137454).abs() < 1e-12);
        assert!((weights[1] - 0.652145154862546).abs() < 1e-12);
    }

    #[test]
    fn test_nodes_descending_and_symmetric() {
        for n in [3, 8, 17, 32] {
            let (nodes, weights) = gauss_legendre(n);
            for i in 1..n {
                assert!(nodes[i] < nodes[i - 1], "nodes must descend");
            }
            for i in 0..n / 2 {
                assert!((nodes[i] + nodes[n - 1 - i]).abs() < 1e-13);
                assert!((weights[i] - weights[n - 1 - i]).abs() < 1e-13);
            }
            if n % 2 == 1 {
                assert!(nodes[n / 2].abs() < 1e-13, "odd rule has equator node");
            }
        }
    }

    #[test]
    fn test_weights_sum_to_two() {
        for n in [2, 5, 16, 48] {
            let (_, weights) = gauss_legendre(n);
            let sum: f64 = weights.iter().sum();
            assert!((sum - 2.0).abs() < 1e-13, "n={}: sum={}", n, sum);
        }
    }

    #[test]
    fn test_quadrature_exactness() {
        // n-point Gauss rule is exact for polynomials of degree 2n-1
        let n = 6;
        let (nodes, weights) = gauss_legendre(n);
        for k in 0..=(2 * n - 1) {
            let exact = if k % 2 == 0 { 2.0 / (k + 1) as f64 } else { 0.0 };
            let numerical: f64 = nodes
                .iter()
                .zip(weights.iter())
                .map(|(&x, &w)| w * x.powi(k as i32))
                .sum();
            assert!(
                (numerical - exact).abs() < 1e-13,
                "degree {}: expected {}, got {}",
                k,
                exact,
                numerical
            );
        }
    }
}
