//! Chebyshev polynomial evaluation (Clenshaw's recurrence).
//!
//! SPK Type 2/3 segments store position (and optionally velocity) as
//! Chebyshev series coefficients on a normalised time argument `s` in
//! `[-1, 1]`. Evaluating the series directly via the recurrence avoids
//! building the `T_n(s)` basis explicitly.

/// Evaluate a Chebyshev series `sum_k coeffs[k] * T_k(s)` at `s` via
/// Clenshaw's recurrence.
///
/// `coeffs[0]` is the T_0 (constant) coefficient, `coeffs[1]` is T_1, etc.
pub fn clenshaw(coeffs: &[f64], s: f64) -> f64 {
    let n = coeffs.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return coeffs[0];
    }

    let two_s = 2.0 * s;
    let mut b_k1 = 0.0; // b_{k+1}
    let mut b_k2 = 0.0; // b_{k+2}

    for &c in coeffs.iter().skip(1).rev() {
        let b_k = c + two_s * b_k1 - b_k2;
        b_k2 = b_k1;
        b_k1 = b_k;
    }

    coeffs[0] + s * b_k1 - b_k2
}

/// Evaluate the derivative (with respect to `s`) of the Chebyshev series
/// at `s`, using the derivative recurrence `T_k'(s)`.
///
/// Note: the caller is responsible for dividing by `radius` to convert
/// d/ds into d/dt, since `s = (t - mid) / radius`.
pub fn clenshaw_derivative(coeffs: &[f64], s: f64) -> f64 {
    let n = coeffs.len();
    if n < 2 {
        return 0.0;
    }

    // d/ds T_k(s) = k * U_{k-1}(s), where U is the Chebyshev polynomial of
    // the second kind. Evaluate via the standard derivative coefficient
    // recurrence instead of building U explicitly:
    //
    //   d'_{n-1} = 0
    //   d'_{n-2} = 2(n-1) c_{n-1}
    //   d'_{k}   = d'_{k+2} + 2(k+1) c_{k+1}   for k = n-3 down to 0
    //
    // then the derivative series is sum_k d'_k T_k(s), but the k=0 term
    // must be halved per the standard Chebyshev derivative formula.
    let mut d = vec![0.0f64; n];
    if n >= 2 {
        d[n - 2] = 2.0 * (n as f64 - 1.0) * coeffs[n - 1];
    }
    for k in (0..n.saturating_sub(2)).rev() {
        d[k] = d[k + 2] + 2.0 * (k as f64 + 1.0) * coeffs[k + 1];
    }
    d[0] *= 0.5;

    clenshaw(&d, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clenshaw_constant() {
        assert_eq!(clenshaw(&[3.0], 0.5), 3.0);
    }

    #[test]
    fn clenshaw_matches_direct_sum() {
        // T_0=1, T_1=s, T_2=2s^2-1, T_3=4s^3-3s
        let coeffs = [1.0, 2.0, 3.0, 4.0];
        let s = 0.37;
        let t0 = 1.0;
        let t1 = s;
        let t2 = 2.0 * s * s - 1.0;
        let t3 = 4.0 * s * s * s - 3.0 * s;
        let expected = coeffs[0] * t0 + coeffs[1] * t1 + coeffs[2] * t2 + coeffs[3] * t3;
        assert!((clenshaw(&coeffs, s) - expected).abs() < 1e-12);
    }

    #[test]
    fn clenshaw_derivative_matches_numerical() {
        let coeffs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let s = 0.2;
        let h = 1e-6;
        let numerical = (clenshaw(&coeffs, s + h) - clenshaw(&coeffs, s - h)) / (2.0 * h);
        let analytic = clenshaw_derivative(&coeffs, s);
        assert!(
            (numerical - analytic).abs() < 1e-4,
            "numerical={numerical}, analytic={analytic}"
        );
    }

    #[test]
    fn clenshaw_derivative_of_single_coeff_is_zero() {
        assert_eq!(clenshaw_derivative(&[5.0], 0.3), 0.0);
    }
}
