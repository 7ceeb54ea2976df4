//! Pearson correlation and its two-sided significance, used by the STRAND
//! aligner (C4) to score how well source/target chunk lengths track each
//! other. Mirrors `scipy.stats.pearsonr`, which `strand.py` calls directly;
//! nothing in this workspace's dependency pack provides that, so the
//! regularized incomplete beta function behind the p-value is implemented
//! here rather than pulled in as a new dependency for one formula.

/// Pearson's r and its two-sided p-value over paired samples.
///
/// Guards against degenerate input (fewer than two pairs, or zero variance
/// on either side) by reporting `(0.0, 0.0)` instead of `NaN`.
pub fn pearson_with_p(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return (0.0, 0.0);
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return (0.0, 0.0);
    }

    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);

    let df = (n - 2) as f64;
    if df <= 0.0 || r.abs() >= 1.0 {
        return (r, 0.0);
    }

    let t_squared = r * r * df / (1.0 - r * r);
    let x = df / (df + t_squared);
    let p = regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0);
    (r, p)
}

fn ln_gamma(x: f64) -> f64 {
    // Lanczos approximation, g=7, n=9 coefficients.
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_312e-7,
    ];

    if x < 0.5 {
        (std::f64::consts::PI / (std::f64::consts::PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let t = x + G + 0.5;
        let mut a = COEFFICIENTS[0];
        for (i, c) in COEFFICIENTS.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
    }
}

fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Continued-fraction expansion for the incomplete beta function (Numerical
/// Recipes §6.4, Lentz's method).
fn betacf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FP_MIN: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FP_MIN {
        d = FP_MIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        let aa = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FP_MIN {
            d = FP_MIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FP_MIN {
            c = FP_MIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FP_MIN {
            d = FP_MIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FP_MIN {
            c = FP_MIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Regularized incomplete beta function `I_x(a, b)`.
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_prefix = -ln_beta(a, b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_prefix.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * betacf(a, b, x) / a
    } else {
        1.0 - front * betacf(b, a, 1.0 - x) / b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_positive_correlation() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let (r, p) = pearson_with_p(&xs, &ys);
        assert!((r - 1.0).abs() < 1e-9);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn perfect_negative_correlation() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![8.0, 6.0, 4.0, 2.0];
        let (r, _) = pearson_with_p(&xs, &ys);
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_is_safe() {
        let xs = vec![3.0, 3.0, 3.0];
        let ys = vec![1.0, 2.0, 3.0];
        let (r, p) = pearson_with_p(&xs, &ys);
        assert_eq!(r, 0.0);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn too_few_samples_is_safe() {
        let (r, p) = pearson_with_p(&[1.0], &[2.0]);
        assert_eq!((r, p), (0.0, 0.0));
    }

    #[test]
    fn weak_correlation_has_large_p_value() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        let (r, p) = pearson_with_p(&xs, &ys);
        assert!(r.abs() < 1.0);
        assert!(p > 0.0 && p <= 1.0);
    }
}
