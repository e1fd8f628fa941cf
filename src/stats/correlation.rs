//! Correlation analysis: Pearson, Spearman, and Kendall.
//!
//! Pearson p-values come from the exact t transform of the coefficient;
//! Spearman reuses the same transform on midranks, which is the usual
//! large-sample approximation; Kendall uses tau-b with the tie-corrected
//! normal approximation.
//!
//! Qualitative interpretation buckets are fixed at |r| < 0.3 "weak",
//! 0.3 ≤ |r| < 0.7 "moderate", and |r| ≥ 0.7 "strong".
//!
//! # References
//!
//! - Kendall, M.G. (1945). The treatment of ties in ranking problems.
//!   *Biometrika*, 33(3), 239-251.

use crate::core::{average_ranks, tie_group_sizes, StatisticalError};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Which correlation coefficient to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationMethod {
    /// Linear correlation of the raw values.
    #[default]
    Pearson,
    /// Pearson correlation of the midranks; robust to monotone
    /// transformations.
    Spearman,
    /// Kendall's tau-b, tie-corrected.
    Kendall,
}

impl CorrelationMethod {
    fn name(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

/// Immutable result of one correlation computation.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    /// The correlation coefficient in [−1, 1].
    pub coefficient: f64,
    /// Two-sided p-value for the null hypothesis of no association.
    /// NaN when the sample is too small for the approximation (n = 2 for
    /// Pearson/Spearman).
    pub p_value: f64,
    /// Method name: "pearson", "spearman", or "kendall".
    pub method: String,
    /// Qualitative strength/direction, e.g. "strong negative correlation".
    pub interpretation: String,
}

/// Correlate two equal-length sequences.
///
/// Fails with [`StatisticalError::LengthMismatch`] when lengths differ,
/// [`StatisticalError::InsufficientData`] for fewer than two pairs, and
/// [`StatisticalError::ZeroVariance`] when either input is constant.
pub fn correlate(
    x: &[f64],
    y: &[f64],
    method: CorrelationMethod,
) -> Result<CorrelationResult, StatisticalError> {
    if x.len() != y.len() {
        return Err(StatisticalError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(StatisticalError::InsufficientData { needed: 2, got: n });
    }

    let (coefficient, p_value) = match method {
        CorrelationMethod::Pearson => pearson_with_p(x, y)?,
        CorrelationMethod::Spearman => {
            let rx = average_ranks(x);
            let ry = average_ranks(y);
            pearson_with_p(&rx, &ry)?
        }
        CorrelationMethod::Kendall => kendall_tau_b(x, y)?,
    };

    Ok(CorrelationResult {
        coefficient,
        p_value,
        method: method.name().to_string(),
        interpretation: interpret(coefficient),
    })
}

/// Bucket |r| into weak/moderate/strong with a direction prefix.
fn interpret(r: f64) -> String {
    let strength = match r.abs() {
        a if a >= 0.7 => "strong",
        a if a >= 0.3 => "moderate",
        _ => "weak",
    };
    if r == 0.0 {
        return "no correlation".to_string();
    }
    let direction = if r > 0.0 { "positive" } else { "negative" };
    format!("{strength} {direction} correlation")
}

fn pearson_with_p(x: &[f64], y: &[f64]) -> Result<(f64, f64), StatisticalError> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return Err(StatisticalError::ZeroVariance);
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let df = n - 2.0;
    let p = if df <= 0.0 {
        f64::NAN
    } else if r.abs() >= 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        StudentsT::new(0.0, 1.0, df)
            .ok()
            .map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t.abs())))
    };

    Ok((r, p))
}

/// Kendall's tau-b with tie corrections and normal-approximation p-value.
fn kendall_tau_b(x: &[f64], y: &[f64]) -> Result<(f64, f64), StatisticalError> {
    let n = x.len();
    let nf = n as f64;

    let mut concordant_minus_discordant = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let sx = (x[i] - x[j]).signum();
            let sy = (y[i] - y[j]).signum();
            concordant_minus_discordant += sx * sy;
        }
    }

    let x_ties = tie_group_sizes(x);
    let y_ties = tie_group_sizes(y);
    let pair_ties = |groups: &[usize]| -> f64 {
        groups.iter().map(|&t| (t * (t - 1)) as f64 / 2.0).sum()
    };

    let n0 = nf * (nf - 1.0) / 2.0;
    let n1 = pair_ties(&x_ties);
    let n2 = pair_ties(&y_ties);
    let denom = ((n0 - n1) * (n0 - n2)).sqrt();
    if denom <= 0.0 {
        return Err(StatisticalError::ZeroVariance);
    }
    let tau = (concordant_minus_discordant / denom).clamp(-1.0, 1.0);

    // Tie-corrected variance of (C − D), per Kendall (1945).
    let sum_t = |groups: &[usize], f: fn(f64) -> f64| -> f64 {
        groups.iter().map(|&t| f(t as f64)).sum()
    };
    let v0 = nf * (nf - 1.0) * (2.0 * nf + 5.0);
    let vt = sum_t(&x_ties, |t| t * (t - 1.0) * (2.0 * t + 5.0));
    let vu = sum_t(&y_ties, |t| t * (t - 1.0) * (2.0 * t + 5.0));
    let v1 = sum_t(&x_ties, |t| t * (t - 1.0)) * sum_t(&y_ties, |t| t * (t - 1.0))
        / (2.0 * nf * (nf - 1.0));
    let v2 = if n >= 3 {
        sum_t(&x_ties, |t| t * (t - 1.0) * (t - 2.0))
            * sum_t(&y_ties, |t| t * (t - 1.0) * (t - 2.0))
            / (9.0 * nf * (nf - 1.0) * (nf - 2.0))
    } else {
        0.0
    };
    let var = (v0 - vt - vu) / 18.0 + v1 + v2;

    let p = if var <= 0.0 {
        f64::NAN
    } else {
        let z = concordant_minus_discordant / var.sqrt();
        Normal::new(0.0, 1.0)
            .ok()
            .map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(z.abs())))
    };

    Ok((tau, p))
}
