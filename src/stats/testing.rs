//! Two-sample and paired hypothesis tests.
//!
//! The t-tests support both the classic pooled-variance form and Welch's
//! unequal-variance form with the Welch-Satterthwaite degrees of freedom.
//! The Mann-Whitney U test uses the tie-corrected normal approximation with
//! continuity correction, which is the standard large-sample treatment.
//!
//! # References
//!
//! - Welch, B.L. (1947). The generalization of "Student's" problem when
//!   several different population variances are involved. *Biometrika*,
//!   34(1-2), 28-35.
//! - Mann, H.B. & Whitney, D.R. (1947). On a test of whether one of two
//!   random variables is stochastically larger than the other.
//!   *Annals of Mathematical Statistics*, 18(1), 50-60.

use crate::core::{average_ranks, tie_group_sizes, StatisticalError};
use crate::stats::descriptive::{mean, sample_variance};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// The group means (or distributions) differ in either direction.
    #[default]
    TwoSided,
    /// The first group is smaller than the second.
    Less,
    /// The first group is larger than the second.
    Greater,
}

/// Immutable result of a single test invocation.
#[derive(Debug, Clone, Serialize)]
pub struct HypothesisTestResult {
    /// Which test produced this result.
    pub test_name: String,
    /// Test statistic (t for t-tests, U for Mann-Whitney).
    pub statistic: f64,
    /// p-value under the requested alternative.
    pub p_value: f64,
    /// Cohen's d for t-tests, rank-biserial correlation for Mann-Whitney.
    pub effect_size: f64,
    /// Plain-language reading of the result at α = 0.05.
    pub conclusion: String,
}

const SIGNIFICANCE_ALPHA: f64 = 0.05;

fn conclude(p_value: f64) -> String {
    if p_value < SIGNIFICANCE_ALPHA {
        format!("significant at α = {SIGNIFICANCE_ALPHA} (p = {p_value:.4})")
    } else {
        format!("not significant at α = {SIGNIFICANCE_ALPHA} (p = {p_value:.4})")
    }
}

/// Two-sided/one-sided p-value from a t statistic and degrees of freedom.
fn t_p_value(t: f64, df: f64, alternative: Alternative) -> f64 {
    let dist = StudentsT::new(0.0, 1.0, df).ok();
    dist.map_or(f64::NAN, |d| match alternative {
        Alternative::TwoSided => 2.0 * (1.0 - d.cdf(t.abs())),
        Alternative::Less => d.cdf(t),
        Alternative::Greater => 1.0 - d.cdf(t),
    })
}

/// Independent two-sample t-test.
///
/// `equal_var = true` uses the pooled-variance Student form;
/// `equal_var = false` uses Welch's form. Fails with
/// [`StatisticalError::GroupTooSmall`] unless both groups have at least two
/// observations.
///
/// Effect size is Cohen's d, computed from the pooled standard deviation
/// (or `√((s₁²+s₂²)/2)` in the Welch case).
pub fn t_test(
    group_a: &[f64],
    group_b: &[f64],
    alternative: Alternative,
    equal_var: bool,
) -> Result<HypothesisTestResult, StatisticalError> {
    let (n1, n2) = (group_a.len(), group_b.len());
    if n1 < 2 || n2 < 2 {
        return Err(StatisticalError::GroupTooSmall {
            needed: 2,
            got_a: n1,
            got_b: n2,
        });
    }

    let (m1, m2) = (mean(group_a), mean(group_b));
    let (v1, v2) = (sample_variance(group_a, m1), sample_variance(group_b, m2));
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let diff = m1 - m2;

    let (se, df, d_denom) = if equal_var {
        let pooled = ((n1f - 1.0) * v1 + (n2f - 1.0) * v2) / (n1f + n2f - 2.0);
        (
            (pooled * (1.0 / n1f + 1.0 / n2f)).sqrt(),
            n1f + n2f - 2.0,
            pooled.sqrt(),
        )
    } else {
        let se2 = v1 / n1f + v2 / n2f;
        let df = if se2 > 0.0 {
            se2 * se2
                / ((v1 / n1f).powi(2) / (n1f - 1.0) + (v2 / n2f).powi(2) / (n2f - 1.0))
        } else {
            n1f + n2f - 2.0
        };
        (se2.sqrt(), df, ((v1 + v2) / 2.0).sqrt())
    };

    // Zero pooled variance: identical constants in both groups. The statistic
    // is 0 when the means agree and unbounded otherwise.
    let t = if se > 0.0 {
        diff / se
    } else if diff == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(diff)
    };

    let p_value = if t.is_infinite() {
        match alternative {
            Alternative::TwoSided => 0.0,
            Alternative::Less => {
                if t < 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Alternative::Greater => {
                if t > 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    } else {
        t_p_value(t, df, alternative)
    };

    let effect_size = if d_denom > 0.0 { diff / d_denom } else { 0.0 };

    Ok(HypothesisTestResult {
        test_name: if equal_var {
            "independent t-test (pooled)".to_string()
        } else {
            "independent t-test (Welch)".to_string()
        },
        statistic: t,
        p_value,
        effect_size,
        conclusion: conclude(p_value),
    })
}

/// Paired t-test on before/after measurements.
///
/// Fails with [`StatisticalError::LengthMismatch`] when the series differ in
/// length, and [`StatisticalError::GroupTooSmall`] for fewer than two pairs.
pub fn paired_t_test(
    before: &[f64],
    after: &[f64],
    alternative: Alternative,
) -> Result<HypothesisTestResult, StatisticalError> {
    if before.len() != after.len() {
        return Err(StatisticalError::LengthMismatch {
            left: before.len(),
            right: after.len(),
        });
    }
    let n = before.len();
    if n < 2 {
        return Err(StatisticalError::GroupTooSmall {
            needed: 2,
            got_a: n,
            got_b: n,
        });
    }

    let diffs: Vec<f64> = before.iter().zip(after).map(|(&b, &a)| b - a).collect();
    let m = mean(&diffs);
    let sd = sample_variance(&diffs, m).sqrt();
    let nf = n as f64;

    let t = if sd > 0.0 {
        m / (sd / nf.sqrt())
    } else if m == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(m)
    };

    let p_value = if t.is_infinite() {
        0.0
    } else {
        t_p_value(t, nf - 1.0, alternative)
    };
    let effect_size = if sd > 0.0 { m / sd } else { 0.0 };

    Ok(HypothesisTestResult {
        test_name: "paired t-test".to_string(),
        statistic: t,
        p_value,
        effect_size,
        conclusion: conclude(p_value),
    })
}

/// Mann-Whitney U rank-sum test.
///
/// Non-parametric alternative to the t-test for when the normality
/// assumption is violated. The statistic is U for the first group; the
/// p-value comes from the tie-corrected normal approximation with
/// continuity correction. Effect size is the rank-biserial correlation
/// `2U₁/(n₁n₂) − 1`, signed like Cohen's d: negative when the first group
/// tends below the second.
pub fn mann_whitney(
    group_a: &[f64],
    group_b: &[f64],
    alternative: Alternative,
) -> Result<HypothesisTestResult, StatisticalError> {
    let (n1, n2) = (group_a.len(), group_b.len());
    if n1 < 2 || n2 < 2 {
        return Err(StatisticalError::GroupTooSmall {
            needed: 2,
            got_a: n1,
            got_b: n2,
        });
    }

    let mut combined = Vec::with_capacity(n1 + n2);
    combined.extend_from_slice(group_a);
    combined.extend_from_slice(group_b);
    let ranks = average_ranks(&combined);

    let r1: f64 = ranks[..n1].iter().sum();
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let nf = n1f + n2f;
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;

    let mean_u = n1f * n2f / 2.0;
    let tie_term: f64 = tie_group_sizes(&combined)
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let var_u = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    if var_u <= 0.0 {
        return Err(StatisticalError::ZeroVariance);
    }
    let sd_u = var_u.sqrt();

    let normal = Normal::new(0.0, 1.0).ok();
    let p_value = normal.map_or(f64::NAN, |norm| match alternative {
        Alternative::TwoSided => {
            let z = ((u1 - mean_u).abs() - 0.5).max(0.0) / sd_u;
            (2.0 * (1.0 - norm.cdf(z))).min(1.0)
        }
        Alternative::Less => norm.cdf((u1 - mean_u + 0.5) / sd_u),
        Alternative::Greater => 1.0 - norm.cdf((u1 - mean_u - 0.5) / sd_u),
    });

    let effect_size = 2.0 * u1 / (n1f * n2f) - 1.0;

    Ok(HypothesisTestResult {
        test_name: "Mann-Whitney U test".to_string(),
        statistic: u1,
        p_value,
        effect_size,
        conclusion: conclude(p_value),
    })
}
