//! Least-squares polynomial fitting.
//!
//! [`polyfit`] never fails loudly: a fit that cannot be computed is reported as
//! [`PolyFit::Degenerate`] with the reason, and the caller decides how to recover.

use crate::numeric::fit_warnings_enabled;
use nalgebra::{DMatrix, DVector};

/// Condition number past which a fit is reported as poorly conditioned.
const POOR_CONDITION: f64 = 1e10;

/// Polynomial with coefficients in ascending power order (`c0 + c1*x + c2*x^2 + ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Degenerate {
    #[error("x has {xs} values but y has {ys}")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("{points} points cannot determine {required} coefficients")]
    TooFewPoints { points: usize, required: usize },

    #[error("input contains non-finite values")]
    NonFinite,

    #[error("design matrix has rank {rank}; {required} coefficients requested")]
    Singular { rank: usize, required: usize },

    #[error("least-squares solve did not produce finite coefficients")]
    NoSolution,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolyFit {
    Fitted(Polynomial),
    Degenerate(Degenerate),
}

impl PolyFit {
    pub fn fitted(self) -> Option<Polynomial> {
        match self {
            Self::Fitted(p) => Some(p),
            Self::Degenerate(_) => None,
        }
    }
}

/// Fits a polynomial of `degree` to `(xs, ys)` by least squares.
///
/// Vandermonde columns are scaled to unit norm before the SVD solve, and singular values below
/// `n * f64::EPSILON` (relative) count as rank loss. A rank-deficient system is degenerate rather
/// than silently regularized. Poorly conditioned (but full-rank) fits are reported through
/// `tracing` unless a [`QuietFitWarnings`](crate::QuietFitWarnings) guard is active.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> PolyFit {
    let n = xs.len();
    let k = degree + 1;
    if ys.len() != n {
        return PolyFit::Degenerate(Degenerate::LengthMismatch { xs: n, ys: ys.len() });
    }
    if n < k {
        return PolyFit::Degenerate(Degenerate::TooFewPoints {
            points: n,
            required: k,
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return PolyFit::Degenerate(Degenerate::NonFinite);
    }

    let mut a = DMatrix::<f64>::zeros(n, k);
    for (i, &x) in xs.iter().enumerate() {
        let mut p = 1.0;
        for j in 0..k {
            a[(i, j)] = p;
            p *= x;
        }
    }

    let mut scale = vec![1.0; k];
    for (j, s) in scale.iter_mut().enumerate() {
        let norm = a.column(j).norm();
        if norm > 0.0 && norm.is_finite() {
            *s = norm;
            a.column_mut(j).unscale_mut(norm);
        }
    }

    let b = DVector::from_column_slice(ys);
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    let rcond = (n as f64) * f64::EPSILON;
    let rank = svd
        .singular_values
        .iter()
        .filter(|&&s| s > rcond * max_sv)
        .count();
    if rank < k {
        return PolyFit::Degenerate(Degenerate::Singular { rank, required: k });
    }

    let min_sv = svd.singular_values.min();
    if max_sv / min_sv > POOR_CONDITION && fit_warnings_enabled() {
        tracing::warn!(
            degree,
            condition = max_sv / min_sv,
            "polyfit may be poorly conditioned"
        );
    }

    let Ok(solution) = svd.solve(&b, rcond * max_sv) else {
        return PolyFit::Degenerate(Degenerate::NoSolution);
    };
    let coefficients: Vec<f64> = solution
        .iter()
        .zip(&scale)
        .map(|(c, s)| c / s)
        .collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return PolyFit::Degenerate(Degenerate::NoSolution);
    }
    PolyFit::Fitted(Polynomial::new(coefficients))
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / ((n - 1) as f64);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * (i as f64)).collect();
            out[n - 1] = stop;
            out
        }
    }
}
