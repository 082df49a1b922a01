use serde::Serialize;

use crate::error::{CdfError, Result};
use crate::reduce::Reduction;

/// Cumulative curve ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// x stays as given, y is the running sum of `mass`.
pub fn build_curve(values: &[f64], mass: &[f64]) -> Result<Curve> {
    if values.len() != mass.len() {
        return Err(CdfError::LengthMismatch {
            xs: values.len(),
            ys: mass.len(),
        });
    }

    let ys = mass
        .iter()
        .scan(0.0, |acc, &m| {
            *acc += m;
            Some(*acc)
        })
        .collect();

    Ok(Curve {
        xs: values.to_vec(),
        ys,
    })
}

impl Curve {
    pub fn from_reduction(reduction: &Reduction) -> Result<Self> {
        build_curve(&reduction.values, &reduction.mass)
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Final cumulative value, 0 for an empty curve.
    pub fn total(&self) -> f64 {
        self.ys.last().copied().unwrap_or(0.0)
    }

    /// First and last x.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((*self.xs.first()?, *self.xs.last()?))
    }

    /// Step-function value at `x`: y of the last point at or left of `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let idx = self.xs.partition_point(|&v| v <= x);
        if idx == 0 {
            0.0
        } else {
            self.ys[idx - 1]
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}
