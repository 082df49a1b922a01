//! Sample reduction: raw observations to unique values with a probability
//! mass each.

use std::collections::BTreeMap;

use num::ToPrimitive;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::density::{DensityFn, DensityParams};
use crate::error::{CdfError, Result};
use crate::variable::VariableType;

/// Unique sample values (ascending), sample size and mass per unique value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub values: Vec<f64>,
    pub sample_size: usize,
    pub mass: Vec<f64>,
}

impl Reduction {
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }
}

/// Where per-value probabilities come from when they are not uniform.
///
/// `distribution` wins over `density`; with neither, every observation
/// weighs `1/n`. An empty or all-zero `distribution` is still a supplied one.
#[derive(Default, Clone)]
pub struct Weighting<'a> {
    pub distribution: Option<&'a [f64]>,
    pub density: Option<&'a dyn DensityFn>,
    pub params: DensityParams,
}

impl<'a> Weighting<'a> {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn with_distribution(mut self, distribution: &'a [f64]) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_density(mut self, density: &'a dyn DensityFn, params: DensityParams) -> Self {
        self.density = Some(density);
        self.params = params;
        self
    }
}

impl std::fmt::Debug for Weighting<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Weighting")
            .field("distribution", &self.distribution)
            .field("density", &self.density.map(|_| "<fn>"))
            .field("params", &self.params)
            .finish()
    }
}

/// Converts any primitive numeric sample to `f64`.
pub fn sample_to_f64<T: ToPrimitive>(sample: &[T]) -> Result<Vec<f64>> {
    sample
        .iter()
        .enumerate()
        .map(|(index, v)| v.to_f64().ok_or(CdfError::NonFiniteSample { index }))
        .collect()
}

/// Sorted unique values with their occurrence counts. Works on its own
/// ordered copy, `sample` is left as is.
fn tally(sample: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
    if sample.is_empty() {
        return Err(CdfError::EmptySample);
    }

    let mut counts: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for (index, &v) in sample.iter().enumerate() {
        if !v.is_finite() {
            return Err(CdfError::NonFiniteSample { index });
        }
        *counts.entry(OrderedFloat(v)).or_insert(0) += 1;
    }

    Ok(counts.into_iter().map(|(v, c)| (v.into_inner(), c)).unzip())
}

fn check_alignment(distribution: &[f64], unique: usize) -> Result<()> {
    if distribution.len() != unique {
        return Err(CdfError::MisalignedDistribution {
            expected: unique,
            actual: distribution.len(),
        });
    }
    Ok(())
}

fn scaled_by_count(base: impl Iterator<Item = f64>, counts: &[usize]) -> Vec<f64> {
    base.zip(counts).map(|(p, &c)| p * c as f64).collect()
}

pub fn reduce_discrete(sample: &[f64], distribution: Option<&[f64]>) -> Result<Reduction> {
    let (values, counts) = tally(sample)?;
    let n = sample.len();

    let mass = match distribution {
        Some(distribution) => {
            check_alignment(distribution, values.len())?;
            scaled_by_count(distribution.iter().copied(), &counts)
        }
        None => scaled_by_count(std::iter::repeat(1.0 / n as f64), &counts),
    };

    debug!(n, unique = values.len(), "reduced discrete sample");
    Ok(Reduction {
        values,
        sample_size: n,
        mass,
    })
}

pub fn reduce_continuous(
    sample: &[f64],
    distribution: Option<&[f64]>,
    density: Option<&dyn DensityFn>,
    params: &DensityParams,
) -> Result<Reduction> {
    let (values, counts) = tally(sample)?;
    let n = sample.len();

    let mass = match (distribution, density) {
        (Some(distribution), _) => {
            check_alignment(distribution, values.len())?;
            scaled_by_count(distribution.iter().copied(), &counts)
        }
        (None, Some(density)) => {
            let mut base = Vec::with_capacity(values.len());
            for &x in &values {
                let p = density.density(x, params);
                if !p.is_finite() {
                    return Err(CdfError::InvalidConfig(format!(
                        "density function returned {} at {}",
                        p, x
                    )));
                }
                base.push(p);
            }
            scaled_by_count(base.into_iter(), &counts)
        }
        // Frequencies stand in for density; only meaningful on evenly spaced supports.
        (None, None) => scaled_by_count(std::iter::repeat(1.0 / n as f64), &counts),
    };

    debug!(
        n,
        unique = values.len(),
        distribution = distribution.is_some(),
        density = density.is_some(),
        "reduced continuous sample"
    );
    Ok(Reduction {
        values,
        sample_size: n,
        mass,
    })
}

impl VariableType {
    /// Runs the reduction belonging to this variable type.
    pub fn reduce(&self, sample: &[f64], weighting: &Weighting<'_>) -> Result<Reduction> {
        match self {
            VariableType::Discrete => {
                if weighting.density.is_some() {
                    warn!("density function ignored for a discrete variable");
                }
                reduce_discrete(sample, weighting.distribution)
            }
            VariableType::Continuous => reduce_continuous(
                sample,
                weighting.distribution,
                weighting.density,
                &weighting.params,
            ),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn sample(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        // Small integer grid so repeats actually occur.
        proptest::collection::vec((-50i32..50).prop_map(|v| v as f64 / 4.0), 1..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn uniform_mass_sums_to_one(data in sample(200)) {
            let r = reduce_discrete(&data, None).unwrap();
            prop_assert!((r.total_mass() - 1.0).abs() < 1e-9);
            prop_assert!(r.mass.iter().all(|&m| m >= 0.0));
        }

        #[test]
        fn values_are_strictly_ascending(data in sample(200)) {
            let r = reduce_continuous(&data, None, None, &DensityParams::new()).unwrap();
            prop_assert!(r.values.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(r.values.len(), r.mass.len());
            prop_assert_eq!(r.sample_size, data.len());
        }

        #[test]
        fn reduction_is_idempotent(data in sample(100)) {
            let first = reduce_discrete(&data, None).unwrap();
            let second = reduce_discrete(&data, None).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
