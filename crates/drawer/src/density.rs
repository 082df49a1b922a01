//! Density functions for continuous samples.
//!
//! A density is anything that maps a value and a [`DensityParams`] map to a
//! probability density. Closures of the shape `Fn(f64, &DensityParams) -> f64`
//! qualify directly; [`NormalDensity`], [`ExponentialDensity`] and
//! [`UniformDensity`] wrap the `statrs` distributions.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Exp, Normal, Uniform};

use crate::error::{CdfError, Result};

/// Named numeric parameters handed to a density function on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityParams(HashMap<String, f64>);

impl DensityParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }
}

impl FromIterator<(String, f64)> for DensityParams {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub trait DensityFn {
    fn density(&self, x: f64, params: &DensityParams) -> f64;
}

impl<F> DensityFn for F
where
    F: Fn(f64, &DensityParams) -> f64,
{
    fn density(&self, x: f64, params: &DensityParams) -> f64 {
        self(x, params)
    }
}

fn invalid<E: std::fmt::Display>(name: &str) -> impl FnOnce(E) -> CdfError + '_ {
    move |e| CdfError::InvalidConfig(format!("{} density: {}", name, e))
}

/// Gaussian density; params `mean` (0) and `std_dev` (1).
#[derive(Debug, Clone, Copy)]
pub struct NormalDensity(Normal);

impl NormalDensity {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        Normal::new(mean, std_dev)
            .map(Self)
            .map_err(invalid("normal"))
    }

    pub fn from_params(params: &DensityParams) -> Result<Self> {
        Self::new(params.get_or("mean", 0.0), params.get_or("std_dev", 1.0))
    }
}

impl DensityFn for NormalDensity {
    fn density(&self, x: f64, _params: &DensityParams) -> f64 {
        self.0.pdf(x)
    }
}

/// Exponential density; param `rate` (1).
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDensity(Exp);

impl ExponentialDensity {
    pub fn new(rate: f64) -> Result<Self> {
        Exp::new(rate).map(Self).map_err(invalid("exponential"))
    }

    pub fn from_params(params: &DensityParams) -> Result<Self> {
        Self::new(params.get_or("rate", 1.0))
    }
}

impl DensityFn for ExponentialDensity {
    fn density(&self, x: f64, _params: &DensityParams) -> f64 {
        self.0.pdf(x)
    }
}

/// Flat density on `[low, high]`; params `low` (0) and `high` (1).
#[derive(Debug, Clone, Copy)]
pub struct UniformDensity(Uniform);

impl UniformDensity {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        Uniform::new(low, high).map(Self).map_err(invalid("uniform"))
    }

    pub fn from_params(params: &DensityParams) -> Result<Self> {
        Self::new(params.get_or("low", 0.0), params.get_or("high", 1.0))
    }
}

impl DensityFn for UniformDensity {
    fn density(&self, x: f64, _params: &DensityParams) -> f64 {
        self.0.pdf(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn closures_receive_params() {
        let scaled = |x: f64, p: &DensityParams| x * p.get_or("scale", 1.0);
        let params = DensityParams::new().with("scale", 3.0);
        assert!((scaled.density(2.0, &params) - 6.0).abs() < EPS);
        assert!((scaled.density(2.0, &DensityParams::new()) - 2.0).abs() < EPS);
    }

    #[test]
    fn standard_normal_peak() {
        let normal = NormalDensity::from_params(&DensityParams::new()).unwrap();
        let peak = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!((normal.density(0.0, &DensityParams::new()) - peak).abs() < 1e-9);
    }

    #[test]
    fn exponential_uses_rate() {
        let params = DensityParams::new().with("rate", 2.0);
        let exp = ExponentialDensity::from_params(&params).unwrap();
        assert!((exp.density(0.0, &params) - 2.0).abs() < 1e-9);
        assert!((exp.density(1.0, &params) - 2.0 * (-2.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn uniform_is_flat_inside_support() {
        let uniform = UniformDensity::new(0.0, 4.0).unwrap();
        let params = DensityParams::new();
        assert!((uniform.density(1.0, &params) - 0.25).abs() < EPS);
        assert!((uniform.density(3.5, &params) - 0.25).abs() < EPS);
        assert_eq!(uniform.density(5.0, &params), 0.0);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = NormalDensity::new(0.0, -1.0).unwrap_err();
        assert!(matches!(err, CdfError::InvalidConfig(_)));
        assert!(ExponentialDensity::new(0.0).is_err());
        assert!(UniformDensity::new(2.0, 1.0).is_err());
    }

    #[test]
    fn params_deserialize_from_a_json_object() {
        let params: DensityParams = serde_json::from_str(r#"{"mean": 1.5}"#).unwrap();
        assert_eq!(params.get("mean"), Some(1.5));
        assert_eq!(params.get("std_dev"), None);
    }
}
