//! Empirical CDF plots of small in-memory samples.
//!
//! ```no_run
//! use cdf_drawer::{CdfDrawer, PlotConfig, VariableType, Weighting};
//!
//! let drawer = CdfDrawer::new(VariableType::Discrete);
//! let config = PlotConfig::new("cdf.png").with_labels("score", "probability");
//! let curve = drawer.draw(&[1, 1, 2, 3, 3, 3], &Weighting::uniform(), &config)?;
//! assert_eq!(curve.xs(), &[1.0, 2.0, 3.0]);
//! # Ok::<(), cdf_drawer::CdfError>(())
//! ```

pub mod config;
pub mod curve;
pub mod density;
pub mod drawer;
pub mod error;
pub mod reduce;
pub mod render;
pub mod variable;

pub use config::{PlotConfig, XRange};
pub use curve::{build_curve, Curve};
pub use density::{DensityFn, DensityParams, ExponentialDensity, NormalDensity, UniformDensity};
pub use drawer::CdfDrawer;
pub use error::{CdfError, Result};
pub use reduce::{reduce_continuous, reduce_discrete, Reduction, Weighting};
pub use render::{GnuplotRenderer, PlotRenderer};
pub use variable::VariableType;
