//! Error types for the CDF pipeline.
//!
//! Two families reach the caller:
//! - configuration errors (bad variable type, misaligned override, bad sample)
//! - I/O and rendering errors raised while the figure is written

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdfError>;

#[derive(Error, Debug)]
pub enum CdfError {
    /// Variable type tag other than `discrete` / `continuous`
    #[error("invalid input of variance type: {0:?}")]
    InvalidVariableType(String),

    /// Distribution override not aligned with the unique sample values
    #[error("distribution override has {actual} entries but the sample has {expected} unique values")]
    MisalignedDistribution { expected: usize, actual: usize },

    #[error("sample is empty")]
    EmptySample,

    #[error("sample contains a non-finite value at index {index}")]
    NonFiniteSample { index: usize },

    /// Curve inputs of different lengths
    #[error("{xs} x values but {ys} weights")]
    LengthMismatch { xs: usize, ys: usize },

    /// Output extension with no matching gnuplot terminal
    #[error("unsupported output format {extension:?} for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("invalid line style {0:?}")]
    InvalidLineStyle(String),

    /// Output path not representable as UTF-8, which gnuplot needs
    #[error("invalid output path: {0}")]
    InvalidPath(PathBuf),

    #[error("invalid plot configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rendering failed: {0}")]
    Render(String),
}

impl CdfError {
    /// True for errors caused by the caller's inputs rather than the environment.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, CdfError::Io(_) | CdfError::Render(_))
    }
}

impl From<serde_json::Error> for CdfError {
    fn from(e: serde_json::Error) -> Self {
        CdfError::InvalidConfig(e.to_string())
    }
}
