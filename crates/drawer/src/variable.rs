use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CdfError;

/// Kind of random variable the sample was drawn from.
///
/// Picks the reduction run by [`crate::CdfDrawer`]; fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Discrete,
    Continuous,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Discrete => "discrete",
            VariableType::Continuous => "continuous",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = CdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discrete" => Ok(VariableType::Discrete),
            "continuous" => Ok(VariableType::Continuous),
            _ => Err(CdfError::InvalidVariableType(s.to_string())),
        }
    }
}
