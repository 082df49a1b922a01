//! Plot configuration.
//!
//! Everything here is passed to the renderer as given; only the x-range has
//! a computed `Auto` form.

use std::path::{Path, PathBuf};

use cdf_utils::dpi::{Dpi, Inch, Point};
use serde::{Deserialize, Serialize};

use crate::error::{CdfError, Result};

pub const DEFAULT_OUTPUT: &str = "cdf.jpg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XRange {
    /// Left bound 0 when all x are positive, else the smallest x; right bound
    /// the largest x.
    #[default]
    Auto,
    Fixed(f64, f64),
}

impl XRange {
    pub fn resolve(&self, bounds: (f64, f64)) -> (f64, f64) {
        match *self {
            XRange::Fixed(min, max) => (min, max),
            XRange::Auto => {
                let (first, last) = bounds;
                let start = if first > 0.0 { 0.0 } else { first };
                (start, last)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub x_label: String,
    pub y_label: String,
    /// Any color gnuplot understands: a name or `#rrggbb`.
    pub line_color: String,
    /// `-`, `--`, `:`, `-.` or a gnuplot dash name.
    pub line_style: String,
    pub line_width: f64,
    pub x_range: XRange,
    pub y_range: (f64, f64),
    pub title: Option<String>,
    /// Legend entry; no legend is drawn without one.
    pub label: Option<String>,
    /// Format follows the extension.
    pub output: PathBuf,
    pub size: Point<Inch>,
    pub dpi: Dpi,
    /// Also write the gnuplot script next to the image.
    pub save_script: bool,
    /// Also write the curve as tab separated `x\ty` lines.
    pub save_data: bool,
    /// Convert `.eps` output to `.png` with Ghostscript when it is installed.
    pub gs: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            x_label: String::new(),
            y_label: String::new(),
            line_color: "blue".to_string(),
            line_style: "-".to_string(),
            line_width: 1.5,
            x_range: XRange::Auto,
            y_range: (0.0, 1.0),
            title: None,
            label: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            size: Point::new(4.0, 4.0),
            dpi: 100.0,
            save_script: false,
            save_data: false,
            gs: false,
        }
    }
}

impl PlotConfig {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: PlotConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = std::fs::read_to_string(p)?;
        Self::from_json_str(&s)
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_line(mut self, color: impl Into<String>, style: impl Into<String>) -> Self {
        self.line_color = color.into();
        self.line_style = style.into();
        self
    }

    pub fn with_x_range(mut self, x_range: XRange) -> Self {
        self.x_range = x_range;
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = (min, max);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, output: P) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    /// Only rejects what would make the figure impossible to draw.
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi > 0.0) || !(self.size.x > 0.0) || !(self.size.y > 0.0) {
            return Err(CdfError::InvalidConfig(format!(
                "figure size {}x{} in at {} dpi",
                self.size.x, self.size.y, self.dpi
            )));
        }
        if !(self.line_width > 0.0) {
            return Err(CdfError::InvalidConfig(format!(
                "line width {}",
                self.line_width
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(CdfError::InvalidPath(self.output.clone()));
        }
        Ok(())
    }
}
