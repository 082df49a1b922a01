//! Rendering seam and the gnuplot-backed renderer.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use cdf_utils::dpi::{pixels_point_from_inch_point, Dpi, Inch, Point};
use cdf_utils::image::convert_eps_to_png;
use cdf_utils::path::{companion_path, ensure_parent_dir, extension_lowercase, is_program_in_path};
use gnuplot::{
    AutoOption, AxesCommon, Caption, Color, DashType, Figure, LineStyle, LineWidth, PlotOption,
};
use tracing::{debug, warn};

use crate::config::PlotConfig;
use crate::curve::Curve;
use crate::error::{CdfError, Result};

/// Draws a curve and persists it to `config.output`.
pub trait PlotRenderer {
    fn draw(&self, curve: &Curve, x_range: (f64, f64), config: &PlotConfig) -> Result<()>;
}

/// gnuplot terminal for an output path, picked by extension.
pub fn terminal_for(path: &Path, size: &Point<Inch>, dpi: &Dpi) -> Result<String> {
    let extension = extension_lowercase(path).unwrap_or_default();
    let px = pixels_point_from_inch_point(size, dpi);
    let terminal = match extension.as_str() {
        "png" => format!("pngcairo size {},{}", px.x, px.y),
        "jpg" | "jpeg" => format!("jpeg size {},{}", px.x, px.y),
        "gif" => format!("gif size {},{}", px.x, px.y),
        "svg" => format!("svg size {},{}", px.x, px.y),
        "pdf" => format!("pdfcairo size {}in,{}in", size.x, size.y),
        "eps" => format!("postscript eps enhanced color size {}in,{}in", size.x, size.y),
        _ => {
            return Err(CdfError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };
    Ok(terminal)
}

/// Accepts matplotlib shorthands as well as gnuplot dash names.
pub fn dash_type(style: &str) -> Result<DashType> {
    match style.trim() {
        "" | "-" | "solid" => Ok(DashType::Solid),
        "--" | "dash" | "dashed" => Ok(DashType::Dash),
        ":" | "dot" | "dotted" => Ok(DashType::Dot),
        "-." | "dotdash" | "dashdot" => Ok(DashType::DotDash),
        "-.." | "dotdotdash" => Ok(DashType::DotDotDash),
        "smalldot" => Ok(DashType::SmallDot),
        _ => Err(CdfError::InvalidLineStyle(style.to_string())),
    }
}

/// Fails early when `path` cannot be written, without clobbering an
/// existing file or leaving an empty one behind.
fn check_writable(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        OpenOptions::new().write(true).open(path)?;
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)?;
        std::fs::remove_file(path)?;
    }
    Ok(())
}

fn write_curve_data(curve: &Curve, path: &Path) -> Result<()> {
    let mut data = BufWriter::new(std::fs::File::create(path)?);
    for (x, y) in curve.points() {
        writeln!(data, "{}\t{}", x, y)?;
    }
    data.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct GnuplotRenderer;

impl GnuplotRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Full figure for `curve`: terminal, legend, title, labels, ranges and the
/// styled line. Nothing is run or written.
pub fn build_figure(
    curve: &Curve,
    x_range: (f64, f64),
    config: &PlotConfig,
    terminal: &str,
    dash: DashType,
    output: &str,
) -> Figure {
    let mut fig = Figure::new();
    fig.set_terminal(terminal, output);
    if config.label.is_none() {
        fig.set_pre_commands("unset key");
    }

    let mut line_options: Vec<PlotOption<&str>> = vec![
        Color(config.line_color.as_str().into()),
        LineStyle(dash),
        LineWidth(config.line_width),
    ];
    if let Some(label) = &config.label {
        line_options.push(Caption(label.as_str()));
    }

    fig.axes2d()
        .set_title(config.title.as_deref().unwrap_or(""), &[])
        .set_x_label(&config.x_label, &[])
        .set_y_label(&config.y_label, &[])
        .set_x_range(AutoOption::Fix(x_range.0), AutoOption::Fix(x_range.1))
        .set_y_range(AutoOption::Fix(config.y_range.0), AutoOption::Fix(config.y_range.1))
        .lines(curve.xs(), curve.ys(), &line_options);
    fig
}

impl PlotRenderer for GnuplotRenderer {
    fn draw(&self, curve: &Curve, x_range: (f64, f64), config: &PlotConfig) -> Result<()> {
        config.validate()?;
        let output_path = config.output.as_path();
        let terminal = terminal_for(output_path, &config.size, &config.dpi)?;
        let dash = dash_type(&config.line_style)?;
        let output = output_path
            .to_str()
            .ok_or_else(|| CdfError::InvalidPath(output_path.to_path_buf()))?;

        if !is_program_in_path("gnuplot") {
            return Err(CdfError::Render("gnuplot not found in PATH".to_string()));
        }

        ensure_parent_dir(output_path)?;
        check_writable(output_path)?;

        let mut fig = build_figure(curve, x_range, config, &terminal, dash, output);

        debug!(%terminal, output, points = curve.len(), "running gnuplot");
        fig.show_and_keep_running()
            .map_err(|e| CdfError::Render(e.to_string()))?;
        // Waits for gnuplot to exit, which flushes and closes the output file.
        fig.close();

        let written = std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            // gnuplot opens the output on `set output` even when a later command fails
            let _ = std::fs::remove_file(output_path);
            return Err(CdfError::Render(format!(
                "gnuplot produced no output at {}",
                output_path.display()
            )));
        }

        if config.save_script {
            fig.echo_to_file(&format!("{}.plot", output));
        }

        if config.save_data {
            write_curve_data(curve, &companion_path(output_path, "dat"))?;
        }

        if config.gs && extension_lowercase(output_path).as_deref() == Some("eps") {
            if is_program_in_path("gs") {
                convert_eps_to_png(output_path, output_path.with_extension("png"), &config.dpi)
                    .map_err(|e| CdfError::Render(e.to_string()))?;
            } else {
                warn!("gs not found in PATH, skipping PNG conversion");
            }
        }

        Ok(())
    }
}
