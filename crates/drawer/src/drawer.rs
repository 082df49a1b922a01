use num::ToPrimitive;
use tracing::{debug, info};

use crate::config::PlotConfig;
use crate::curve::Curve;
use crate::error::{CdfError, Result};
use crate::reduce::{sample_to_f64, Reduction, Weighting};
use crate::render::{GnuplotRenderer, PlotRenderer};
use crate::variable::VariableType;

/// Reduces a sample, builds its CDF and hands it to a renderer.
#[derive(Debug, Clone)]
pub struct CdfDrawer<R = GnuplotRenderer> {
    variable_type: VariableType,
    renderer: R,
}

impl Default for CdfDrawer<GnuplotRenderer> {
    fn default() -> Self {
        Self::new(VariableType::default())
    }
}

impl CdfDrawer<GnuplotRenderer> {
    pub fn new(variable_type: VariableType) -> Self {
        Self::with_renderer(variable_type, GnuplotRenderer::new())
    }

    /// Parses `discrete` / `continuous`; anything else fails here, before
    /// any sample is looked at.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(Self::new(tag.parse()?))
    }
}

impl<R: PlotRenderer> CdfDrawer<R> {
    pub fn with_renderer(variable_type: VariableType, renderer: R) -> Self {
        Self {
            variable_type,
            renderer,
        }
    }

    pub fn variable_type(&self) -> VariableType {
        self.variable_type
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Reduction and cumulative curve, nothing drawn.
    pub fn compute<T: ToPrimitive>(
        &self,
        sample: &[T],
        weighting: &Weighting<'_>,
    ) -> Result<(Reduction, Curve)> {
        let sample = sample_to_f64(sample)?;
        let reduction = self.variable_type.reduce(&sample, weighting)?;
        let curve = Curve::from_reduction(&reduction)?;
        debug!(
            variable_type = %self.variable_type,
            points = curve.len(),
            total = curve.total(),
            "built cdf curve"
        );
        Ok((reduction, curve))
    }

    /// Computes the curve and renders it to `config.output`. Nothing is
    /// written when the reduction fails.
    pub fn draw<T: ToPrimitive>(
        &self,
        sample: &[T],
        weighting: &Weighting<'_>,
        config: &PlotConfig,
    ) -> Result<Curve> {
        let (_, curve) = self.compute(sample, weighting)?;
        let bounds = curve.bounds().ok_or(CdfError::EmptySample)?;
        let x_range = config.x_range.resolve(bounds);

        self.renderer.draw(&curve, x_range, config)?;
        info!(
            output = %config.output.display(),
            x_min = x_range.0,
            x_max = x_range.1,
            "saved cdf plot"
        );
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::XRange;
    use crate::density::DensityParams;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(Vec<f64>, Vec<f64>, (f64, f64))>>,
    }

    impl PlotRenderer for RecordingRenderer {
        fn draw(&self, curve: &Curve, x_range: (f64, f64), _config: &PlotConfig) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((curve.xs().to_vec(), curve.ys().to_vec(), x_range));
            Ok(())
        }
    }

    struct FailingRenderer;

    impl PlotRenderer for FailingRenderer {
        fn draw(&self, _: &Curve, _: (f64, f64), config: &PlotConfig) -> Result<()> {
            Err(CdfError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("cannot write {}", config.output.display()),
            )))
        }
    }

    fn recording(variable_type: VariableType) -> CdfDrawer<RecordingRenderer> {
        CdfDrawer::with_renderer(variable_type, RecordingRenderer::default())
    }

    #[test]
    fn auto_range_starts_at_zero_for_positive_samples() {
        let drawer = recording(VariableType::Continuous);
        drawer
            .draw(&[0.3, 0.5, 0.9], &Weighting::uniform(), &PlotConfig::default())
            .unwrap();
        let calls = drawer.renderer().calls.borrow();
        assert_eq!(calls[0].2, (0.0, 0.9));
    }

    #[test]
    fn auto_range_keeps_negative_minimum() {
        let drawer = recording(VariableType::Discrete);
        drawer
            .draw(&[-2, 0, 3], &Weighting::uniform(), &PlotConfig::default())
            .unwrap();
        assert_eq!(drawer.renderer().calls.borrow()[0].2, (-2.0, 3.0));
    }

    #[test]
    fn fixed_range_is_passed_through() {
        let drawer = recording(VariableType::Discrete);
        let config = PlotConfig::default().with_x_range(XRange::Fixed(0.0, 1.1));
        drawer.draw(&[0.5], &Weighting::uniform(), &config).unwrap();
        assert_eq!(drawer.renderer().calls.borrow()[0].2, (0.0, 1.1));
    }

    #[test]
    fn renderer_receives_cumulative_curve() {
        let drawer = recording(VariableType::Discrete);
        let curve = drawer
            .draw(&[1, 1, 2, 3, 3, 3], &Weighting::uniform(), &PlotConfig::default())
            .unwrap();
        let calls = drawer.renderer().calls.borrow();
        assert_eq!(calls[0].0, vec![1.0, 2.0, 3.0]);
        assert_eq!(calls[0].1, curve.ys().to_vec());
        assert!((curve.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn continuous_override_flows_through_unnormalized() {
        let drawer = recording(VariableType::Continuous);
        let distribution = [0.5, 0.5];
        let curve = drawer
            .draw(
                &[0.1, 0.1, 0.9],
                &Weighting::uniform().with_distribution(&distribution),
                &PlotConfig::default(),
            )
            .unwrap();
        assert_eq!(curve.ys(), &[1.0, 1.5]);
    }

    #[test]
    fn reducer_failure_skips_rendering() {
        let drawer = recording(VariableType::Discrete);
        let distribution = [1.0];
        let err = drawer
            .draw(
                &[1.0, 2.0],
                &Weighting::uniform().with_distribution(&distribution),
                &PlotConfig::default(),
            )
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(drawer.renderer().calls.borrow().is_empty());

        let empty: [f64; 0] = [];
        assert!(matches!(
            drawer.draw(&empty, &Weighting::uniform(), &PlotConfig::default()),
            Err(CdfError::EmptySample)
        ));
        assert!(drawer.renderer().calls.borrow().is_empty());
    }

    #[test]
    fn renderer_errors_surface() {
        let drawer = CdfDrawer::with_renderer(VariableType::Discrete, FailingRenderer);
        let err = drawer
            .draw(&[1.0], &Weighting::uniform(), &PlotConfig::default())
            .unwrap_err();
        assert!(matches!(err, CdfError::Io(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn bogus_tag_fails_at_construction() {
        let err = CdfDrawer::from_tag("bogus").unwrap_err();
        assert!(matches!(err, CdfError::InvalidVariableType(_)));
        assert_eq!(
            CdfDrawer::from_tag("continuous").unwrap().variable_type(),
            VariableType::Continuous
        );
        assert_eq!(CdfDrawer::default().variable_type(), VariableType::Discrete);
    }

    #[test]
    fn compute_is_idempotent() {
        let drawer = recording(VariableType::Continuous);
        let sample = [0.4, 0.1, 0.4, 0.7];
        let first = drawer.compute(&sample, &Weighting::uniform()).unwrap();
        let second = drawer.compute(&sample, &Weighting::uniform()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn density_params_reach_the_density() {
        let drawer = recording(VariableType::Continuous);
        let density = |x: f64, p: &DensityParams| p.get_or("weight", 0.0) * x;
        let weighting =
            Weighting::uniform().with_density(&density, DensityParams::new().with("weight", 0.5));
        let (reduction, _) = drawer.compute(&[1.0, 2.0], &weighting).unwrap();
        assert_eq!(reduction.mass, vec![0.5, 1.0]);
    }
}
