use cdf_drawer::{
    CdfDrawer, DensityFn, DensityParams, ExponentialDensity, NormalDensity, PlotConfig,
    UniformDensity, VariableType, Weighting,
};
use cdf_utils::pbar::plot_pbar;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    // Path to output directory
    #[clap(short = 'o', long = "output", default_value = ".")]
    output: String,

    // discrete or continuous
    #[clap(short = 't', long = "type")]
    variable_type: Option<String>,

    // JSON plot configuration
    #[clap(short = 'c', long = "config")]
    config: Option<String>,

    // Image format, picked by extension
    #[clap(short = 'f', long = "format", default_value = "jpg")]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// CDFs of a uniform and a standard normal random sample
    Demo {
        #[clap(short = 'n', long = "samples", default_value_t = 100)]
        samples: usize,

        #[clap(short = 's', long = "seed")]
        seed: Option<u64>,

        // Density weighting the normal sample
        #[clap(short = 'd', long = "density", value_enum, default_value_t = DensityKind::Normal)]
        density: DensityKind,

        // Density parameter as key=value, e.g. --param std_dev=2
        #[clap(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,
    },
    /// One CDF per column of a CSV file with a header row
    Csv {
        #[clap(short = 'i', long = "input")]
        input: String,

        #[clap(long = "column", required = true)]
        columns: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DensityKind {
    Normal,
    Exponential,
    Uniform,
}

impl DensityKind {
    fn build(self, params: &DensityParams) -> Result<Box<dyn DensityFn>, Box<dyn Error>> {
        Ok(match self {
            DensityKind::Normal => Box::new(NormalDensity::from_params(params)?),
            DensityKind::Exponential => Box::new(ExponentialDensity::from_params(params)?),
            DensityKind::Uniform => Box::new(UniformDensity::from_params(params)?),
        })
    }
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{}: {}", key, e))?;
    Ok((key.trim().to_string(), value))
}

struct PlotTask {
    name: String,
    sample: Vec<f64>,
    density: Option<Box<dyn DensityFn>>,
    params: DensityParams,
}

impl PlotTask {
    fn plain(name: &str, sample: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            sample,
            density: None,
            params: DensityParams::new(),
        }
    }

    fn weighting(&self) -> Weighting<'_> {
        match &self.density {
            Some(density) => Weighting::uniform().with_density(&**density, self.params.clone()),
            None => Weighting::uniform(),
        }
    }
}

fn base_config(args: &Args) -> Result<PlotConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => PlotConfig::from_json_file(path)?,
        None => PlotConfig::default(),
    };
    if config.y_label.is_empty() {
        config.y_label = "probability".to_string();
    }
    Ok(config)
}

fn demo_tasks(
    samples: usize,
    seed: Option<u64>,
    density: DensityKind,
    params: DensityParams,
) -> Result<Vec<PlotTask>, Box<dyn Error>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let uniform = (0..samples).map(|_| rng.gen::<f64>()).collect();
    let normal = Normal::new(0.0, 1.0)?
        .sample_iter(&mut rng)
        .take(samples)
        .collect();

    let mut weighted = PlotTask::plain("normal", normal);
    weighted.density = Some(density.build(&params)?);
    weighted.params = params;

    Ok(vec![PlotTask::plain("uniform", uniform), weighted])
}

fn csv_tasks<P: AsRef<Path>>(input: P, columns: &[String]) -> Result<Vec<PlotTask>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(input.as_ref())?;
    let headers = reader.headers()?.clone();

    let indices = columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| format!("Column {:?} not found in {:?}", column, input.as_ref()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut tasks = columns
        .iter()
        .map(|column| PlotTask::plain(column, Vec::new()))
        .collect::<Vec<_>>();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (task, &index) in tasks.iter_mut().zip(&indices) {
            match record.get(index).map(|field| field.trim().parse::<f64>()) {
                Some(Ok(v)) if v.is_finite() => task.sample.push(v),
                _ => warn!(row, column = %task.name, "skipping unparsable value"),
            }
        }
    }

    Ok(tasks)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "draw_cdf=info,cdf_drawer=info".into()),
        )
        .init();

    let start = std::time::Instant::now();
    let args = Args::parse();
    let output_dir = PathBuf::from(&args.output);
    let config = base_config(&args)?;

    let (default_type, tasks) = match &args.command {
        Command::Demo {
            samples,
            seed,
            density,
            params,
        } => (
            VariableType::Continuous,
            demo_tasks(*samples, *seed, *density, params.iter().cloned().collect())?,
        ),
        Command::Csv { input, columns } => (VariableType::Discrete, csv_tasks(input, columns)?),
    };
    let variable_type = match &args.variable_type {
        Some(tag) => tag.parse::<VariableType>()?,
        None => default_type,
    };
    let drawer = CdfDrawer::new(variable_type);

    println!("Drawing {} {} CDF plots", tasks.len(), variable_type);
    let pbar = plot_pbar(tasks.len(), "Drawing CDFs")?;
    for task in pbar.wrap_iter(tasks.into_iter()) {
        if task.sample.is_empty() {
            warn!(name = %task.name, "no values, skipping");
            continue;
        }

        let mut plot_config = config
            .clone()
            .with_output(output_dir.join(format!("{}.{}", task.name, args.format)));
        if plot_config.x_label.is_empty() {
            plot_config.x_label = task.name.clone();
        }
        if plot_config.title.is_none() {
            plot_config.title = Some(format!("CDF of {}", task.name.replace('_', r"\_")));
        }
        if plot_config.label.is_none() {
            plot_config.label = Some(task.name.replace('_', r"\_"));
        }

        let weighting = task.weighting();
        if weighting.density.is_some() {
            // density-weighted mass is not a probability, fit the y axis to it
            let (_, curve) = drawer.compute(&task.sample, &weighting)?;
            plot_config.y_range = (0.0, curve.total().max(plot_config.y_range.1));
        }
        let curve = drawer.draw(&task.sample, &weighting, &plot_config)?;
        info!(
            name = %task.name,
            points = curve.len(),
            output = %plot_config.output.display(),
            "plotted"
        );
    }
    pbar.finish_and_clear();

    println!("Done in {:?}", start.elapsed());
    Ok(())
}
